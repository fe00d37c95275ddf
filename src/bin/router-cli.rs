use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Management CLI for the JIRA webhook router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check router liveness
    Health,
    /// List configured routes
    Routes,
    /// Probe every route's agent
    Status,
    /// Reload the routing configuration
    Reload,
    /// Send a prompt to an agent
    Trigger {
        prompt: String,
        /// Route name; the catch-all is used when omitted or unknown
        #[arg(short, long)]
        project: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Routes => client.get(format!("{}/routes", base)).send().await?,
        Commands::Status => client.get(format!("{}/claude-status", base)).send().await?,
        Commands::Reload => client.post(format!("{}/config/reload", base)).send().await?,
        Commands::Trigger { prompt, project } => {
            let mut body = json!({ "prompt": prompt });
            if let Some(project) = project {
                body["project"] = Value::String(project);
            }
            client
                .post(format!("{}/trigger-claude", base))
                .json(&body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: router returned status {}", status);
        eprintln!("Response: {}", rendered);
    }
    Ok(())
}
