use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "liveness-cli")]
#[command(about = "Query a running online-server-count daemon", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the online/total server count
    Status,
    /// List every counted server with its liveness
    Servers,
    /// Check that the daemon is up and probing
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match cli.command {
        Commands::Status => "/status",
        Commands::Servers => "/status/servers",
        Commands::Health => "/health",
    };

    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Err(format!("status API returned {}", status).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
