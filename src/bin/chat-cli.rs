use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use chat_proxy::http::{ErrorEnvelope, CHAT_PATH};

#[derive(Parser)]
#[command(name = "chat-cli")]
#[command(about = "Send chat requests through a running chat-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single user prompt
    Send {
        /// Prompt text
        prompt: String,
    },
    /// Post a raw JSON body as-is
    Raw {
        /// JSON request body
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let body = match cli.command {
        Commands::Send { prompt } => prompt_payload(&prompt),
        Commands::Raw { body } => serde_json::from_str(&body)?,
    };

    let res = client
        .post(format!("{}{}", cli.url.trim_end_matches('/'), CHAT_PATH))
        .json(&body)
        .send()
        .await?;
    print_response(res).await
}

fn prompt_payload(prompt: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": prompt }] }
        ]
    })
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        match serde_json::from_value::<ErrorEnvelope>(json.clone()) {
            Ok(envelope) => eprintln!("Message: {}", envelope.error.message),
            Err(_) => eprintln!("Response: {}", serde_json::to_string_pretty(&json)?),
        }
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
