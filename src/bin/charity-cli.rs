use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "charity-cli")]
#[command(about = "Management CLI for the charity platform", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Admin API key, sent as a bearer token.
    #[arg(short, long, env = "CHARITY_ADMIN_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check platform status (admin)
    Status,
    /// Show platform statistics
    Stats,
    /// List recent users, or one profile by wallet
    Users {
        #[arg(long)]
        wallet: Option<String>,
    },
    /// List requests awaiting moderation (admin)
    Requests {
        #[arg(long, default_value = "PENDING")]
        status: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Approve a charity request (admin)
    Approve { id: String },
    /// Reject a charity request (admin)
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show SOL and charity token balances for a wallet
    Balance { address: String },
    /// Show the zakat pool balance
    Pool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
        );
    }

    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{base}/admin/status"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Stats => client.get(format!("{base}/api/stats")).send().await?,
        Commands::Users { wallet } => {
            let mut request = client.get(format!("{base}/api/users"));
            if let Some(wallet) = wallet {
                request = request.query(&[("wallet", wallet)]);
            }
            request.send().await?
        }
        Commands::Requests { status, page } => {
            client
                .get(format!("{base}/admin/requests"))
                .query(&[("status", status), ("page", page.to_string())])
                .headers(headers)
                .send()
                .await?
        }
        Commands::Approve { id } => {
            client
                .post(format!("{base}/admin/requests/{id}/approve"))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Reject { id, reason } => {
            client
                .post(format!("{base}/admin/requests/{id}/reject"))
                .headers(headers)
                .json(&json!({ "reason": reason }))
                .send()
                .await?
        }
        Commands::Balance { address } => {
            client
                .get(format!("{base}/api/wallet/{address}"))
                .send()
                .await?
        }
        Commands::Pool => client.get(format!("{base}/api/zakat/pool")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
