use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "account-cli")]
#[command(about = "Command line client for the Account REST API Service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Show service name and version
    Info,
    /// List every account
    List,
    /// Show one account
    Get { id: i64 },
    /// Create an account
    Create {
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Overwrite an existing account
    Update {
        id: i64,
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Delete an account
    Delete { id: i64 },
}

#[derive(clap::Args)]
struct AccountFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    phone_number: String,
    /// YYYY-MM-DD, defaults to today on create
    #[arg(long)]
    date_joined: Option<String>,
}

impl AccountFields {
    fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        body.insert("email".into(), json!(self.email));
        body.insert("address".into(), json!(self.address));
        body.insert("phone_number".into(), json!(self.phone_number));
        if let Some(date) = &self.date_joined {
            body.insert("date_joined".into(), json!(date));
        }
        Value::Object(body)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Info => client.get(format!("{}/", base)).send().await?,
        Commands::List => client.get(format!("{}/accounts", base)).send().await?,
        Commands::Get { id } => client.get(format!("{}/accounts/{}", base, id)).send().await?,
        Commands::Create { fields } => {
            client
                .post(format!("{}/accounts", base))
                .json(&fields.to_json())
                .send()
                .await?
        }
        Commands::Update { id, fields } => {
            client
                .put(format!("{}/accounts/{}", base, id))
                .json(&fields.to_json())
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(format!("{}/accounts/{}", base, id))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
