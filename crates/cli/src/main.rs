//! Waitlist CLI - Command-line interface for the Waitlist Engine

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9530";

#[derive(Parser)]
#[command(name = "waitlist")]
#[command(about = "Waitlist Engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WAITLIST_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the queue in order
    List,

    /// Join the back of the queue
    Join {
        /// Name shown in the queue
        name: String,

        /// Address notified when you reach the head of the queue
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Leave the queue
    Leave {
        /// Reservation ID
        id: i64,
    },

    /// Show system status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize, Tabled)]
struct QueueRow {
    rank: usize,
    id: i64,
    display_name: String,
    has_contact: bool,
}

#[derive(Deserialize)]
struct ListResult {
    reservations: Vec<QueueRow>,
}

#[derive(Deserialize, Tabled)]
struct JoinResult {
    id: i64,
    display_name: String,
    #[tabled(display_with = "display_rank")]
    rank: Option<usize>,
}

fn display_rank(rank: &Option<usize>) -> String {
    rank.map(|r| r.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[derive(Deserialize)]
struct LeaveResult {
    id: i64,
    retired: bool,
    notices_queued: usize,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "waitlist.list.v1", json!({})).await?;
            let list: ListResult = serde_json::from_value(result)?;

            if list.reservations.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!("{}", Table::new(list.reservations));
            }
        }

        Commands::Join { name, email } => {
            let params = json!({
                "display_name": name,
                "contact_address": email,
            });

            let result = call_rpc(&cli.rpc_url, "waitlist.join.v1", params).await?;
            let joined: JoinResult = serde_json::from_value(result)?;

            println!("{}", "✓ Joined the queue".green().bold());
            println!();
            println!("{}", Table::new(vec![joined]));
        }

        Commands::Leave { id } => {
            let result = call_rpc(&cli.rpc_url, "waitlist.leave.v1", json!({ "id": id })).await?;
            let left: LeaveResult = serde_json::from_value(result)?;

            if left.retired {
                println!(
                    "{}",
                    format!("✓ Reservation {} left the queue", left.id).green().bold()
                );
                println!("  {} notice(s) queued", left.notices_queued);
            } else {
                println!(
                    "{}",
                    format!("○ Reservation {} was not in the queue", left.id).yellow()
                );
            }
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(stats) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Resource:".bold(), stats["resource_name"]);
                    println!();
                    println!("  {} {}", "In queue:".bold(), stats["active_reservations"]);
                    let notices = &stats["notices"];
                    println!("  {} {}", "Notices queued:".bold(), notices["queued"]);
                    println!("  {} {}", "Notices sent:".bold(), notices["sent"]);
                    println!("  {} {}", "Notices failed:".bold(), notices["failed"]);
                    println!("  {} {}", "Notices dropped:".bold(), notices["dropped"]);
                    println!();
                    println!("  {} {} seconds", "Uptime:".bold(), stats["uptime_seconds"]);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
