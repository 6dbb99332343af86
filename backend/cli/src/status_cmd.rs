//! CLI Status Command
//!
//! Asks a running server which model it is configured with.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

const DEFAULT_PORT: u16 = 8000;

fn resolve_port(flag: Option<u16>) -> u16 {
    flag.or_else(|| std::env::var("MEDLENS_PORT").ok()?.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub async fn run(port: Option<u16>) -> Result<()> {
    let port = resolve_port(port);
    println!("MedLens Verify status: checking port {port}...");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(format!("http://127.0.0.1:{port}/verify")).send().await {
        Ok(resp) => {
            let body: Value = resp.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("MedLens Verify is not running on port {port}");
        }
    }

    Ok(())
}
