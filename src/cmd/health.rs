//! Liveness probe command — `cardsmith health`.

use anyhow::{Context, Result};

use cardsmith::store::StoreClient;

pub async fn cmd_health(url: &str) -> Result<()> {
    let client = StoreClient::new(url);
    let health = client
        .health()
        .await
        .with_context(|| format!("Card service at {} is not healthy", url))?;
    println!("{}: {} ({})", health.status, health.message, health.timestamp);
    Ok(())
}
