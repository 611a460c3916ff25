//! Card configuration service command — `cardsmith serve`.

use anyhow::Result;

use cardsmith::config::AppConfig;
use cardsmith::store::server::{ServerConfig, start_server};

pub async fn cmd_serve(config: &AppConfig) -> Result<()> {
    start_server(ServerConfig {
        port: config.server.port,
        db_path: config.server.db_path.clone(),
        dev_mode: config.server.dev,
    })
    .await
}
