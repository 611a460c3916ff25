//! Database initialization command — `cardsmith init`.

use std::path::Path;

use anyhow::{Context, Result};

use cardsmith::store::db::CardDb;

pub fn cmd_init(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    CardDb::new(db_path).context("Failed to initialize card database")?;
    println!("Card database initialized at {}", db_path.display());
    Ok(())
}
