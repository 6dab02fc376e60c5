pub mod context;
pub mod login;
pub mod resource;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use campus_client::Client;
use campus_kv::RedbStore;

use crate::config::{ClientConfig, session_db_path};

/// Build a client for the current context. The session snapshot lives in
/// a shared redb file under ~/.campus, so logins survive process exits.
pub fn build_client(config_path: &Path) -> Result<Client> {
    let config = ClientConfig::load(config_path)?;
    let ctx = config
        .current()
        .ok_or_else(|| anyhow::anyhow!("No current context. Run `campus use context <name>`."))?;
    let backend = ctx.backend_config()?;

    let db_path = session_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let kv = RedbStore::open(&db_path)
        .map_err(|e| anyhow::anyhow!("failed to open session store: {}", e))?;
    Ok(Client::new(backend, Arc::new(kv)))
}
