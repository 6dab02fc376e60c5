//! Login / logout / status commands.

use std::path::Path;

use anyhow::Result;

use crate::config::ClientConfig;

use super::build_client;

/// Login against the current context's backend.
pub async fn login(username: &str, password: &str, config_path: &Path) -> Result<()> {
    let client = build_client(config_path)?;
    let session = client
        .login(username, password)
        .await
        .map_err(|e| anyhow::anyhow!("Login failed ({}): {}", e.code(), e))?;

    println!("Logged in as {} (uid {}).", session.username, session.user_id);
    Ok(())
}

/// Logout — remote teardown is best-effort, local state always clears.
pub async fn logout(config_path: &Path) -> Result<()> {
    let client = build_client(config_path)?;
    client.logout().await;
    println!("Logged out.");
    Ok(())
}

/// Show context, session, and backend reachability.
pub async fn status(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    let Some(ctx) = config.current() else {
        println!("Context:   none");
        return Ok(());
    };

    println!("Context:   {}", ctx.name);
    println!(
        "Server:    {}",
        if ctx.server.is_empty() { "-" } else { &ctx.server }
    );
    println!(
        "Database:  {}",
        if ctx.database.is_empty() { "-" } else { &ctx.database }
    );
    if ctx.demo {
        println!("Mode:      demo (fixture data)");
    }

    if ctx.server.is_empty() {
        if !ctx.demo {
            println!("Status:    no server configured");
        }
        return Ok(());
    }

    let client = build_client(config_path)?;
    client.check_auth();
    match client.session().current() {
        Some(session) => {
            println!("Session:   {} (uid {})", session.username, session.user_id)
        }
        None => println!("Session:   not logged in"),
    }

    match client.transport().version().await {
        Ok(info) => {
            let version = info["server_version"].as_str().unwrap_or("unknown");
            println!("Status:    connected (server {})", version);
        }
        Err(e) => {
            println!("Status:    disconnected ({})", e);
        }
    }
    Ok(())
}
