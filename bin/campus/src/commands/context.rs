//! Context management commands.

use std::path::Path;

use anyhow::Result;

use crate::config::{ClientConfig, Context};

/// Create a new context and make it current.
pub fn create(
    name: &str,
    server: Option<&str>,
    database: Option<&str>,
    dialect: Option<&str>,
    api_key: Option<&str>,
    demo: bool,
    config_path: &Path,
) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if config.get_mut(name).is_some() {
        anyhow::bail!("Context \"{}\" already exists.", name);
    }

    config.upsert_context(Context {
        name: name.to_string(),
        server: server.unwrap_or_default().trim_end_matches('/').to_string(),
        database: database.unwrap_or_default().to_string(),
        dialect: dialect.unwrap_or_default().to_string(),
        api_key: api_key.unwrap_or_default().to_string(),
        demo,
    });
    config.current_context = name.to_string();
    config.save(config_path)?;

    println!("Context \"{}\" created and selected.", name);
    Ok(())
}

/// List all contexts.
pub fn list(config_path: &Path) -> Result<()> {
    let config = ClientConfig::load(config_path)?;
    if config.contexts.is_empty() {
        println!("No contexts configured.");
        return Ok(());
    }
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context {
            "*"
        } else {
            " "
        };
        println!(
            "{} {}\tserver={}\tdb={}\tdialect={}{}",
            marker,
            ctx.name,
            if ctx.server.is_empty() { "-" } else { &ctx.server },
            if ctx.database.is_empty() { "-" } else { &ctx.database },
            if ctx.dialect.is_empty() { "session" } else { &ctx.dialect },
            if ctx.demo { "\tdemo" } else { "" },
        );
    }
    Ok(())
}

/// Set properties on a context.
pub fn set(
    name: &str,
    server: Option<&str>,
    database: Option<&str>,
    dialect: Option<&str>,
    api_key: Option<&str>,
    demo: Option<bool>,
    config_path: &Path,
) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    let ctx = config
        .get_mut(name)
        .ok_or_else(|| anyhow::anyhow!("Context \"{}\" not found.", name))?;

    if let Some(server) = server {
        ctx.server = server.trim_end_matches('/').to_string();
    }
    if let Some(database) = database {
        ctx.database = database.to_string();
    }
    if let Some(dialect) = dialect {
        if !matches!(dialect, "session" | "service") {
            anyhow::bail!("Unknown dialect \"{}\" (use session or service).", dialect);
        }
        ctx.dialect = dialect.to_string();
    }
    if let Some(api_key) = api_key {
        ctx.api_key = api_key.to_string();
    }
    if let Some(demo) = demo {
        ctx.demo = demo;
    }
    config.save(config_path)?;

    println!("Context \"{}\" updated.", name);
    Ok(())
}

/// Delete a context.
pub fn delete(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}

/// Switch the current context.
pub fn use_context(name: &str, config_path: &Path) -> Result<()> {
    let mut config = ClientConfig::load(config_path)?;
    if config.get_mut(name).is_none() {
        anyhow::bail!("Context \"{}\" not found.", name);
    }
    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}
