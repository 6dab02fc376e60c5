//! `campus` — CLI client for the school's ERP backend.
//!
//! Manages contexts, authentication, and resource operations.

mod commands;
mod config;

use clap::{Parser, Subcommand};

/// Campus CLI tool.
#[derive(Parser, Debug)]
#[command(name = "campus", about = "Campus ERP CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.campus/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (backend connections).
    #[command(name = "context")]
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Switch the current context.
    #[command(name = "use")]
    Use {
        #[command(subcommand)]
        what: UseWhat,
    },

    /// Login to the current context's backend.
    Login {
        /// Username.
        #[arg(long)]
        user: Option<String>,
        /// Password (not recommended — use interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },

    /// Logout — clear the stored session.
    Logout,

    /// Get resource(s).
    Get {
        /// Resource type (e.g. students, courses, academic-years).
        resource: String,
        /// Optional resource id for single get.
        id: Option<i64>,
        /// Limit results.
        #[arg(long)]
        limit: Option<u32>,
        /// Offset for pagination.
        #[arg(long)]
        offset: Option<u32>,
    },

    /// Create a resource.
    Create {
        /// Resource type.
        resource: String,
        /// JSON body.
        #[arg(long = "json")]
        json_body: Option<String>,
        /// Read JSON from file.
        #[arg(short = 'f', long = "file")]
        file: Option<String>,
    },

    /// Update a resource.
    Update {
        /// Resource type.
        resource: String,
        /// Resource id.
        id: i64,
        /// JSON body.
        #[arg(long = "json")]
        json_body: String,
    },

    /// Delete a resource.
    Delete {
        /// Resource type.
        resource: String,
        /// Resource id.
        id: i64,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// Search students by name, email, or phone.
    Search {
        /// Resource type (students).
        resource: String,
        /// Search term.
        term: String,
    },

    /// Check backend and session status.
    Status,

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Create a new context and select it.
    Create {
        /// Context name.
        name: String,
        /// Backend URL.
        #[arg(long)]
        server: Option<String>,
        /// Database name.
        #[arg(long)]
        database: Option<String>,
        /// RPC dialect: session (default) or service.
        #[arg(long)]
        dialect: Option<String>,
        /// API key for service-dialect object calls.
        #[arg(long = "api-key")]
        api_key: Option<String>,
        /// Demo context: fixture-backed resources, no backend required.
        #[arg(long)]
        demo: bool,
    },
    /// List all contexts.
    List,
    /// Set properties on a context.
    Set {
        name: String,
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        database: Option<String>,
        #[arg(long)]
        dialect: Option<String>,
        #[arg(long = "api-key")]
        api_key: Option<String>,
        /// Enable or disable demo mode (--demo true/false).
        #[arg(long)]
        demo: Option<bool>,
    },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum UseWhat {
    /// Switch to a context.
    Context { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::ClientConfig::default_path);
    let output_json = cli.output == "json";

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Create {
                name,
                server,
                database,
                dialect,
                api_key,
                demo,
            } => {
                commands::context::create(
                    &name,
                    server.as_deref(),
                    database.as_deref(),
                    dialect.as_deref(),
                    api_key.as_deref(),
                    demo,
                    &config_path,
                )?;
            }
            ContextAction::List => {
                commands::context::list(&config_path)?;
            }
            ContextAction::Set {
                name,
                server,
                database,
                dialect,
                api_key,
                demo,
            } => {
                commands::context::set(
                    &name,
                    server.as_deref(),
                    database.as_deref(),
                    dialect.as_deref(),
                    api_key.as_deref(),
                    demo,
                    &config_path,
                )?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&name, &config_path)?;
            }
        },

        Commands::Use { what } => match what {
            UseWhat::Context { name } => {
                commands::context::use_context(&name, &config_path)?;
            }
        },

        Commands::Login { user, password } => {
            let username = match user {
                Some(user) => user,
                None => {
                    eprint!("Username: ");
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)?;
                    line.trim().to_string()
                }
            };
            let password = match password {
                Some(password) => password,
                None => rpassword::prompt_password("Password: ")?,
            };
            commands::login::login(&username, &password, &config_path).await?;
        }

        Commands::Logout => {
            commands::login::logout(&config_path).await?;
        }

        Commands::Get {
            resource,
            id,
            limit,
            offset,
        } => {
            commands::resource::get(&resource, id, output_json, limit, offset, &config_path)
                .await?;
        }

        Commands::Create {
            resource,
            json_body,
            file,
        } => {
            let body = if let Some(path) = file {
                std::fs::read_to_string(&path)?
            } else if let Some(json) = json_body {
                json
            } else {
                anyhow::bail!("Provide --json or -f <file>.");
            };
            commands::resource::create(&resource, &body, &config_path).await?;
        }

        Commands::Update {
            resource,
            id,
            json_body,
        } => {
            commands::resource::update(&resource, id, &json_body, &config_path).await?;
        }

        Commands::Delete { resource, id, yes } => {
            if !yes {
                eprint!("Are you sure? [y/N]: ");
                let mut line = String::new();
                std::io::stdin().read_line(&mut line)?;
                if !line.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            commands::resource::delete(&resource, id, &config_path).await?;
        }

        Commands::Search { resource, term } => {
            commands::resource::search(&resource, &term, output_json, &config_path).await?;
        }

        Commands::Status => {
            commands::login::status(&config_path).await?;
        }

        Commands::Version => {
            println!("campus cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
