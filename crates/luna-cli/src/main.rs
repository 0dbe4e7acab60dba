mod config;

use clap::{Parser, Subcommand};
use config::{LunaConfig, StoreBackend};
use luna_agent::LlmClient;
use luna_gateway::GatewayServer;
use luna_orchestrator::ConversationOrchestrator;
use luna_safety::{CrisisDetector, HelplineSearch, Sanitizer, SerpApiSearch, UnconfiguredSearch};
use luna_session::{FileSessionStore, InMemorySessionStore, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luna", about = "Luna: empathetic companion chat backend")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "luna.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect stored sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List stored session identifiers
    List,
    /// Print a stored session record as JSON
    Show {
        /// Session identifier
        id: String,
    },
}

async fn open_store(config: &LunaConfig) -> anyhow::Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.store.backend {
        StoreBackend::File => Arc::new(
            FileSessionStore::new(config.store.data_dir.join("sessions")).await?,
        ),
        StoreBackend::Memory => {
            warn!("Using in-memory session store; sessions are lost on restart");
            Arc::new(InMemorySessionStore::new())
        }
    };
    Ok(store)
}

fn helpline_search(config: &LunaConfig) -> anyhow::Result<Arc<dyn HelplineSearch>> {
    let search: Arc<dyn HelplineSearch> = match &config.search.api_key {
        Some(key) => Arc::new(SerpApiSearch::new(
            key.resolve()?,
            config.search.base_url.clone(),
        )),
        None => {
            info!("No search api_key configured; crisis replies use the static helpline list");
            Arc::new(UnconfiguredSearch)
        }
    };
    Ok(search)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Secrets referenced as { env = "..." } and RUST_LOG may live in a local .env file.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, "Failed to load .env file");
        }
    }

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: LunaConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let store = open_store(&config).await?;
            let llm = Arc::new(LlmClient::new(config.model.clone())?);
            let crisis = CrisisDetector::new(
                helpline_search(&config)?,
                config.search.helpline_query(),
                config.conversation.search_timeout(),
            );
            let orchestrator = ConversationOrchestrator::new(
                store,
                llm,
                crisis,
                config.conversation.orchestrator_config(),
            )
            .with_sanitizer(Sanitizer::new(config.conversation.max_message_length));

            let app = GatewayServer::build_with_origins(
                Arc::new(orchestrator),
                &config.server.allowed_origins,
            );

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!(
                provider = ?config.model.provider,
                model = %config.model.model_id,
                "Luna gateway listening on {addr}"
            );
            axum::serve(listener, app).await?;
        }
        Commands::Session { action } => {
            let store = open_store(&config).await?;
            match action {
                SessionAction::List => {
                    let keys = store.list().await?;
                    if keys.is_empty() {
                        println!("No sessions stored.");
                    } else {
                        for key in &keys {
                            println!("{key}");
                        }
                        println!("\nTotal: {} session(s)", keys.len());
                    }
                }
                SessionAction::Show { id } => match store.get(&id).await? {
                    Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                    None => println!("No session stored for '{id}'."),
                },
            }
        }
    }

    Ok(())
}
