use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use notes_mcp::config::load_config;
use notes_mcp::http::start_server;
use notes_mcp::mcp::get_tool_definitions;

/// Note-taking store for AI assistants, served over MCP.
#[derive(Parser)]
#[command(name = "notes-mcp", about = "Note-taking store served over MCP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP MCP server
    Serve {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Public base URL used in UI references
        #[arg(long)]
        public_url: Option<String>,
        /// Directory of the companion UI bundle
        #[arg(long)]
        app_ui_dir: Option<PathBuf>,
        /// Start with an empty store instead of the demo notes
        #[arg(long)]
        empty: bool,
        /// Answer unknown methods with a method-not-found error
        #[arg(long)]
        strict_methods: bool,
    },
    /// Print the tool catalog as JSON
    Tools,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> notes_mcp::errors::Result<()> {
    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            public_url,
            app_ui_dir,
            empty,
            strict_methods,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(host) = host {
                cfg.host = host;
            }
            if let Some(port) = port {
                cfg.port = port;
            }
            if public_url.is_some() {
                cfg.public_url = public_url;
            }
            if let Some(dir) = app_ui_dir {
                cfg.app_ui_dir = dir;
            }
            if empty {
                cfg.seed_demo_notes = false;
            }
            if strict_methods {
                cfg.strict_methods = true;
            }
            start_server(cfg).await?;
        }
        Commands::Tools => {
            println!("{}", serde_json::to_string_pretty(&get_tool_definitions())?);
        }
    }
    Ok(())
}
