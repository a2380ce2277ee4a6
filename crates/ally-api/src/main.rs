//! Ally CLI and REST API entry point.
//!
//! Binary name: `ally`
//!
//! Parses CLI arguments, initializes the settings database and services, then
//! dispatches to the appropriate command handler or starts the REST API server.

use clap::Parser;
use clap_complete::generate;

use ally_api::cli::{self, Cli, Commands, SettingsCommand};
use ally_api::http;
use ally_api::state::AppState;
use ally_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_directive: cli.log_directive().to_string(),
        json: cli.log_json,
        enable_otel: cli.otel,
    };
    if let Err(e) = init_tracing(&options) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "ally", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match &cli.command {
        Commands::Serve { port, host } => {
            let host = host.clone().unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                endpoint = %state.chat_service.client().endpoint_url(),
                "Ally API starting"
            );
            if !cli.quiet {
                println!(
                    "  {} Ally API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat { message, session } => match message {
            Some(message) => {
                cli::chat::send_once(&state, session.as_deref(), message, cli.json).await?;
            }
            None => {
                cli::chat::run_interactive(&state, session.as_deref()).await?;
            }
        },

        Commands::Settings { action } => match action {
            SettingsCommand::Show => {
                cli::settings::show_settings(&state, cli.json).await?;
            }
            SettingsCommand::Set {
                email_verification,
                reminders,
            } => {
                cli::settings::set_settings(&state, *email_verification, *reminders, cli.json)
                    .await?;
            }
        },

        Commands::Endpoint => {
            cli::endpoint::show_endpoint(&state, cli.json)?;
        }

        Commands::Remind(args) => {
            cli::remind::remind(&state, args, cli.json).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
