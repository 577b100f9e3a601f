use crate::cli::commands::{Cli, Commands};
use anyhow::Result;
use mistward::Config;
use mistward::gateway::{AppState, run_gateway};
use serde::Serialize;
use serde_json::json;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            Ok(run_gateway(&host, port, config).await?)
        }

        Commands::Act { message } => {
            let state = AppState::from_config(&config);
            let result = tokio::task::spawn_blocking(move || state.companion.handle(&message))
                .await?;
            print_json(&result)
        }

        Commands::Validate { user, assistant } => {
            let state = AppState::from_config(&config);
            let verdict = state.guard.validate(&user, &assistant);
            print_json(&verdict.envelope())
        }

        Commands::Events { limit } => {
            let state = AppState::from_config(&config);
            let events = state.guard.audit().query(limit);
            print_json(&json!({ "ok": true, "events": events }))
        }
    }
}
