//! Stdio Host Example
//!
//! Runs the mediator against a real simulator process. Each stdin line is a
//! JSON input, either `{"negotiation": NegotiationMessage}` or
//! `{"choice": {"participant": ..., "choice": PlayerChoice}}`. Every
//! delivery is written to stdout as `{"to": ..., "message": Outbound}`.
//!
//! ```text
//! cargo run --example stdio_host -- host.json
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use tandem_host::{
    BattleManager, BattleParticipant, ChannelTransport, HostConfig, ManagerHandle, MatchRegistry,
    NegotiationMessage, PlayerChoice, ProcessSimulator,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum Input {
    Negotiation(NegotiationMessage),
    Choice {
        participant: BattleParticipant,
        choice: PlayerChoice,
    },
}

async fn forward(handle: &ManagerHandle, line: &str) -> Result<()> {
    match serde_json::from_str(line)? {
        Input::Negotiation(message) => handle.negotiate(message).await,
        Input::Choice { participant, choice } => handle.choose(participant, choice).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    let dex = Arc::new(config.load_dex()?);
    let launcher = Arc::new(ProcessSimulator::new(config.simulator.clone()));
    let (transport, mut outbound) = ChannelTransport::new();

    let (manager, handle) =
        BattleManager::new(config, MatchRegistry::new(), launcher, dex, transport);
    let mediator = tokio::spawn(manager.run());

    tokio::spawn(async move {
        while let Some((to, message)) = outbound.recv().await {
            let line = serde_json::json!({ "to": to, "message": message });
            println!("{}", line);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = forward(&handle, &line).await {
            tracing::warn!(error = %e, line = %line, "Ignoring input");
        }
    }

    handle.shutdown().await?;
    mediator.await?;
    Ok(())
}
