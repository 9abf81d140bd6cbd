//! Interactive terminal client.
//!
//! Reads one command per line from stdin and prints the current page after
//! each. Live notifications re-render the page as they arrive.
//!
//! ## Usage
//!
//! ```bash
//! EVENTBOOK_GRAPHQL_URL=http://localhost:4000/graphql eventbook /events
//! ```

use anyhow::Context;
use eventbook::events::EventsAction;
use eventbook::shell::{Command, HELP};
use eventbook::{Config, EventbookApp, Outcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
const CLEAR: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Logs go to stderr so they never interleave with the page on stdout
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.ui.log_level)
                .unwrap_or_else(|_| EnvFilter::new("info,eventbook=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        graphql_url = %config.api.graphql_url,
        subscriptions_url = %config.api.subscriptions_url,
        locale = ?config.ui.locale,
        "Starting eventbook"
    );

    let app = Arc::new(EventbookApp::new(config).context("failed to start client")?);

    let start = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    app.navigate(&start)
        .await
        .with_context(|| format!("failed to open {start}"))?;
    println!("{}", app.render().await);

    let watcher = tokio::spawn(watch_live_updates(Arc::clone(&app)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                eprintln!("{error}");
                continue;
            },
        };

        if command == Command::Help {
            println!("{HELP}");
            continue;
        }

        let epoch = app.alert_epoch().await;
        match app.execute(command).await {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Ignored) => eprintln!("nothing to do here"),
            Ok(Outcome::Applied) => {},
            Err(error) => {
                tracing::error!(%error, "Command failed");
                eprintln!("error: {error}");
            },
        }

        // A new alert starts a fresh screen
        if app.alert_epoch().await != epoch {
            print!("{CLEAR}");
        }
        println!("{}", app.render().await);
    }

    watcher.abort();
    app.shutdown(SHUTDOWN_TIMEOUT)
        .await
        .context("shutdown did not complete")?;
    Ok(())
}

/// Re-render whenever the events page changes without a command
async fn watch_live_updates(app: Arc<EventbookApp>) {
    let mut actions = app.subscribe_events();

    loop {
        match actions.recv().await {
            Ok(
                EventsAction::EventAdded { .. }
                | EventsAction::SubscriptionFailed { .. }
                | EventsAction::EventsRefreshed { .. }
                | EventsAction::RefreshFailed { .. },
            ) => {
                print!("{CLEAR}");
                println!("{}", app.render().await);
            },
            Ok(_) => {},
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Live update watcher lagged");
            },
            Err(RecvError::Closed) => break,
        }
    }
}
