//! `tasklist`: terminal front end for the task service.
//!
//! Reads one command per line from stdin and prints the list after every
//! change. Optimistic changes print immediately; server outcomes and error
//! dismissals print again when they land.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tasklist_client::command::{Command, USAGE};
use tasklist_client::{
    ClientConfig, HttpTaskApi, TaskListAction, TaskListEnvironment, TaskListReducer,
    TaskListState, TaskListView,
};
use tasklist_core::environment::{SystemClock, UuidGenerator};
use tasklist_runtime::Store;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type ListStore = Store<TaskListState, TaskListAction, TaskListEnvironment, TaskListReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    info!(api_url = %config.api_url, api_key = config.api_key.is_some(), "Configuration loaded");

    let api = HttpTaskApi::from_config(&config).context("failed to build HTTP client")?;
    let env = TaskListEnvironment::new(Arc::new(api), Arc::new(SystemClock), Arc::new(UuidGenerator))
        .with_error_ttl(config.error_ttl);
    let store = Store::new(TaskListState::default(), TaskListReducer::new(), env);

    let renderer = spawn_renderer(store.clone());

    store.send(TaskListAction::Load).await?;
    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                println!("{error}\n{USAGE}");
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{USAGE}");
                continue;
            },
            _ => {},
        }

        let view = store.state(TaskListView::from_state).await;
        match command.to_action(&view) {
            Ok(Some(action)) => {
                store.send(action).await?;
                print_view(&store).await;
            },
            Ok(None) => print_view(&store).await,
            Err(error) => println!("{error}"),
        }
    }

    renderer.abort();
    if let Err(error) = store.shutdown(Duration::from_secs(5)).await {
        warn!(%error, "Requests still in flight at exit");
    }
    Ok(())
}

/// Print the list again whenever an effect feeds an action back
fn spawn_renderer(store: ListStore) -> tokio::task::JoinHandle<()> {
    let mut actions = store.subscribe_actions();
    tokio::spawn(async move {
        loop {
            match actions.recv().await {
                Ok(_) | Err(RecvError::Lagged(_)) => print_view(&store).await,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

async fn print_view(store: &ListStore) {
    let view = store.state(TaskListView::from_state).await;
    print!("{view}");
}
