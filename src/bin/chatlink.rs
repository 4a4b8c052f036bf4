//! Chatlink command line client
//!
//! Drives the search, open-chat and pending request flows against a running server.
//!
//! ```bash
//! chatlink --user 64f0c2 search ann
//! chatlink --user 64f0c2 pending
//! chatlink --user 64f0c2 accept 64f0d9
//! chatlink --user 64f0c2 open-chat 64f0d9
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

use chatlink::client::{
    AppContext, ChannelNotifier, Config, HttpApi, Notification, PendingRequests, PendingView,
    SearchPhase, StaticSession,
};
use chatlink::client::relationships::NO_PENDING_REQUESTS;
use chatlink::shared::messaging::{RelationshipAction, UserId};
use chatlink::shared::AppConfig;

/// Chatlink - find people, open chats, answer friend requests
#[derive(Parser)]
#[command(name = "chatlink")]
#[command(version)]
#[command(about = "Chatlink - find people, open chats, answer friend requests")]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Config file (default: <config dir>/chatlink/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server base URL, overriding the config file
    #[arg(long, global = true)]
    server: Option<String>,

    /// Bearer token, overriding CHATLINK_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Id of the signed-in user
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search users by username
    Search {
        query: String,
    },

    /// List pending friend requests
    Pending,

    /// Accept the request sent by a user
    Accept {
        /// Id of the user who sent the request
        sender: String,
    },

    /// Decline the request sent by a user
    Decline {
        /// Id of the user who sent the request
        sender: String,
    },

    /// Open (or create) the chat with a user
    OpenChat {
        /// Id of the other participant
        #[arg(value_name = "USER")]
        other: String,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let loaded = Config::load(cli.config.as_deref())?;
    let mut config = match &cli.server {
        Some(server) => {
            let app = loaded.app();
            let mut builder = AppConfig::builder()
                .server_url(server.clone())
                .uploads_prefix(app.uploads_prefix.clone())
                .default_avatar(app.default_avatar.clone());
            if let Some(timeout) = app.request_timeout {
                builder = builder.request_timeout(timeout);
            }
            let mut config = Config::with_builder(builder)?;
            config.set_token(loaded.get_token().cloned());
            config
        }
        None => loaded,
    };
    if cli.token.is_some() {
        config.set_token(cli.token.clone());
    }
    Ok(config)
}

fn print_notifications(rx: &mut UnboundedReceiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        println!("[{}] {}", notification.severity, notification.message);
    }
}

async fn respond(
    panel: &PendingRequests<HttpApi>,
    action: RelationshipAction,
    sender: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let requests = panel.load().await.into_result()?;
    let sender = UserId::new(sender);
    let Some(request) = requests.iter().find(|r| *r.sender_id() == sender) else {
        return Err(format!("no pending request from {}", sender).into());
    };
    panel.respond(action, request).await?;
    Ok(())
}

async fn run(cli: Cli, app: &AppContext<HttpApi>) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Search { query } => {
            let search = app.search_modal();
            search.on_input(query);
            if let Some(lookup) = search.on_key_release() {
                lookup.await?;
            }
            let state = search.state();
            if state.phase == SearchPhase::Results && state.results.is_empty() {
                println!("No users found.");
            }
            for user in &state.results {
                println!("{}  {}  {}", user.id, user.full_name(), user.email);
            }
        }
        Commands::Pending => {
            let panel = app.pending_requests();
            panel.load().await;
            match panel.view().await {
                PendingView::Loading => println!("Loading..."),
                PendingView::Failed { message } => println!("{}", message),
                PendingView::Empty => println!("{}", NO_PENDING_REQUESTS),
                PendingView::Ready(rows) => {
                    for row in rows {
                        println!("{}  {}  {}", row.request.sender_id(), row.name, row.avatar_url);
                    }
                }
            }
        }
        Commands::Accept { sender } => {
            respond(&app.pending_requests(), RelationshipAction::Accept, &sender).await?;
        }
        Commands::Decline { sender } => {
            respond(&app.pending_requests(), RelationshipAction::Delete, &sender).await?;
        }
        Commands::OpenChat { other } => {
            let chat = app.search_modal().open_chat_with(&UserId::new(other)).await?;
            let others: Vec<String> = chat.participants.iter().map(|p| p.to_string()).collect();
            println!("{}  with {}", chat.id, others.join(", "));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let session = Arc::new(StaticSession::new(
        cli.user.clone().map(UserId::new),
        config.get_token().cloned(),
    ));
    let (notifier, mut notifications) = ChannelNotifier::new();
    let app = AppContext::connect(config, session, Arc::new(notifier))?;

    let result = run(cli, &app).await;
    print_notifications(&mut notifications);

    app.shutdown().await;
    result
}
