use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use saybox::api::{Comment, CommentApi, CommentClient, ConfigError, ExchangeConfig};
use saybox::notice::{self, Notice, Route};
use saybox::screens::{ComposeScreen, FeedScreen};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Parser, Debug)]
#[command(name = "saybox", about = "Share a message and read the feed")]
struct Cli {
    /// Overrides platform-based base URL selection.
    #[arg(long, env = "SAYBOX_BASE_URL")]
    base_url: Option<String>,

    /// Log request diagnostics to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Share a message, then show the feed.
    Say {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Show recent messages.
    List,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN })
        .init();

    let config = ExchangeConfig::from_env_with_base_url(cli.base_url.as_deref())?;
    tracing::info!(base_url = %config.base_url, "saybox client configured");

    let api: Arc<dyn CommentApi> = Arc::new(CommentClient::new(&config)?);

    let ok = match cli.command {
        Command::Say { words } => say(api, words.join(" ")).await,
        Command::List => show_feed(api).await,
    };
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

async fn say(api: Arc<dyn CommentApi>, text: String) -> bool {
    let compose = ComposeScreen::new(api.clone());
    compose.set_draft(text);

    let result = compose.submit().await;
    let mut ok = result.is_ok();
    for effect in notice::for_submit(&result) {
        match effect {
            Notice::Alert { title, message } => show_alert(title, &message),
            Notice::Navigate(Route::Feed) => ok &= show_feed(api.clone()).await,
        }
    }
    compose.acknowledge();
    ok
}

async fn show_feed(api: Arc<dyn CommentApi>) -> bool {
    let feed = FeedScreen::new(api);

    let result = feed.refresh().await;
    for effect in notice::for_refresh(&result) {
        if let Notice::Alert { title, message } = effect {
            show_alert(title, &message);
        }
    }
    feed.acknowledge();

    if result.is_ok() {
        render_comments(&feed.comments());
    }
    result.is_ok()
}

fn show_alert(title: &str, message: &str) {
    eprintln!("[{title}] {message}");
}

fn render_comments(comments: &[Comment]) {
    println!("Recent Messages");
    if comments.is_empty() {
        println!("  (no messages yet)");
        return;
    }
    for comment in comments {
        println!();
        println!("  #{}  {}", comment.id, comment.created_at);
        for line in comment.body.lines() {
            println!("  {line}");
        }
    }
}
