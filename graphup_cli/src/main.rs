use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};

use graphup_core::account::{AccountProvider, EnvAccount, StaticAccount};
use graphup_core::config::GraphConfig;
use graphup_core::dispatch::EventLoop;
use graphup_core::events::{Event, EventChannel};
use graphup_core::graph::{Graph, Photo};

mod terminal_observer;
use terminal_observer::TerminalObserver;

#[derive(Parser)]
#[command(name = "graphup", about = "Upload photos and manage their comments on the graph API")]
struct Args {
    /// Access token; falls back to GRAPHUP_ACCESS_TOKEN
    #[arg(long, global = true)]
    access_token: Option<String>,

    /// API base URL; falls back to GRAPHUP_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print downloaded comments and likes as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a photo, optionally commenting on it once created
    Upload {
        path: PathBuf,
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Comment on an existing photo
    Comment {
        #[arg(long)]
        photo_id: String,
        message: String,
    },
    /// List the comments of a photo
    Comments {
        #[arg(long)]
        photo_id: String,
    },
    /// List the likes of a photo
    Likes {
        #[arg(long)]
        photo_id: String,
    },
}

/// Failure reasons collected from `*-failed` events.
type Failures = Arc<Mutex<Vec<String>>>;

const FAILURE_CHANNELS: [EventChannel; 4] = [
    EventChannel::PhotoCreateFailed,
    EventChannel::CommentAddFailed,
    EventChannel::CommentsDownloadFailed,
    EventChannel::LikesDownloadFailed,
];

fn watch(photo: &Photo, failures: &Failures, json: bool) {
    let observer = Arc::new(TerminalObserver::new());
    for channel in [
        EventChannel::TransferStarted,
        EventChannel::TransferProgress,
        EventChannel::TransferStateChanged,
        EventChannel::TransferCompleted,
        EventChannel::TransferFailed,
    ] {
        photo.events().subscribe_observer(channel, observer.clone());
    }

    for channel in FAILURE_CHANNELS {
        let failures = Arc::clone(failures);
        photo.events().subscribe(channel, move |event| {
            let reason = match event {
                Event::PhotoCreateFailed(r)
                | Event::CommentAddFailed(r)
                | Event::CommentsDownloadFailed(r)
                | Event::LikesDownloadFailed(r) => r.clone(),
                _ => return,
            };
            failures.lock().unwrap_or_else(|e| e.into_inner()).push(reason);
        });
    }

    photo.events().subscribe(EventChannel::CommentAdded, |event| {
        if let Event::CommentAdded(id) = event {
            println!("Comment added: {}", id);
        }
    });
    photo.events().subscribe(EventChannel::CommentsDownloaded, move |event| {
        if let Event::CommentsDownloaded(comments) = event {
            if json {
                match serde_json::to_string_pretty(comments) {
                    Ok(out) => println!("{}", out),
                    Err(e) => log::error!("cannot encode comments: {}", e),
                }
                return;
            }
            for c in comments {
                println!("[{}] {} ({} likes): {}", c.created_time, c.author_name, c.like_count, c.message);
            }
        }
    });
    photo.events().subscribe(EventChannel::LikesDownloaded, move |event| {
        if let Event::LikesDownloaded(likes) = event {
            if json {
                match serde_json::to_string_pretty(likes) {
                    Ok(out) => println!("{}", out),
                    Err(e) => log::error!("cannot encode likes: {}", e),
                }
                return;
            }
            println!("{} like(s)", likes.len());
            for like in likes {
                println!("  {} ({})", like.name, like.id);
            }
        }
    });
}

fn account(args: &Args) -> Option<Arc<dyn AccountProvider>> {
    if let Some(token) = &args.access_token {
        return Some(Arc::new(StaticAccount::new(token.clone())));
    }
    match EnvAccount::from_env() {
        Ok(account) => Some(Arc::new(account)),
        Err(e) => {
            eprintln!("{}: pass --access-token or set {}", e, EnvAccount::VAR);
            None
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let Some(account) = account(&args) else {
        return ExitCode::FAILURE;
    };
    let mut config = GraphConfig::from_env();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }

    let mut event_loop = EventLoop::new();
    let graph = match Graph::new(config, account, event_loop.handle()) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("Cannot set up HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let failures: Failures = Arc::new(Mutex::new(Vec::new()));
    let scheduled = match args.command {
        Command::Upload { path, comment } => {
            let photo = graph.photo();
            watch(&photo, &failures, args.json);
            let graph_cb = graph.clone();
            let failures_cb = Arc::clone(&failures);
            let json = args.json;
            photo.events().subscribe(EventChannel::PhotoCreated, move |event| {
                let Event::PhotoCreated(id) = event else {
                    return;
                };
                println!("Photo created: {}", id);
                if let Some(message) = &comment {
                    let created = graph_cb.photo_with_id(id.clone());
                    watch(&created, &failures_cb, json);
                    if let Err(e) = created.add_comment(message.clone()) {
                        failures_cb.lock().unwrap_or_else(|p| p.into_inner()).push(e.to_string());
                    }
                }
            });
            println!("Uploading {}", path.display());
            photo.create(path);
            Ok(())
        }
        Command::Comment { photo_id, message } => {
            let photo = graph.photo_with_id(photo_id);
            watch(&photo, &failures, args.json);
            photo.add_comment(message)
        }
        Command::Comments { photo_id } => {
            let photo = graph.photo_with_id(photo_id);
            watch(&photo, &failures, args.json);
            photo.refresh_comments()
        }
        Command::Likes { photo_id } => {
            let photo = graph.photo_with_id(photo_id);
            watch(&photo, &failures, args.json);
            photo.refresh_likes()
        }
    };

    if let Err(e) = scheduled {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let ran = event_loop.run_until_idle().await;
    log::debug!("event loop idle after {} task(s)", ran);

    let failures = failures.lock().unwrap_or_else(|e| e.into_inner());
    if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        for reason in failures.iter() {
            eprintln!("Failed: {}", reason);
        }
        ExitCode::FAILURE
    }
}
