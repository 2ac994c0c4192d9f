use std::fmt;

use crate::types::{Comment, Like, ObjectKind, TransferKind};

/// Named stream of notifications. Every `Event` belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    TransferStarted,
    TransferProgress,
    TransferCompleted,
    TransferFailed,
    TransferStateChanged,
    PhotoCreated,
    PhotoCreateFailed,
    CommentAdded,
    CommentAddFailed,
    CommentsDownloaded,
    CommentsDownloadFailed,
    LikesDownloaded,
    LikesDownloadFailed,
}

impl EventChannel {
    pub const ALL: [EventChannel; 13] = [
        EventChannel::TransferStarted,
        EventChannel::TransferProgress,
        EventChannel::TransferCompleted,
        EventChannel::TransferFailed,
        EventChannel::TransferStateChanged,
        EventChannel::PhotoCreated,
        EventChannel::PhotoCreateFailed,
        EventChannel::CommentAdded,
        EventChannel::CommentAddFailed,
        EventChannel::CommentsDownloaded,
        EventChannel::CommentsDownloadFailed,
        EventChannel::LikesDownloaded,
        EventChannel::LikesDownloadFailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventChannel::TransferStarted => "transfer-started",
            EventChannel::TransferProgress => "transfer-progress",
            EventChannel::TransferCompleted => "transfer-completed",
            EventChannel::TransferFailed => "transfer-failed",
            EventChannel::TransferStateChanged => "transfer-state-changed",
            EventChannel::PhotoCreated => "photo-created",
            EventChannel::PhotoCreateFailed => "photo-create-failed",
            EventChannel::CommentAdded => "comment-added",
            EventChannel::CommentAddFailed => "comment-add-failed",
            EventChannel::CommentsDownloaded => "comments-downloaded",
            EventChannel::CommentsDownloadFailed => "comments-download-failed",
            EventChannel::LikesDownloaded => "likes-downloaded",
            EventChannel::LikesDownloadFailed => "likes-download-failed",
        }
    }

    /// Looks a channel up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for EventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed payload of every notification a graph object can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TransferStarted {
        object: ObjectKind,
        kind: TransferKind,
    },
    TransferProgress {
        object: ObjectKind,
        kind: TransferKind,
        /// `done / total`, full precision, in `[0.0, 1.0)`.
        fraction: f64,
    },
    TransferCompleted {
        object: ObjectKind,
        kind: TransferKind,
    },
    TransferFailed {
        object: ObjectKind,
        kind: TransferKind,
        reason: String,
    },
    /// Human readable summary, e.g. `"Upload 42% done"`.
    TransferStateChanged(String),
    PhotoCreated(String),
    PhotoCreateFailed(String),
    CommentAdded(String),
    CommentAddFailed(String),
    CommentsDownloaded(Vec<Comment>),
    CommentsDownloadFailed(String),
    LikesDownloaded(Vec<Like>),
    LikesDownloadFailed(String),
}

impl Event {
    pub fn channel(&self) -> EventChannel {
        match self {
            Event::TransferStarted { .. } => EventChannel::TransferStarted,
            Event::TransferProgress { .. } => EventChannel::TransferProgress,
            Event::TransferCompleted { .. } => EventChannel::TransferCompleted,
            Event::TransferFailed { .. } => EventChannel::TransferFailed,
            Event::TransferStateChanged(_) => EventChannel::TransferStateChanged,
            Event::PhotoCreated(_) => EventChannel::PhotoCreated,
            Event::PhotoCreateFailed(_) => EventChannel::PhotoCreateFailed,
            Event::CommentAdded(_) => EventChannel::CommentAdded,
            Event::CommentAddFailed(_) => EventChannel::CommentAddFailed,
            Event::CommentsDownloaded(_) => EventChannel::CommentsDownloaded,
            Event::CommentsDownloadFailed(_) => EventChannel::CommentsDownloadFailed,
            Event::LikesDownloaded(_) => EventChannel::LikesDownloaded,
            Event::LikesDownloadFailed(_) => EventChannel::LikesDownloadFailed,
        }
    }
}
