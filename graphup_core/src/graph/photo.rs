use std::path::PathBuf;
use std::sync::Arc;

use crate::error::GraphError;
use crate::events::{Event, EventBus};
use crate::graph::client::Graph;
use crate::graph::object::GraphObject;
use crate::graph::response::{parse_comments, parse_id, parse_likes};
use crate::types::{ObjectKind, Param, TransferKind, TransferStatus};

/// A photo on the remote graph.
///
/// `create`, `add_comment`, `refresh_comments` and `refresh_likes` never
/// touch the network in the caller's frame: they queue the work on the
/// graph's event loop and report the outcome as events on `events()`.
/// Cloning is cheap and every clone refers to the same photo.
#[derive(Clone)]
pub struct Photo {
    inner: Arc<PhotoInner>,
}

struct PhotoInner {
    object: GraphObject,
    graph: Graph,
}

impl Photo {
    pub(crate) fn new(graph: Graph, remote_id: Option<String>) -> Self {
        let object = GraphObject::new(Arc::clone(graph.executor()), remote_id);
        Self {
            inner: Arc::new(PhotoInner { object, graph }),
        }
    }

    pub fn object(&self) -> &GraphObject {
        &self.inner.object
    }

    pub fn remote_id(&self) -> Option<&str> {
        self.inner.object.remote_id()
    }

    pub fn events(&self) -> &EventBus {
        self.inner.object.events()
    }

    /// Upload `source` as a new photo.
    ///
    /// Allowed in any state, but only the first successful upload sets the
    /// remote id. Emits `photo-created` or `photo-create-failed`.
    pub fn create(&self, source: impl Into<PathBuf>) {
        let photo = self.clone();
        let source = source.into();
        self.inner
            .graph
            .scheduler()
            .defer(async move { photo.run_create(source).await });
    }

    /// Post a comment. Emits `comment-added` or `comment-add-failed`.
    pub fn add_comment(&self, message: impl Into<String>) -> Result<(), GraphError> {
        let id = self.object().require_created("add_comment")?.to_string();
        let photo = self.clone();
        let message = message.into();
        self.inner
            .graph
            .scheduler()
            .defer(async move { photo.run_add_comment(id, message).await });
        Ok(())
    }

    /// Fetch comments. Emits `comments-downloaded` or
    /// `comments-download-failed`.
    pub fn refresh_comments(&self) -> Result<(), GraphError> {
        let id = self.object().require_created("refresh_comments")?.to_string();
        let photo = self.clone();
        self.inner
            .graph
            .scheduler()
            .defer(async move { photo.run_refresh_comments(id).await });
        Ok(())
    }

    /// Fetch likes. Emits `likes-downloaded` or `likes-download-failed`.
    pub fn refresh_likes(&self) -> Result<(), GraphError> {
        let id = self.object().require_created("refresh_likes")?.to_string();
        let photo = self.clone();
        self.inner
            .graph
            .scheduler()
            .defer(async move { photo.run_refresh_likes(id).await });
        Ok(())
    }

    fn emit(&self, event: Event) {
        self.inner.object.emit(event);
    }

    async fn run_create(&self, source: PathBuf) {
        let url = self.inner.graph.config().photos_url();
        let response = self
            .object()
            .http_call(&url, vec![Param::file("source", source)], TransferKind::Upload, ObjectKind::Photo)
            .await;

        if !response.status.is_ok() {
            log::debug!("[photo] create failed, status: {}", response.status);
            self.emit(Event::PhotoCreateFailed(create_failure_reason(&response.status)));
            return;
        }

        match parse_id(&response.body) {
            Ok(id) => {
                if self.object().set_remote_id(id.clone()) {
                    log::info!("[photo] created {}", id);
                }
                self.emit(Event::PhotoCreated(id));
            }
            Err(e) => {
                log::debug!("[photo] create answered without an id: {}", e);
                self.emit(Event::PhotoCreateFailed(e.to_string()));
            }
        }
    }

    async fn run_add_comment(&self, id: String, message: String) {
        let url = self.inner.graph.config().comments_url(&id);
        let response = self
            .object()
            .http_call(&url, vec![Param::text("message", message)], TransferKind::Upload, ObjectKind::Comment)
            .await;

        if !response.status.is_ok() {
            log::debug!("[photo] add_comment failed, status: {}", response.status);
            self.emit(Event::CommentAddFailed(format!("Add comment failed: {}", response.status)));
            return;
        }

        match parse_id(&response.body) {
            Ok(comment_id) => self.emit(Event::CommentAdded(comment_id)),
            Err(e) => self.emit(Event::CommentAddFailed(e.to_string())),
        }
    }

    async fn run_refresh_comments(&self, id: String) {
        let url = self.inner.graph.config().comments_url(&id);
        log::debug!("[photo] fetching comments of {}", id);
        let response = self
            .object()
            .http_call(&url, Vec::new(), TransferKind::Download, ObjectKind::Comment)
            .await;

        if !response.status.is_ok() {
            log::debug!("[photo] refresh_comments failed, status: {}", response.status);
            self.emit(Event::CommentsDownloadFailed(format!(
                "Comments download failed: {}",
                response.status
            )));
            return;
        }

        let comments = match parse_comments(&response.body) {
            Ok(comments) => comments,
            Err(GraphError::MissingData) => {
                log::debug!("[photo] no data inside the comments response");
                self.emit(Event::CommentsDownloadFailed(
                    "Comments download failed with no data".to_string(),
                ));
                return;
            }
            Err(e) => {
                log::debug!("[photo] couldn't parse comments response: {}", e);
                self.emit(Event::CommentsDownloadFailed(format!(
                    "Comments download failed: {}",
                    e
                )));
                return;
            }
        };

        if comments.is_empty() && self.inner.graph.config().empty_comments_is_failure {
            self.emit(Event::CommentsDownloadFailed("No comments found".to_string()));
        } else {
            log::debug!("[photo] {} comment(s) for {}", comments.len(), id);
            self.emit(Event::CommentsDownloaded(comments));
        }
    }

    async fn run_refresh_likes(&self, id: String) {
        let url = self.inner.graph.config().likes_url(&id);
        let response = self
            .object()
            .http_call(&url, Vec::new(), TransferKind::Download, ObjectKind::Like)
            .await;

        if !response.status.is_ok() {
            self.emit(Event::LikesDownloadFailed(format!(
                "Likes download failed: {}",
                response.status
            )));
            return;
        }

        match parse_likes(&response.body) {
            Ok(likes) => self.emit(Event::LikesDownloaded(likes)),
            Err(GraphError::MissingData) => self.emit(Event::LikesDownloadFailed(
                "Likes download failed with no data".to_string(),
            )),
            Err(e) => self.emit(Event::LikesDownloadFailed(format!("Likes download failed: {}", e))),
        }
    }
}

/// Human reason for a failed upload.
fn create_failure_reason(status: &TransferStatus) -> String {
    match status {
        TransferStatus::Http(400) => "Expired access token.".to_string(),
        TransferStatus::Network(_) => {
            "Network is down. Please connect to the network and try again.".to_string()
        }
        other => format!("Failed reason unknown: {}", other),
    }
}
