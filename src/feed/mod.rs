pub mod engagement;

use std::{future::Future, path::Path};

use log::{error, info};
use serde_json::Value;

use crate::{
    api::PostClient,
    error::{Error, Result},
    post::{Post, PostId},
    route::Mount,
};
use engagement::Engagement;

pub const DELETE_QUESTION: &str = "Are you sure you want to delete this post?";
const LOAD_FAILED: &str = "Failed to load posts. Please try again later.";
const DELETE_FAILED: &str = "Failed to delete post";
const UPLOAD_FAILED: &str = "Failed to upload bulk posts. Please ensure the file is valid.";
const UPLOAD_DONE: &str = "Bulk posts uploaded successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    Loading,
    Ready,
    Error(String),
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> impl Future<Output = bool>;
}

/// A fixed answer, for callers that already asked (e.g. `--yes`)
impl Confirm for bool {
    async fn confirm(&mut self, _question: &str) -> bool {
        *self
    }
}

/// The post feed with its session-local engagement.
///
/// Responses are applied in the order they are awaited; nothing fences an
/// older search against a newer one.
#[derive(Debug)]
pub struct Feed {
    client: PostClient,
    posts: Vec<Post>,
    state: FeedState,
    search_key: String,
    engagement: Engagement,
    notice: Option<String>,
    mount: Mount,
}

impl Feed {
    pub fn new(client: PostClient) -> Self {
        Self {
            client,
            posts: vec![],
            state: FeedState::Loading,
            search_key: String::new(),
            engagement: Engagement::default(),
            notice: None,
            mount: Mount::default(),
        }
    }

    pub async fn load(&mut self) {
        self.state = FeedState::Loading;
        let result = self.client.list().await;
        self.apply_posts(result);
    }

    /// Search by key; an empty key reloads the whole feed
    pub async fn search(&mut self, key: impl Into<String>) {
        self.search_key = key.into();
        self.state = FeedState::Loading;
        let result = if self.search_key.trim().is_empty() {
            self.client.list().await
        } else {
            self.client.search(&self.search_key).await
        };
        self.apply_posts(result);
    }

    fn apply_posts(&mut self, result: Result<Vec<Post>>) {
        if !self.mount.is_mounted() {
            return;
        }
        match result {
            Ok(posts) => {
                info!("{} posts", posts.len());
                self.posts = posts;
                self.state = FeedState::Ready;
            }
            Err(e) => {
                error!("Loading posts: {}", e);
                self.state = FeedState::Error(LOAD_FAILED.to_string());
            }
        }
    }

    /// Delete after confirmation; returns whether the post was removed
    pub async fn delete(&mut self, id: &PostId, confirm: &mut impl Confirm) -> bool {
        if !confirm.confirm(DELETE_QUESTION).await {
            return false;
        }

        let result = self.client.remove(id).await;
        if !self.mount.is_mounted() {
            return false;
        }
        match result {
            Ok(()) => {
                info!("Deleted post {}", id);
                self.posts.retain(|post| &post.id != id);
                true
            }
            Err(e) => {
                error!("Deleting post {}: {}", id, e);
                self.state = FeedState::Error(DELETE_FAILED.to_string());
                false
            }
        }
    }

    pub fn like(&mut self, id: &PostId) -> u64 {
        self.engagement.like(id)
    }

    pub fn toggle_comment_box(&mut self, id: &PostId) -> bool {
        self.engagement.toggle_comment_box(id)
    }

    pub fn post_comment(&mut self, id: &PostId, comment: &str) -> bool {
        self.engagement.post_comment(id, comment)
    }

    pub async fn bulk_upload(&mut self, path: &Path) -> bool {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => self.bulk_upload_text(&text).await,
            Err(source) => {
                let e = Error::Io {
                    path: path.to_path_buf(),
                    source,
                };
                self.upload_failed(e);
                false
            }
        }
    }

    /// Upload a JSON array of post records; the batch succeeds or fails as a whole
    pub async fn bulk_upload_text(&mut self, text: &str) -> bool {
        let records: Vec<Value> = match serde_json::from_str(text) {
            Ok(records) => records,
            Err(e) => {
                self.upload_failed(e.into());
                return false;
            }
        };

        let result = self.client.bulk_create(&records).await;
        if !self.mount.is_mounted() {
            return false;
        }
        match result {
            Ok(posts) => {
                info!("Uploaded {} posts", posts.len());
                self.posts.extend(posts);
                self.notice = Some(UPLOAD_DONE.to_string());
                true
            }
            Err(e) => {
                self.upload_failed(e);
                false
            }
        }
    }

    fn upload_failed(&mut self, e: Error) {
        error!("Bulk upload: {}", e);
        self.state = FeedState::Error(UPLOAD_FAILED.to_string());
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|post| &post.id == id)
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn search_key(&self) -> &str {
        &self.search_key
    }

    pub fn engagement(&self) -> &Engagement {
        &self.engagement
    }

    /// One-shot success message, cleared once read
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }
}
