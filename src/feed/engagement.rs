use std::collections::HashMap;

use crate::post::PostId;

/// Likes and comments made during this session.
///
/// Never sent to the server and gone on restart; kept apart from [`Post`](crate::post::Post)
/// so it can't leak into anything persisted.
#[derive(Debug, Default)]
pub struct Engagement {
    likes: HashMap<PostId, u64>,
    comments: HashMap<PostId, Vec<String>>,
    comment_box: HashMap<PostId, bool>,
}

impl Engagement {
    pub fn like(&mut self, id: &PostId) -> u64 {
        let likes = self.likes.entry(id.clone()).or_default();
        *likes += 1;
        *likes
    }

    pub fn likes(&self, id: &PostId) -> u64 {
        self.likes.get(id).copied().unwrap_or_default()
    }

    /// Returns whether the box is now open
    pub fn toggle_comment_box(&mut self, id: &PostId) -> bool {
        let open = self.comment_box.entry(id.clone()).or_default();
        *open = !*open;
        *open
    }

    pub fn is_comment_box_open(&self, id: &PostId) -> bool {
        self.comment_box.get(id).copied().unwrap_or_default()
    }

    /// Blank comments are dropped; returns whether anything was added
    pub fn post_comment(&mut self, id: &PostId, comment: &str) -> bool {
        let comment = comment.trim();
        if comment.is_empty() {
            return false;
        }
        self.comments
            .entry(id.clone())
            .or_default()
            .push(comment.to_string());
        true
    }

    pub fn comments(&self, id: &PostId) -> &[String] {
        self.comments.get(id).map(Vec::as_slice).unwrap_or_default()
    }
}
