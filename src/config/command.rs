use std::path::PathBuf;

use clap::{Args, Subcommand};
use log::warn;

use crate::{
    form::PostForm,
    post::{MediaType, PostId},
    route::Route,
};

const TITLE_MAX: usize = 100;
const CONTENT_MAX: usize = 2000;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive feed session (default)
    Feed,
    /// Print every post
    List,
    /// Print posts matching a search key
    Search { key: String },
    /// Print a single post
    Show { id: PostId },
    /// Publish a new post
    Create(NewPost),
    /// Edit an existing post
    Edit {
        id: PostId,
        #[command(flatten)]
        fields: PostChanges,
    },
    /// Delete a post
    Delete {
        id: PostId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Upload a JSON array of posts
    Upload { file: PathBuf },
    /// Print the view at a path: `/`, `/create` or `/edit/{id}`
    Open { route: Route },
}

#[derive(Debug, Clone, Args)]
pub struct NewPost {
    #[arg(long, value_parser = title)]
    pub title: String,
    #[arg(long, value_parser = content)]
    pub content: String,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long, value_enum)]
    pub media_type: Option<MediaType>,
    #[arg(long, requires = "media_type")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct PostChanges {
    #[arg(long, value_parser = title)]
    pub title: Option<String>,
    #[arg(long, value_parser = content)]
    pub content: Option<String>,
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long, value_enum)]
    pub media_type: Option<MediaType>,
    #[arg(long)]
    pub media_url: Option<String>,
}

impl NewPost {
    pub fn apply(self, form: &mut PostForm) {
        PostChanges {
            title: Some(self.title),
            content: Some(self.content),
            author: self.author,
            media_type: self.media_type,
            media_url: self.media_url,
        }
        .apply(form)
    }
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.media_type.is_none()
            && self.media_url.is_none()
    }

    pub fn apply(self, form: &mut PostForm) {
        if let Some(title) = self.title {
            form.set_title(title);
        }
        if let Some(content) = self.content {
            form.set_content(content);
        }
        if let Some(author) = self.author {
            form.set_author(author);
        }
        // type first: switching to `none` clears the url
        if let Some(media_type) = self.media_type {
            form.set_media_type(media_type);
        }
        if let Some(media_url) = self.media_url {
            if form.draft().media_type == MediaType::None {
                warn!("Ignoring --media-url for a post without media");
            } else {
                form.set_media_url(media_url);
            }
        }
    }
}

fn title(value: &str) -> Result<String, String> {
    bounded("title", value, TITLE_MAX)
}

fn content(value: &str) -> Result<String, String> {
    bounded("content", value, CONTENT_MAX)
}

fn bounded(field: &str, value: &str, max: usize) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    let len = value.chars().count();
    if len > max {
        return Err(format!("{field} is {len} characters, the limit is {max}"));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PostClient;

    fn form() -> PostForm {
        PostForm::create(PostClient::with_base("http://localhost", None).unwrap())
    }

    #[test]
    fn media_type_applies_before_url() {
        let mut form = form();
        form.set_media_type(MediaType::Image);
        form.set_media_url("https://example.com/old.png".into());

        PostChanges {
            media_type: Some(MediaType::Video),
            media_url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            ..Default::default()
        }
        .apply(&mut form);
        assert_eq!(form.draft().media_type, MediaType::Video);
        assert_eq!(form.draft().media_url, "https://youtu.be/dQw4w9WgXcQ");

        PostChanges {
            media_type: Some(MediaType::None),
            ..Default::default()
        }
        .apply(&mut form);
        assert_eq!(form.draft().media_url, "");
    }

    #[test]
    fn media_url_ignored_without_media() {
        let mut form = form();
        PostChanges {
            title: Some("t".into()),
            media_url: Some("https://example.com/a.png".into()),
            ..Default::default()
        }
        .apply(&mut form);
        assert_eq!(form.draft().title, "t");
        assert_eq!(form.draft().media_type, MediaType::None);
        assert_eq!(form.draft().media_url, "");
    }

    #[test]
    fn new_post_fills_every_field() {
        let mut form = form();
        NewPost {
            title: "Hello".into(),
            content: "World".into(),
            author: Some("ana".into()),
            media_type: Some(MediaType::Image),
            media_url: Some("https://example.com/a.png".into()),
        }
        .apply(&mut form);
        let draft = form.draft();
        assert_eq!(
            (draft.title.as_str(), draft.content.as_str(), draft.author.as_str()),
            ("Hello", "World", "ana")
        );
        assert_eq!(draft.media_url, "https://example.com/a.png");
    }

    #[test]
    fn no_flags_is_empty() {
        assert!(PostChanges::default().is_empty());
        assert!(!PostChanges {
            author: Some(String::new()),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn length_limits() {
        assert!(title(&"x".repeat(TITLE_MAX)).is_ok());
        assert_eq!(
            title(&"x".repeat(TITLE_MAX + 1)),
            Err("title is 101 characters, the limit is 100".to_string())
        );
        assert!(content(&"é".repeat(CONTENT_MAX)).is_ok());
        assert_eq!(content("  "), Err("content must not be empty".to_string()));
    }
}
