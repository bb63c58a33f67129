use log::{error, info};
use url::Url;

use crate::{
    api::PostClient,
    error::Error,
    post::{Draft, MediaType, PostId},
    route::{Mount, Route},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Loading,
    Submitting,
    Error(String),
}

/// Create/edit form for a single post
#[derive(Debug)]
pub struct PostForm {
    client: PostClient,
    id: Option<PostId>,
    draft: Draft,
    state: FormState,
    mount: Mount,
}

impl PostForm {
    pub fn create(client: PostClient) -> Self {
        Self {
            client,
            id: None,
            draft: Draft::default(),
            state: FormState::Idle,
            mount: Mount::default(),
        }
    }

    /// Open the form for an existing post and load its fields
    pub async fn edit(client: PostClient, id: PostId) -> Self {
        let mut form = Self::create(client);
        form.id = Some(id);
        form.load().await;
        form
    }

    pub async fn load(&mut self) {
        let Some(id) = self.id.clone() else {
            return;
        };

        self.state = FormState::Loading;
        let result = self.client.get(&id).await;
        if !self.mount.is_mounted() {
            return;
        }

        match result {
            Ok(post) => {
                self.draft = post.into();
                self.state = FormState::Idle;
            }
            Err(e) => {
                error!("Loading post {}: {}", id, e);
                self.state = FormState::Error("Failed to load post data".to_string());
            }
        }
    }

    pub fn set_author(&mut self, author: String) {
        self.draft.author = author;
    }

    pub fn set_title(&mut self, title: String) {
        self.draft.title = title;
    }

    pub fn set_content(&mut self, content: String) {
        self.draft.content = content;
    }

    pub fn set_media_url(&mut self, media_url: String) {
        self.draft.media_url = media_url;
    }

    pub fn set_media_type(&mut self, media_type: MediaType) {
        self.draft.media_type = media_type;
        if media_type == MediaType::None {
            self.draft.media_url.clear();
        }
    }

    /// Checks that only the form itself can judge; length limits belong to the input
    pub fn validate(&self) -> Result<(), Error> {
        let draft = &self.draft;
        if draft.media_type == MediaType::Video
            && !draft.media_url.is_empty()
            && Url::parse(&draft.media_url).is_err()
        {
            return Err(Error::Validation("Please enter a valid video URL".to_string()));
        }
        Ok(())
    }

    /// Save the draft, returning where to navigate on success
    pub async fn submit(&mut self) -> Option<Route> {
        if let Err(e) = self.validate() {
            self.state = FormState::Error(e.to_string());
            return None;
        }

        self.state = FormState::Submitting;
        let result = match &self.id {
            Some(id) => self.client.update(id, &self.draft).await,
            None => self.client.create(&self.draft).await,
        };
        if !self.mount.is_mounted() {
            return None;
        }

        match result {
            Ok(saved) => {
                match saved {
                    Some(post) => info!("Saved post {}", post.id),
                    None => info!("Saved post"),
                }
                self.draft = Draft::default();
                self.state = FormState::Idle;
                Some(Route::Feed)
            }
            Err(e) => {
                error!("Saving post: {}", e);
                let message = match &e {
                    Error::Api { .. } => e
                        .server_message()
                        .unwrap_or("Failed to save post")
                        .to_string(),
                    _ => "Failed to submit post".to_string(),
                };
                self.state = FormState::Error(message);
                None
            }
        }
    }

    pub fn cancel(&mut self) -> Route {
        self.draft = Draft::default();
        self.mount.unmount();
        Route::Feed
    }

    pub fn route(&self) -> Route {
        match &self.id {
            Some(id) => Route::Edit(id.clone()),
            None => Route::Create,
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.id.is_some() {
            "Edit Post"
        } else {
            "Create Post"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.id.is_some() {
            "Update Post"
        } else {
            "Publish Post"
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> PostClient {
        PostClient::with_base(&server.base_url(), None).expect("client")
    }

    #[tokio::test]
    async fn edit_loads_draft() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/posts/5");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":5,"title":"Old","content":"Body","mediaType":"image","mediaUrl":"https://example.com/a.png"}"#);
        });

        let form = PostForm::edit(client(&server), PostId::from("5")).await;
        mock.assert();
        assert_eq!(form.state(), &FormState::Idle);
        assert_eq!(form.draft().title, "Old");
        assert_eq!(form.draft().media_type, MediaType::Image);
        assert_eq!(form.draft().author, "");
        assert_eq!(form.route(), Route::Edit("5".into()));
        assert_eq!(form.heading(), "Edit Post");
        assert_eq!(form.submit_label(), "Update Post");
    }

    #[tokio::test]
    async fn failed_load_keeps_draft() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/5");
            then.status(404);
        });

        let form = PostForm::edit(client(&server), PostId::from("5")).await;
        assert_eq!(
            form.state(),
            &FormState::Error("Failed to load post data".into())
        );
        assert_eq!(form.draft(), &Draft::default());
    }

    #[test]
    fn switching_to_none_clears_url() {
        let mut form = PostForm::create(PostClient::with_base("http://localhost", None).unwrap());
        form.set_media_type(MediaType::Image);
        form.set_media_url("https://example.com/a.png".into());
        form.set_media_type(MediaType::Video);
        assert_eq!(form.draft().media_url, "https://example.com/a.png");
        form.set_media_type(MediaType::None);
        assert_eq!(form.draft().media_url, "");
        assert_eq!(form.heading(), "Create Post");
        assert_eq!(form.submit_label(), "Publish Post");
    }

    #[tokio::test]
    async fn invalid_video_url_never_reaches_api() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/post");
            then.status(201).body("{}");
        });

        let mut form = PostForm::create(client(&server));
        form.set_title("t".into());
        form.set_content("c".into());
        form.set_media_type(MediaType::Video);
        form.set_media_url("not a url".into());

        assert!(matches!(form.validate(), Err(Error::Validation(_))));
        assert_eq!(form.submit().await, None);
        assert_eq!(
            form.state(),
            &FormState::Error("Please enter a valid video URL".into())
        );
        mock.assert_calls(0);
        assert_eq!(form.draft().media_url, "not a url");
    }

    #[tokio::test]
    async fn create_posts_and_navigates_to_feed() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/post").json_body(json!({
                "title": "t",
                "content": "c",
                "mediaUrl": "https://youtu.be/dQw4w9WgXcQ",
                "mediaType": "video",
                "author": "ana",
            }));
            then.status(201)
                .header("content-type", "application/json")
                .body(r#"{"id":1,"title":"t","content":"c"}"#);
        });

        let mut form = PostForm::create(client(&server));
        form.set_author("ana".into());
        form.set_title("t".into());
        form.set_content("c".into());
        form.set_media_type(MediaType::Video);
        form.set_media_url("https://youtu.be/dQw4w9WgXcQ".into());

        assert_eq!(form.submit().await, Some(Route::Feed));
        mock.assert();
        assert_eq!(form.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn update_without_body_still_navigates() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/2");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":2,"title":"a","content":"b"}"#);
        });
        let put = server.mock(|when, then| {
            when.method("PUT").path("/posts/2");
            then.status(204);
        });

        let mut form = PostForm::edit(client(&server), PostId::from("2")).await;
        form.set_title("new title".into());
        assert_eq!(form.submit().await, Some(Route::Feed));
        put.assert();
        assert_eq!(form.state(), &FormState::Idle);
        assert_eq!(form.draft(), &Draft::default());
    }

    #[tokio::test]
    async fn create_with_text_reply_navigates() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("POST").path("/post");
            then.status(201).body("Post created");
        });

        let mut form = PostForm::create(client(&server));
        form.set_title("t".into());
        form.set_content("c".into());
        assert_eq!(form.submit().await, Some(Route::Feed));
        mock.assert();
        assert_eq!(form.state(), &FormState::Idle);
    }

    #[tokio::test]
    async fn update_failure_keeps_draft_for_retry() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/2");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":2,"title":"a","content":"b"}"#);
        });
        server.mock(|when, then| {
            when.method("PUT").path("/posts/2");
            then.status(422)
                .header("content-type", "application/json")
                .body(r#"{"message":"Content is required"}"#);
        });

        let mut form = PostForm::edit(client(&server), PostId::from("2")).await;
        form.set_title("new title".into());
        assert_eq!(form.submit().await, None);
        assert_eq!(form.state(), &FormState::Error("Content is required".into()));
        assert_eq!(form.draft().title, "new title");
    }

    #[tokio::test]
    async fn failure_without_message_uses_fallback() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/post");
            then.status(500).body("oops");
        });

        let mut form = PostForm::create(client(&server));
        form.set_title("t".into());
        assert_eq!(form.submit().await, None);
        assert_eq!(form.state(), &FormState::Error("Failed to save post".into()));
    }

    #[tokio::test]
    async fn unreachable_api_reports_submit_failure() {
        let client = PostClient::with_base(
            "http://127.0.0.1:9",
            Some(std::time::Duration::from_secs(2)),
        )
        .unwrap();
        let mut form = PostForm::create(client);
        form.set_title("t".into());
        assert_eq!(form.submit().await, None);
        assert_eq!(form.state(), &FormState::Error("Failed to submit post".into()));
    }

    #[tokio::test]
    async fn unmounted_form_ignores_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/posts/3");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":3,"title":"late","content":"b"}"#);
        });

        let mut form = PostForm::create(client(&server));
        form.id = Some(PostId::from("3"));
        form.mount.unmount();
        form.load().await;
        assert_eq!(form.draft().title, "");
    }

    #[test]
    fn cancel_discards_draft() {
        let mut form = PostForm::create(PostClient::with_base("http://localhost", None).unwrap());
        form.set_title("draft".into());
        assert_eq!(form.cancel(), Route::Feed);
        assert_eq!(form.draft(), &Draft::default());
        assert!(!form.mount.is_mounted());
    }
}
