use std::time::Duration;

use log::{debug, log_enabled, trace};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    post::{Draft, Post, PostId},
};

/// Client for the posts REST API
#[derive(Debug, Clone)]
pub struct PostClient {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PostClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base(config.api(), config.timeout())
    }

    pub fn with_base(base: &str, timeout: Option<Duration>) -> Result<Self> {
        // keep any path prefix (e.g. `/miclat`) when joining endpoints
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("postify/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);
        Ok(self.client.request(method, url))
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        debug!("{} {:?}", status, message);
        Err(Error::Api { status, message })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = Self::send(builder).await?;
        if log_enabled!(log::Level::Trace) {
            let body = response.text().await?;
            trace!("{}", body);
            return Ok(serde_json::from_str(&body)?);
        }
        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        Self::json(self.request(method, path)?.json(body)).await
    }

    /// Any 2xx counts as saved; the echoed post is read only if the body holds one
    async fn save(&self, method: Method, path: &str, draft: &Draft) -> Result<Option<Post>> {
        let response = Self::send(self.request(method, path)?.json(draft)).await?;
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!("Unreadable save response: {}", e);
                return Ok(None);
            }
        };
        trace!("{}", body);
        match serde_json::from_str(&body) {
            Ok(post) => Ok(Some(post)),
            Err(e) => {
                debug!("Save response is not a post: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Post>> {
        Self::json(self.request(Method::GET, "posts")?).await
    }

    /// Server-side search; a blank key lists everything
    pub async fn search(&self, key: &str) -> Result<Vec<Post>> {
        if key.trim().is_empty() {
            return self.list().await;
        }
        let path = format!("posts/search?key={}", urlencoding::encode(key));
        Self::json(self.request(Method::GET, &path)?).await
    }

    pub async fn get(&self, id: &PostId) -> Result<Post> {
        let path = format!("posts/{}", urlencoding::encode(id.as_str()));
        match Self::json(self.request(Method::GET, &path)?).await {
            Err(Error::Api { .. }) => Err(Error::NotFound { id: id.clone() }),
            result => result,
        }
    }

    pub async fn create(&self, draft: &Draft) -> Result<Option<Post>> {
        self.save(Method::POST, "post", draft).await
    }

    pub async fn update(&self, id: &PostId, draft: &Draft) -> Result<Option<Post>> {
        let path = format!("posts/{}", urlencoding::encode(id.as_str()));
        self.save(Method::PUT, &path, draft).await
    }

    pub async fn remove(&self, id: &PostId) -> Result<()> {
        let path = format!("posts/{}", urlencoding::encode(id.as_str()));
        Self::send(self.request(Method::DELETE, &path)?).await?;
        Ok(())
    }

    /// Records are forwarded untouched; the server owns their validation
    pub async fn bulk_create(&self, records: &[Value]) -> Result<Vec<Post>> {
        self.send_json(Method::POST, "bulk-posts", records).await
    }
}
