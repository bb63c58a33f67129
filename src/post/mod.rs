pub mod media;

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use media::RenderPlan;

/// Opaque post identifier assigned by the API.
///
/// The API is free to send ids as strings or numbers; both end up here as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawPostId")]
pub struct PostId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPostId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawPostId> for PostId {
    fn from(raw: RawPostId) -> Self {
        match raw {
            RawPostId::Text(id) => Self(id),
            RawPostId::Number(id) => Self(id.to_string()),
        }
    }
}

impl PostId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Hash, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    None,
    Image,
    Video,
}

impl MediaType {
    /// Lenient parse used for server data; unknown values yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Image => write!(f, "image"),
            Self::Video => write!(f, "video"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: PostId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_media_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_type: Option<MediaType>,
    /// Timestamp text, or epoch milliseconds kept as digits
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Post {
    pub fn author_name(&self) -> &str {
        match self.author.as_deref().map(str::trim) {
            Some(author) if !author.is_empty() => author,
            _ => "Anonymous",
        }
    }

    pub fn render_plan(&self) -> RenderPlan {
        media::resolve(self.media_url.as_deref().unwrap_or_default(), self.media_type)
    }

    /// Creation time, if the server sent one we can read.
    ///
    /// Zone-less timestamps are taken as UTC, bare integers as epoch milliseconds.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(millis) = raw.parse::<i64>() {
            return DateTime::from_timestamp_millis(millis);
        }
        if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
            return Some(time.to_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|time| time.and_utc())
    }
}

/// Editable fields of a post, sent as the body of create and update
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub media_url: String,
    pub media_type: MediaType,
    pub author: String,
}

impl From<Post> for Draft {
    fn from(post: Post) -> Self {
        Self {
            title: post.title,
            content: post.content,
            media_url: post.media_url.unwrap_or_default(),
            media_type: post.media_type.unwrap_or_default(),
            author: post.author.unwrap_or_default(),
        }
    }
}

/// Scalars become text; null, arrays and objects are dropped instead of failing the post
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_media_type<'de, D>(deserializer: D) -> Result<Option<MediaType>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.as_deref().and_then(MediaType::parse))
}
