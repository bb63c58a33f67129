use std::sync::LazyLock;

use mime_guess::MimeGuess;
use regex::Regex;

use super::MediaType;

static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:youtube\.com/(?:shorts/|watch\?v=)|youtu\.be/)([^"&?/\s]{11})"#)
        .expect("Invalid youtube regex")
});

const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// How a post's media should be presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    None,
    Image { url: String },
    YouTubeEmbed { video_id: String },
    RawVideo { url: String, mime: String },
}

impl RenderPlan {
    pub fn embed_url(&self) -> Option<String> {
        match self {
            Self::YouTubeEmbed { video_id } => {
                Some(format!("https://www.youtube.com/embed/{video_id}"))
            }
            _ => None,
        }
    }
}

pub fn resolve(media_url: &str, media_type: Option<MediaType>) -> RenderPlan {
    if media_url.is_empty() {
        return RenderPlan::None;
    }

    match effective_type(media_url, media_type) {
        MediaType::None => RenderPlan::None,
        MediaType::Image => RenderPlan::Image {
            url: media_url.to_string(),
        },
        MediaType::Video => match youtube_id(media_url) {
            Some(video_id) => RenderPlan::YouTubeEmbed { video_id },
            None => RenderPlan::RawVideo {
                url: media_url.to_string(),
                mime: video_mime(media_url),
            },
        },
    }
}

/// Declared type wins; legacy posts without one are sniffed from the URL
pub fn effective_type(media_url: &str, media_type: Option<MediaType>) -> MediaType {
    media_type.unwrap_or_else(|| {
        if media_url.contains("youtube") || media_url.contains("youtu.be") {
            MediaType::Video
        } else {
            MediaType::Image
        }
    })
}

pub fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn video_mime(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    MimeGuess::from_path(path)
        .iter()
        .find(|mime| mime.type_() == mime_guess::mime::VIDEO)
        .map(|mime| mime.to_string())
        .unwrap_or_else(|| DEFAULT_VIDEO_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtu_be_link_embeds() {
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ", Some(MediaType::Video)),
            RenderPlan::YouTubeEmbed {
                video_id: "dQw4w9WgXcQ".into()
            }
        );
    }

    #[test]
    fn watch_and_shorts_links_embed() {
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ".into())
        );
        assert_eq!(
            youtube_id("https://YouTube.com/shorts/abcdefghijk"),
            Some("abcdefghijk".into())
        );
        assert_eq!(youtube_id("https://youtu.be/short"), None);
        assert_eq!(youtube_id("https://vimeo.com/123456789012"), None);
    }

    #[test]
    fn plain_video_url_is_raw_video() {
        assert_eq!(
            resolve("https://example.com/v.mp4", Some(MediaType::Video)),
            RenderPlan::RawVideo {
                url: "https://example.com/v.mp4".into(),
                mime: "video/mp4".into()
            }
        );
        match resolve("https://example.com/clip.webm?x=1", Some(MediaType::Video)) {
            RenderPlan::RawVideo { mime, .. } => assert_eq!(mime, "video/webm"),
            plan => panic!("unexpected plan {plan:?}"),
        }
        match resolve("https://example.com/stream", Some(MediaType::Video)) {
            RenderPlan::RawVideo { mime, .. } => assert_eq!(mime, "video/mp4"),
            plan => panic!("unexpected plan {plan:?}"),
        }
    }

    #[test]
    fn image_url_is_image() {
        assert_eq!(
            resolve("https://example.com/i.jpg", Some(MediaType::Image)),
            RenderPlan::Image {
                url: "https://example.com/i.jpg".into()
            }
        );
    }

    #[test]
    fn empty_url_renders_nothing() {
        for media_type in [None, Some(MediaType::None), Some(MediaType::Image), Some(MediaType::Video)] {
            assert_eq!(resolve("", media_type), RenderPlan::None);
        }
    }

    #[test]
    fn declared_none_renders_nothing() {
        assert_eq!(
            resolve("https://example.com/i.jpg", Some(MediaType::None)),
            RenderPlan::None
        );
    }

    #[test]
    fn missing_type_is_inferred() {
        assert_eq!(
            effective_type("https://www.youtube.com/watch?v=dQw4w9WgXcQ", None),
            MediaType::Video
        );
        assert_eq!(effective_type("https://example.com/i.png", None), MediaType::Image);
        // declared type is authoritative
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ", Some(MediaType::Image)),
            RenderPlan::Image {
                url: "https://youtu.be/dQw4w9WgXcQ".into()
            }
        );
    }

    #[test]
    fn embed_url_points_at_youtube() {
        let plan = resolve("https://youtu.be/dQw4w9WgXcQ", None);
        assert_eq!(
            plan.embed_url().as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(RenderPlan::None.embed_url(), None);
    }
}
