use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::{
    feed::{engagement::Engagement, Feed, FeedState},
    form::{FormState, PostForm},
    post::{media::RenderPlan, Post},
};

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43200;

/// "3 minutes ago", "in about 2 hours" and so on
pub fn relative_time(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - time).num_seconds();
    let distance = distance((seconds.abs() as f64 / 60.0).round() as i64);
    if seconds >= 0 {
        format!("{distance} ago")
    } else {
        format!("in {distance}")
    }
}

fn distance(minutes: i64) -> String {
    let round = |unit: i64| (minutes as f64 / unit as f64).round() as i64;
    match minutes {
        0 => "less than a minute".to_string(),
        1..=44 => count(minutes, "minute"),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {}", count(round(60), "hour")),
        1440..=2519 => "1 day".to_string(),
        2520..=43199 => count(round(MINUTES_IN_DAY), "day"),
        43200..=86399 => format!("about {}", count(round(MINUTES_IN_MONTH), "month")),
        _ => {
            let months = minutes / MINUTES_IN_MONTH;
            if months < 12 {
                return count(round(MINUTES_IN_MONTH), "month");
            }
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", count(years, "year")),
                3..=8 => format!("over {}", count(years, "year")),
                _ => format!("almost {}", count(years + 1, "year")),
            }
        }
    }
}

fn count(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

pub fn posted(post: &Post, now: DateTime<Utc>) -> String {
    post.created_at()
        .map(|time| relative_time(time, now))
        .unwrap_or_else(|| "Unknown time".to_string())
}

pub fn media(plan: &RenderPlan) -> Option<String> {
    match plan {
        RenderPlan::None => None,
        RenderPlan::Image { url } => Some(format!("[image] {url}")),
        RenderPlan::YouTubeEmbed { .. } => plan
            .embed_url()
            .map(|embed| format!("[youtube] {embed}")),
        RenderPlan::RawVideo { url, mime } => Some(format!("[video {mime}] {url}")),
    }
}

pub fn card(post: &Post, engagement: &Engagement, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {} · {}", post.id, post.author_name(), posted(post, now));
    let _ = writeln!(out, "  {}", post.title);
    for line in post.content.lines() {
        let _ = writeln!(out, "  {line}");
    }
    if let Some(media) = media(&post.render_plan()) {
        let _ = writeln!(out, "  {media}");
    }

    let _ = write!(out, "  Like ({})", engagement.likes(&post.id));
    if engagement.is_comment_box_open(&post.id) {
        let _ = write!(out, " · comment box open");
    }
    out.push('\n');
    for comment in engagement.comments(&post.id) {
        let _ = writeln!(out, "    > {comment}");
    }
    out
}

pub fn feed(feed: &Feed, now: DateTime<Utc>) -> String {
    match feed.state() {
        FeedState::Loading => return "Loading posts...\n".to_string(),
        FeedState::Error(message) => return format!("{message}\n"),
        FeedState::Ready => {}
    }

    if feed.posts().is_empty() {
        return "No posts yet. Be the first to share something!\n".to_string();
    }

    let mut out = String::from("Your Feed\n");
    if !feed.search_key().trim().is_empty() {
        let _ = writeln!(out, "Results for \"{}\"", feed.search_key().trim());
    }
    out.push('\n');
    for post in feed.posts() {
        out.push_str(&card(post, feed.engagement(), now));
        out.push('\n');
    }
    out
}

pub fn form(form: &PostForm) -> String {
    let draft = form.draft();
    let mut out = format!("{}\n", form.heading());
    match form.state() {
        FormState::Loading => out.push_str("Loading...\n"),
        FormState::Submitting => out.push_str("Processing...\n"),
        FormState::Error(message) => {
            let _ = writeln!(out, "{message}");
        }
        FormState::Idle => {}
    }
    let _ = writeln!(out, "  author: {}", draft.author);
    let _ = writeln!(out, "  title: {}", draft.title);
    let _ = writeln!(out, "  content: {}", draft.content);
    let _ = writeln!(out, "  media: {}", draft.media_type);
    if !draft.media_url.is_empty() {
        let _ = writeln!(out, "  url: {}", draft.media_url);
    }
    let _ = writeln!(out, "  [{}]", form.submit_label());
    out
}
