use std::{io::Write, path::PathBuf, str::FromStr};

use chrono::Utc;
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    api::PostClient,
    feed::{Confirm, Feed, FeedState},
    post::PostId,
    view,
};

const HELP: &str = "\
Commands:
  list                 reload the feed
  search [key]         search posts (empty key lists all)
  like <id>            like a post
  comment <id>         open or close the comment box of a post
  say <id> <text>      post a comment (comment box must be open)
  delete <id>          delete a post
  upload <file>        bulk upload a JSON array of posts
  help                 show this help
  quit                 leave
";

/// Line-based reader over stdin
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn ask(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        if let Err(e) = std::io::stdout().flush() {
            debug!("stdout: {}", e);
        }
        match self.lines.next_line().await {
            Ok(line) => line,
            Err(e) => {
                debug!("stdin: {}", e);
                None
            }
        }
    }
}

impl Confirm for Prompt {
    async fn confirm(&mut self, question: &str) -> bool {
        let answer = self.ask(&format!("{question} [y/N] ")).await;
        matches!(
            answer.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Search(String),
    Like(PostId),
    Comment(PostId),
    Say(PostId, String),
    Delete(PostId),
    Upload(PathBuf),
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let id = || {
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                Err(format!("usage: {command} <id>"))
            } else {
                Ok(PostId::from(rest))
            }
        };

        match command {
            "list" | "ls" => Ok(Self::List),
            "search" => Ok(Self::Search(rest.to_string())),
            "like" => id().map(Self::Like),
            "comment" => id().map(Self::Comment),
            "delete" | "rm" => id().map(Self::Delete),
            "say" => match rest.split_once(char::is_whitespace) {
                Some((id, text)) => Ok(Self::Say(id.into(), text.to_string())),
                None => Err("usage: say <id> <text>".to_string()),
            },
            "upload" if !rest.is_empty() => Ok(Self::Upload(PathBuf::from(rest))),
            "upload" => Err("usage: upload <file>".to_string()),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(format!("unknown command `{command}`, try `help`")),
        }
    }
}

/// Interactive feed session
pub async fn run(client: PostClient) {
    let mut feed = Feed::new(client);
    let mut prompt = Prompt::stdin();

    print!("{}", view::feed(&feed, Utc::now()));
    feed.load().await;
    print!("{}", view::feed(&feed, Utc::now()));
    println!("Type `help` for commands.");

    while let Some(line) = prompt.ask("> ").await {
        if line.trim().is_empty() {
            continue;
        }
        let action = match line.parse::<Action>() {
            Ok(Action::Quit) => break,
            Ok(action) => action,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        handle(&mut feed, &mut prompt, action).await;
    }

    feed.mount().unmount();
}

async fn handle(feed: &mut Feed, prompt: &mut Prompt, action: Action) {
    let now = Utc::now();
    match action {
        Action::List => {
            feed.load().await;
            print!("{}", view::feed(feed, now));
        }
        Action::Search(key) => {
            feed.search(key).await;
            print!("{}", view::feed(feed, now));
        }
        Action::Like(id) => {
            if let Some(post) = feed.post(&id).cloned() {
                feed.like(&id);
                print!("{}", view::card(&post, feed.engagement(), now));
            } else {
                println!("No post #{id}");
            }
        }
        Action::Comment(id) => {
            if feed.post(&id).is_none() {
                println!("No post #{id}");
            } else if feed.toggle_comment_box(&id) {
                println!("Comment box open, use `say {id} <text>`");
            } else {
                println!("Comment box closed");
            }
        }
        Action::Say(id, text) => {
            if !feed.engagement().is_comment_box_open(&id) {
                println!("Open the comment box first with `comment {id}`");
            } else if feed.post_comment(&id, &text) {
                if let Some(post) = feed.post(&id) {
                    print!("{}", view::card(post, feed.engagement(), now));
                }
            }
        }
        Action::Delete(id) => {
            if feed.post(&id).is_none() {
                println!("No post #{id}");
            } else if feed.delete(&id, prompt).await {
                println!("Deleted #{id}");
            } else if let FeedState::Error(message) = feed.state() {
                println!("{message}");
            }
        }
        Action::Upload(path) => {
            feed.bulk_upload(&path).await;
            if let Some(notice) = feed.take_notice() {
                println!("{notice}");
            }
            print!("{}", view::feed(feed, now));
        }
        Action::Help => print!("{HELP}"),
        Action::Quit => {}
    }
}
