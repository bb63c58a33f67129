mod api;
mod config;
mod error;
mod feed;
mod form;
mod post;
mod route;
mod shell;
mod view;

use std::error::Error;

use api::PostClient;
use chrono::Utc;
use config::{Command, Config};
use feed::{Feed, FeedState};
use form::PostForm;
use log::{error, info};
use route::Route;
use shell::Prompt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();

    let client = PostClient::new(&config)?;
    info!("API: {}", client.base());

    match config.command() {
        Command::Feed => shell::run(client).await,
        Command::List => show_feed(client, None).await,
        Command::Search { key } => show_feed(client, Some(key)).await,
        Command::Show { id } => match client.get(&id).await {
            Ok(post) => print!(
                "{}",
                view::card(&post, &Default::default(), Utc::now())
            ),
            Err(e) => {
                error!("{}", e);
                println!("Failed to load post data");
            }
        },
        Command::Create(fields) => {
            let mut form = PostForm::create(client.clone());
            fields.apply(&mut form);
            submit(form, client).await;
        }
        Command::Edit { id, fields } => {
            let mut form = PostForm::edit(client.clone(), id).await;
            if matches!(form.state(), form::FormState::Error(_)) {
                print!("{}", view::form(&form));
                return Ok(());
            }
            if fields.is_empty() {
                info!("Nothing to change, back to {}", form.cancel());
                return Ok(());
            }
            fields.apply(&mut form);
            submit(form, client).await;
        }
        Command::Delete { id, yes } => {
            let mut feed = Feed::new(client);
            let removed = if yes {
                feed.delete(&id, &mut true).await
            } else {
                feed.delete(&id, &mut Prompt::stdin()).await
            };
            match feed.state() {
                FeedState::Error(message) => println!("{message}"),
                _ if removed => println!("Deleted #{id}"),
                _ => {}
            }
        }
        Command::Upload { file } => {
            let mut feed = Feed::new(client);
            feed.load().await;
            feed.bulk_upload(&file).await;
            if let Some(notice) = feed.take_notice() {
                println!("{notice}");
            }
            print!("{}", view::feed(&feed, Utc::now()));
        }
        Command::Open { route } => match route {
            Route::Feed => show_feed(client, None).await,
            Route::Create => print!("{}", view::form(&PostForm::create(client))),
            Route::Edit(id) => print!("{}", view::form(&PostForm::edit(client, id).await)),
        },
    }

    Ok(())
}

async fn show_feed(client: PostClient, key: Option<String>) {
    let mut feed = Feed::new(client);
    match key {
        Some(key) => feed.search(key).await,
        None => feed.load().await,
    }
    print!("{}", view::feed(&feed, Utc::now()));
}

async fn submit(mut form: PostForm, client: PostClient) {
    info!("{} ({})", form.heading(), form.route());
    match form.submit().await {
        Some(Route::Feed) => show_feed(client, None).await,
        Some(route) => info!("Navigating to {}", route),
        None => print!("{}", view::form(&form)),
    }
}
