//! # syndication-bridge
//!
//! - `normalize`: reshape a saved API response the way the search handler
//!   would, reading from a file or stdin.
//! - `demo`: run search, import and group flows against in-memory
//!   collaborators, with tracing on.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use syndication_bridge::clients::DocumentLibrary;
use syndication_bridge::config::Settings;
use syndication_bridge::handlers::{AjaxAction, AjaxRequest};
use syndication_bridge::lifecycle::{setup_tracing, BridgeSystem};
use syndication_bridge::model::{Document, UserId};
use syndication_bridge::normalizer;
use tracing::{error, info, Instrument};

const DEMO_TOKEN: &str = "demo-token";
const DEMO_USER: UserId = UserId(1);

#[derive(Debug, Parser)]
#[command(name = "syndication-bridge", version, about)]
struct Cli {
    /// TOML settings file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize an SDK response and print the envelope (or `null`).
    Normalize {
        /// SDK method that produced the response, e.g. `fetchDoc` or `queryDocs`.
        #[arg(long)]
        method: String,

        /// Response file; stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Run the handlers end to end against in-memory collaborators.
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    match cli.command {
        Command::Normalize { method, file } => run_normalize(&method, file),
        Command::Demo => run_demo(settings).await,
    }
}

fn run_normalize(method: &str, file: Option<PathBuf>) -> anyhow::Result<()> {
    let raw = match &file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let value: Value = serde_json::from_str(&raw).context("response is not JSON")?;
    let envelope = normalizer::normalize_method(method, Some(&value))?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn run_demo(settings: Settings) -> anyhow::Result<()> {
    info!("Starting demo");

    let library = Arc::new(DocumentLibrary::new(settings.api.base_url()));
    seed_library(&library, &settings)?;

    let nonce_field = settings.ajax.nonce_field.clone();
    let nonce_action = settings.ajax.nonce_action.clone();
    let system = BridgeSystem::with_store(settings, library.clone(), |store| {
        store
            .with_nonce(nonce_action, DEMO_TOKEN)
            .with_user(DEMO_USER, ["edit_posts", "manage_options"])
    });

    let request = || AjaxRequest::new(DEMO_USER).with_field(nonce_field.as_str(), DEMO_TOKEN);

    // Search
    let span = tracing::info_span!("search");
    let found = async {
        let response = system
            .dispatch(
                AjaxAction::Search.name(),
                &request().with_field("query", json!({"text": "harbor"}).to_string()),
            )
            .await;
        info!(status = response.status, total = %response.body["data"]["total"], "Search finished");
        response
    }
    .instrument(span)
    .await;

    // Import the first hit as a draft
    let span = tracing::info_span!("import");
    let story = found.body["data"]["items"][0].clone();
    async {
        let post_data = json!({
            "attributes": story["attributes"],
            "attachment": library
                .get("demo-image-1")?
                .map(|image| json!({"attributes": image.attributes, "links": image.links})),
        });
        let response = system
            .dispatch(
                AjaxAction::DraftPost.name(),
                &request().with_field("post_data", post_data.to_string()),
            )
            .await;
        if response.is_success() {
            info!(edit_url = %response.body["data"]["edit_url"], "Draft imported");
        } else {
            error!(body = %response.body, "Draft import failed");
        }
        anyhow::Ok(())
    }
    .instrument(span)
    .await?;

    // Groups
    let span = tracing::info_span!("groups");
    async {
        let group = json!({"attributes": {"guid": "demo-group-1", "title": "Demo Newsroom"}});
        for action in [AjaxAction::CreateGroup, AjaxAction::DefaultGroup] {
            let response = system
                .dispatch(action.name(), &request().with_field("group", group.to_string()))
                .await;
            info!(%action, status = response.status, "Group action finished");
        }

        let rename = json!({"attributes": {"guid": "demo-group-1", "title": "Renamed Newsroom"}});
        let response = system
            .dispatch(
                AjaxAction::ModifyGroup.name(),
                &request().with_field("group", rename.to_string()),
            )
            .await;
        info!(status = response.status, "Group modified");
    }
    .instrument(span)
    .await;

    info!(documents = library.len(), "Library after demo");
    system.shutdown().await.map_err(anyhow::Error::msg)?;
    info!("Demo completed successfully");
    Ok(())
}

fn seed_library(library: &DocumentLibrary, settings: &Settings) -> anyhow::Result<()> {
    let profile = |name: &str| json!([{ "href": settings.api.profile_href(name) }]);

    let docs = [
        json!({
            "attributes": {
                "guid": "demo-story-1",
                "title": "Harbor reopens after storm",
                "teaser": "Boats are back.",
                "contentencoded": "<p>The harbor reopened on Tuesday.</p>",
                "byline": "A. Reporter",
                "published": "2014-03-06T15:42:00-05:00",
                "created": "2014-03-06T15:00:00+00:00",
                "modified": "2014-03-06T16:00:00+00:00"
            },
            "links": { "profile": profile("story") }
        }),
        json!({
            "attributes": {
                "guid": "demo-story-2",
                "title": "City council budget vote",
                "teaser": "A close vote.",
                "published": "2014-03-07T09:00:00+00:00"
            },
            "links": { "profile": profile("story") }
        }),
        json!({
            "attributes": {
                "guid": "demo-image-1",
                "title": "Boats in the harbor",
                "description": "Fishing boats return to the harbor.",
                "byline": "P. Photographer"
            },
            "links": {
                "profile": profile("image"),
                "enclosure": [
                    {"href": "https://media.example.org/harbor-square.jpg", "meta": {"crop": "square"}},
                    {"href": "https://media.example.org/harbor.jpg", "meta": {"crop": "standard"}}
                ]
            }
        }),
    ];

    for doc in &docs {
        library.insert(Document::from_value(doc)?)?;
    }
    info!(documents = library.len(), "Library seeded");
    Ok(())
}
