use std::{collections::BTreeSet, path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpPhotoSource, PhotoLibrary, PhotosViewModel, ViewState};
use shared::domain::PhotoId;
use storage::{KeyValueStore, MemoryStore, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "random-images", about = "Collect random picsum photos into a saved list")]
struct Args {
    /// Listing endpoint returning a JSON array of photos.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// SQLite file (or sqlite:// URL) holding the saved list.
    #[arg(long, global = true)]
    database: Option<String>,
    /// Keep the saved list in memory only.
    #[arg(long, global = true)]
    ephemeral: bool,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the listing and save one photo picked at random.
    Add,
    /// Show the saved photos in order.
    List,
    /// Remove a saved photo by id.
    Delete { id: String },
    /// Move the photos at the given positions before position `to`.
    Move {
        #[arg(long = "from", required = true, num_args = 1..)]
        from: Vec<usize>,
        #[arg(long)]
        to: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(database) = args.database {
        settings.database_url = database;
    }

    let store: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let database_url = config::prepare_database_url(&settings.database_url)?;
        Arc::new(Storage::new(&database_url).await?)
    };
    info!(endpoint = %settings.endpoint, ephemeral = args.ephemeral, "starting");

    let library = PhotoLibrary::open(store).await;
    let source = Arc::new(HttpPhotoSource::with_endpoint(settings.endpoint));
    let view_model = PhotosViewModel::new(source, library).await;

    match args.command {
        Command::Add => view_model.fetch_and_save_random_photo().await,
        Command::List => {}
        Command::Delete { id } => view_model.delete_photo(&PhotoId::new(id)).await,
        Command::Move { from, to } => {
            let source: BTreeSet<usize> = from.into_iter().collect();
            view_model.reorder_photos(&source, to).await;
        }
    }

    let state = view_model.state().await;
    print!("{}", render_photo_list(&state));

    if let Some(message) = state.error_message {
        bail!(message);
    }
    Ok(())
}

fn render_photo_list(state: &ViewState) -> String {
    if state.saved_photos.is_empty() {
        return "No saved photos yet. Run `random-images add` to fetch one.\n".to_string();
    }

    let mut out = String::new();
    for (index, photo) in state.saved_photos.iter().enumerate() {
        out.push_str(&format!(
            "{index:>3}  {:<6} {:<24} {:>5}x{:<5} {}\n",
            photo.id().as_str(),
            photo.author(),
            photo.width(),
            photo.height(),
            photo.thumbnail_url()
        ));
    }
    out
}
