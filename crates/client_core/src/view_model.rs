use std::{collections::BTreeSet, sync::Arc};

use rand::seq::SliceRandom;
use shared::domain::{Photo, PhotoId};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    library::{LibraryEvent, PhotoLibraryHandle},
    network::PhotoSource,
};

pub const NO_IMAGES_MESSAGE: &str = "No images available";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub saved_photos: Vec<Photo>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// Drives the "add a random image" action and mirrors the saved list for display.
pub struct PhotosViewModel {
    source: Arc<dyn PhotoSource>,
    library: Arc<dyn PhotoLibraryHandle>,
    state: Mutex<ViewState>,
    updates: Mutex<broadcast::Receiver<LibraryEvent>>,
}

impl PhotosViewModel {
    pub async fn new(
        source: Arc<dyn PhotoSource>,
        library: Arc<dyn PhotoLibraryHandle>,
    ) -> Self {
        let updates = library.subscribe();
        let saved_photos = library.photos().await;
        Self {
            source,
            library,
            state: Mutex::new(ViewState {
                saved_photos,
                ..ViewState::default()
            }),
            updates: Mutex::new(updates),
        }
    }

    pub async fn fetch_and_save_random_photo(&self) {
        {
            let mut state = self.state.lock().await;
            state.is_loading = true;
            state.error_message = None;
        }

        let error_message = match self.source.fetch_photos().await {
            Ok(photos) => match pick_random(&photos) {
                Some(photo) => {
                    info!(photo_id = %photo.id(), author = photo.author(), "saving random photo");
                    self.library.save_photo(photo.clone()).await;
                    None
                }
                None => Some(NO_IMAGES_MESSAGE.to_string()),
            },
            Err(err) => {
                warn!(status = ?err.status(), "photo fetch failed: {err}");
                Some(err.to_string())
            }
        };

        let mut state = self.state.lock().await;
        state.error_message = error_message;
        state.is_loading = false;
    }

    pub async fn delete_photo(&self, id: &PhotoId) {
        self.library.delete_photo(id).await;
    }

    pub async fn reorder_photos(&self, source: &BTreeSet<usize>, destination: usize) {
        self.library.reorder_photos(source, destination).await;
    }

    pub async fn dismiss_error(&self) {
        self.state.lock().await.error_message = None;
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading
    }

    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error_message.clone()
    }

    /// Snapshot for rendering, with every library change published so far applied.
    pub async fn state(&self) -> ViewState {
        self.sync_saved_photos().await;
        self.state.lock().await.clone()
    }

    async fn sync_saved_photos(&self) {
        let mut updates = self.updates.lock().await;
        let mut latest = None;
        loop {
            match updates.try_recv() {
                Ok(LibraryEvent::Changed(photos)) => latest = Some(photos),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "library updates lagged; resyncing");
                    latest = Some(self.library.photos().await);
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }

        if let Some(photos) = latest {
            self.state.lock().await.saved_photos = photos;
        }
    }
}

fn pick_random(photos: &[Photo]) -> Option<&Photo> {
    photos.choose(&mut rand::thread_rng())
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
