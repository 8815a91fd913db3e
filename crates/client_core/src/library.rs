use std::{collections::BTreeSet, sync::Arc};

use async_trait::async_trait;
use shared::domain::{Photo, PhotoId};
use storage::KeyValueStore;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

pub const SAVED_PHOTOS_KEY: &str = "SavedPhotoEntries";
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// Full contents of the saved list after a change, in display order.
    Changed(Vec<Photo>),
}

#[async_trait]
pub trait PhotoLibraryHandle: Send + Sync {
    async fn save_photo(&self, photo: Photo);
    async fn delete_photo(&self, id: &PhotoId);
    async fn reorder_photos(&self, source: &BTreeSet<usize>, destination: usize);
    async fn load_saved_photos(&self);
    async fn photos(&self) -> Vec<Photo>;
    fn subscribe(&self) -> broadcast::Receiver<LibraryEvent>;
}

/// The user's saved photos, mirrored wholesale into one key of a [`KeyValueStore`].
///
/// Mutations hold the list lock across the storage write and the change
/// broadcast, so concurrent callers are applied one at a time and observers
/// see changes in the order they were applied.
pub struct PhotoLibrary {
    store: Arc<dyn KeyValueStore>,
    photos: Mutex<Vec<Photo>>,
    events: broadcast::Sender<LibraryEvent>,
}

impl PhotoLibrary {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            store,
            photos: Mutex::new(Vec::new()),
            events,
        })
    }

    /// Builds the library and loads whatever was previously saved.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Arc<Self> {
        let library = Self::new(store);
        library.load_saved_photos().await;
        library
    }

    async fn read_saved(&self) -> Option<Vec<Photo>> {
        let blob = match self.store.get(SAVED_PHOTOS_KEY).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(key = SAVED_PHOTOS_KEY, "no saved photos in storage");
                return None;
            }
            Err(err) => {
                warn!(key = SAVED_PHOTOS_KEY, "failed to read saved photos: {err:#}");
                return None;
            }
        };

        match serde_json::from_slice::<Vec<Photo>>(&blob) {
            Ok(photos) => Some(photos),
            Err(err) => {
                warn!(
                    key = SAVED_PHOTOS_KEY,
                    "ignoring undecodable saved photos: {err}"
                );
                None
            }
        }
    }

    async fn commit(&self, current: &mut Vec<Photo>, updated: Vec<Photo>) {
        match serde_json::to_vec(&updated) {
            Ok(encoded) => {
                if let Err(err) = self.store.set(SAVED_PHOTOS_KEY, &encoded).await {
                    warn!(key = SAVED_PHOTOS_KEY, "failed to persist saved photos: {err:#}");
                }
            }
            Err(err) => warn!(key = SAVED_PHOTOS_KEY, "failed to encode saved photos: {err}"),
        }

        *current = updated;
        // No receivers is fine; the list is still readable through `photos()`.
        let _ = self.events.send(LibraryEvent::Changed(current.clone()));
    }
}

#[async_trait]
impl PhotoLibraryHandle for PhotoLibrary {
    async fn save_photo(&self, photo: Photo) {
        let mut guard = self.photos.lock().await;
        if guard.iter().any(|saved| saved.id() == photo.id()) {
            debug!(photo_id = %photo.id(), "photo already saved");
            return;
        }

        let mut updated = guard.clone();
        updated.push(photo);
        self.commit(&mut guard, updated).await;
    }

    async fn delete_photo(&self, id: &PhotoId) {
        let mut guard = self.photos.lock().await;
        let updated = guard
            .iter()
            .filter(|saved| saved.id() != id)
            .cloned()
            .collect();
        self.commit(&mut guard, updated).await;
    }

    async fn reorder_photos(&self, source: &BTreeSet<usize>, destination: usize) {
        let mut guard = self.photos.lock().await;
        let mut updated = guard.clone();
        move_offsets(&mut updated, source, destination);
        self.commit(&mut guard, updated).await;
    }

    async fn load_saved_photos(&self) {
        let mut guard = self.photos.lock().await;
        let Some(saved) = self.read_saved().await else {
            return;
        };

        debug!(count = saved.len(), "loaded saved photos");
        *guard = saved;
        let _ = self.events.send(LibraryEvent::Changed(guard.clone()));
    }

    async fn photos(&self) -> Vec<Photo> {
        self.photos.lock().await.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<LibraryEvent> {
        self.events.subscribe()
    }
}

/// Moves the elements at `source` so they sit, in their original relative
/// order, just before the element that was at `destination`.
///
/// `destination == items.len()` moves them to the end. Indices past the end
/// are ignored and `destination` is clamped to the length.
pub fn move_offsets<T>(items: &mut Vec<T>, source: &BTreeSet<usize>, destination: usize) {
    let len = items.len();
    let destination = destination.min(len);
    let source: Vec<usize> = source.iter().copied().filter(|&index| index < len).collect();
    if source.is_empty() {
        return;
    }

    let insert_at = destination - source.iter().filter(|&&index| index < destination).count();

    let mut moved = Vec::with_capacity(source.len());
    let mut kept = Vec::with_capacity(len - source.len());
    for (index, item) in items.drain(..).enumerate() {
        if source.binary_search(&index).is_ok() {
            moved.push(item);
        } else {
            kept.push(item);
        }
    }

    kept.splice(insert_at..insert_at, moved);
    *items = kept;
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;
