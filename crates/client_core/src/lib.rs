//! Accessors and orchestration behind the random-images app: the remote photo
//! listing, the locally saved list, and the view-model tying them together.

pub mod error;
pub mod library;
pub mod network;
pub mod view_model;

pub use error::FetchError;
pub use library::{move_offsets, LibraryEvent, PhotoLibrary, PhotoLibraryHandle, SAVED_PHOTOS_KEY};
pub use network::{HttpPhotoSource, PhotoSource, DEFAULT_LIST_ENDPOINT};
pub use view_model::{PhotosViewModel, ViewState, NO_IMAGES_MESSAGE};
