use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

const THUMBNAIL_BASE_URL: &str = "https://picsum.photos/id";
const THUMBNAIL_WIDTH: u32 = 300;
const THUMBNAIL_HEIGHT: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Metadata for one remote image as returned by the listing endpoint.
///
/// Two records compare equal when their ids match, whatever the other fields hold.
/// Fields are read-only once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    id: PhotoId,
    author: String,
    width: u32,
    height: u32,
    url: String,
    download_url: String,
}

impl Photo {
    pub fn new(
        id: impl Into<PhotoId>,
        author: impl Into<String>,
        width: u32,
        height: u32,
        url: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            author: author.into(),
            width,
            height,
            url: url.into(),
            download_url: download_url.into(),
        }
    }

    pub fn id(&self) -> &PhotoId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn download_url(&self) -> &str {
        &self.download_url
    }

    /// Fixed-size 300x200 rendition served by the picsum sizing API.
    pub fn thumbnail_url(&self) -> String {
        format!(
            "{THUMBNAIL_BASE_URL}/{}/{THUMBNAIL_WIDTH}/{THUMBNAIL_HEIGHT}",
            self.id
        )
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Photo {}

impl Hash for Photo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
