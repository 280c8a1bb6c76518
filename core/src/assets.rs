//! Static asset table
//!
//! Assets are compiled into the firmware image by the board crate; the core
//! only looks them up and picks a content type.

use crate::http::{content_type_for, ContentType};

/// One embedded file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticAsset {
    /// Absolute path the asset is stored under, e.g. `/index.html`
    pub path: &'static str,
    pub body: &'static [u8],
}

impl StaticAsset {
    pub const fn new(path: &'static str, body: &'static [u8]) -> Self {
        Self { path, body }
    }

    pub fn content_type(&self) -> ContentType {
        content_type_for(self.path)
    }
}

/// Find the asset stored under `path`
pub fn find<'a>(assets: &'a [StaticAsset], path: &str) -> Option<&'a StaticAsset> {
    assets.iter().find(|asset| asset.path == path)
}
