use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::info;

use super::store::{self, StoreError};
use super::{ContentEntry, ContentStore, SiteInfo};
use crate::config::Settings;

/// Read-only, lazily loaded view of the content store.
///
/// Starts unloaded; the first successful read fills the cache and it is never
/// replaced afterwards. Concurrent first reads may each parse the file, and the
/// first value stored wins. Failed loads leave the accessor unloaded.
pub struct ContentAccessor {
    primary: PathBuf,
    fallback: PathBuf,
    cache: OnceLock<ContentStore>,
}

impl ContentAccessor {
    pub fn new(primary: impl Into<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
            cache: OnceLock::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.content_path, &settings.content_fallback_path)
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn load_store(&self) -> Result<&ContentStore, StoreError> {
        if let Some(store) = self.cache.get() {
            return Ok(store);
        }
        let path = store::resolve_path(&self.primary, &self.fallback)?;
        let loaded = store::read_store(&path)?;
        info!(
            "Loaded content store {} ({} pages, {} posts)",
            path.display(),
            loaded.pages.len(),
            loaded.posts.len()
        );
        Ok(self.cache.get_or_init(|| loaded))
    }

    pub fn site(&self) -> Result<&SiteInfo, StoreError> {
        Ok(&self.load_store()?.site)
    }

    pub fn pages(&self) -> Result<Vec<&ContentEntry>, StoreError> {
        Ok(published(&self.load_store()?.pages))
    }

    pub fn posts(&self) -> Result<Vec<&ContentEntry>, StoreError> {
        Ok(published(&self.load_store()?.posts))
    }

    /// First published post whose slug matches exactly.
    pub fn find_post_by_slug(&self, slug: &str) -> Result<Option<&ContentEntry>, StoreError> {
        Ok(self
            .load_store()?
            .posts
            .iter()
            .filter(|p| p.is_published())
            .find(|p| p.slug == slug))
    }

    /// Resolve a blog link built from `ContentEntry::route_slug`: an exact slug
    /// match first, then a published post with no slug whose id matches.
    pub fn find_post_by_route(&self, route: &str) -> Result<Option<&ContentEntry>, StoreError> {
        if let Some(post) = self.find_post_by_slug(route)? {
            return Ok(Some(post));
        }
        Ok(self
            .load_store()?
            .posts
            .iter()
            .filter(|p| p.is_published() && p.slug.is_empty())
            .find(|p| p.id == route))
    }
}

fn published(entries: &[ContentEntry]) -> Vec<&ContentEntry> {
    entries.iter().filter(|e| e.is_published()).collect()
}
