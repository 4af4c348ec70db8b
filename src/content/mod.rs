pub mod accessor;
pub mod dates;
pub mod store;

use serde::{Deserialize, Serialize};

/// Status value marking an entry as published.
pub const PUBLISHED: &str = "publish";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub title: String,
    pub link: String,
    pub description: String,
}

/// A single page or post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentEntry {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: String,
    pub date: String,
    pub link: String,
    pub content: String,
    pub excerpt: String,
}

impl ContentEntry {
    /// Published entries, plus entries that never had a status set.
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED || self.status.is_empty()
    }

    /// Path segment used to link to the entry: the slug, or the id when there is none.
    pub fn route_slug(&self) -> &str {
        if self.slug.is_empty() {
            &self.id
        } else {
            &self.slug
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStore {
    pub site: SiteInfo,
    pub pages: Vec<ContentEntry>,
    pub posts: Vec<ContentEntry>,
}
