pub mod fields;
pub mod tree;

use tracing::{debug, warn};

use crate::content::{ContentEntry, ContentStore, SiteInfo};
use fields::{flatten_value, normalize_slug};
use tree::FieldValue;
pub use tree::MalformedDocument;

/// Kind of entry an export item becomes, decided by `wp:post_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Page,
    Post,
}

impl EntryKind {
    pub fn from_post_type(post_type: &str) -> Option<Self> {
        match post_type {
            "page" => Some(EntryKind::Page),
            "post" => Some(EntryKind::Post),
            _ => None,
        }
    }
}

/// Turn the raw text of a WordPress export into a content store.
///
/// Items whose post type is neither `page` nor `post` (attachments, menu
/// items, ...) are skipped. The channel is looked up under the document
/// element (`<rss>`), or is the document element itself. A document without a
/// `<channel>` yields an empty store rather than an error.
pub fn parse_document(xml: &str) -> Result<ContentStore, MalformedDocument> {
    let (root_name, root) = tree::parse_tree(xml)?;

    let channel = if root_name == "channel" {
        Some(&root)
    } else {
        root.children("channel").first()
    };
    let Some(channel) = channel else {
        warn!("Export has no <channel> element, producing an empty store");
        return Ok(ContentStore::default());
    };

    let site = SiteInfo {
        title: flatten_value(channel.get("title")),
        link: flatten_value(channel.get("link")),
        description: flatten_value(channel.get("description")),
    };

    let mut pages = Vec::new();
    let mut posts = Vec::new();
    let mut skipped = 0usize;

    for item in channel.children("item") {
        let post_type = flatten_value(item.get("wp:post_type"));
        match EntryKind::from_post_type(&post_type) {
            Some(EntryKind::Page) => pages.push(build_entry(item)),
            Some(EntryKind::Post) => posts.push(build_entry(item)),
            None => skipped += 1,
        }
    }

    debug!(
        "Extracted {} pages, {} posts ({} other items skipped)",
        pages.len(),
        posts.len(),
        skipped
    );
    Ok(ContentStore { site, pages, posts })
}

fn build_entry(item: &FieldValue) -> ContentEntry {
    let field = |name: &str| flatten_value(item.get(name));
    ContentEntry {
        id: field("wp:post_id"),
        title: field("title"),
        slug: normalize_slug(&field("wp:post_name")),
        status: field("wp:status"),
        date: field("wp:post_date"),
        link: field("link"),
        content: field("content:encoded"),
        excerpt: field("excerpt:encoded"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> ContentStore {
        let xml = std::fs::read_to_string("tests/fixtures/export.xml").unwrap();
        parse_document(&xml).unwrap()
    }

    #[test]
    fn site_info() {
        let store = fixture();
        assert_eq!(store.site.title, "The Referee Project");
        assert_eq!(store.site.link, "https://therefereeproject.org");
        assert_eq!(store.site.description, "Rethinking research evaluation");
    }

    #[test]
    fn partitions_pages_and_posts() {
        let store = fixture();
        assert_eq!(store.pages.len(), 2);
        assert_eq!(store.posts.len(), 3);
    }

    #[test]
    fn unknown_post_types_are_dropped() {
        let store = fixture();
        let ids: Vec<&str> = store
            .pages
            .iter()
            .chain(store.posts.iter())
            .map(|e| e.id.as_str())
            .collect();
        // 900 is an attachment, 901 a nav_menu_item, 902 has no post type at all
        for dropped in ["900", "901", "902"] {
            assert!(!ids.contains(&dropped), "{} should be skipped", dropped);
        }
    }

    #[test]
    fn keeps_document_order() {
        let store = fixture();
        let post_ids: Vec<&str> = store.posts.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(post_ids, vec!["293", "648", "751"]);
        let page_ids: Vec<&str> = store.pages.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(page_ids, vec!["2", "14"]);
    }

    #[test]
    fn post_fields() {
        let store = fixture();
        let p = &store.posts[0];
        assert_eq!(p.title, "Removing the Peer from Peer Review");
        assert_eq!(p.slug, "removing-the-peer");
        assert_eq!(p.status, "publish");
        assert_eq!(p.date, "2024-03-01 09:30:00");
        assert_eq!(p.link, "https://therefereeproject.org/removing-the-peer/");
        assert_eq!(p.content, "<p>Academia claims to value <b>collegiality</b>.</p>");
        assert_eq!(p.excerpt, "Peer review, minus the peers.");
    }

    #[test]
    fn slugs_are_normalized() {
        let store = fixture();
        assert_eq!(store.posts[1].slug, "gaming-the-system");
        assert_eq!(store.pages[1].slug, "");
    }

    #[test]
    fn draft_is_kept_by_extraction() {
        let store = fixture();
        assert_eq!(store.posts[2].status, "draft");
    }

    #[test]
    fn absent_fields_default_to_empty() {
        let store = fixture();
        let about = &store.pages[0];
        assert_eq!(about.excerpt, "");
        let faq = &store.pages[1];
        assert_eq!(faq.status, "");
    }

    #[test]
    fn missing_channel_degrades_to_empty_store() {
        let store = parse_document("<rss><something/></rss>").unwrap();
        assert_eq!(store, ContentStore::default());
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(parse_document("<rss><channel><item></channel></rss>").is_err());
        assert!(parse_document("").is_err());
    }

    #[test]
    fn mixed_text_and_cdata_fields_read_in_order() {
        let store = parse_document(
            "<rss><channel><item><wp:post_type>post</wp:post_type>\
             <content:encoded><![CDATA[Hello ]]>&amp; bye</content:encoded>\
             <title>A <![CDATA[B]]> C</title></item></channel></rss>",
        )
        .unwrap();
        assert_eq!(store.posts[0].content, "Hello & bye");
        assert_eq!(store.posts[0].title, "A B C");
    }

    #[test]
    fn bare_channel_root_is_accepted() {
        let xml = "<channel><title>x</title><item><wp:post_type>post</wp:post_type>\
                   <wp:post_id>1</wp:post_id></item></channel>";
        let store = parse_document(xml).unwrap();
        assert_eq!(store.site.title, "x");
        assert_eq!(store.posts.len(), 1);
        assert_eq!(store.posts[0].id, "1");
    }
}
