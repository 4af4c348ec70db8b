use super::tree::{FieldValue, CDATA_KEY, TEXT_KEY};

/// Collapse any of the accepted value shapes into a plain string.
///
/// Lists are unwrapped first (first element wins), then a node yields its
/// CDATA text or, failing that, its `_` text. Anything else is empty.
pub fn flatten_value(value: Option<&FieldValue>) -> String {
    match value {
        None => String::new(),
        Some(FieldValue::Text(s)) => s.clone(),
        Some(FieldValue::List(items)) => flatten_value(items.first()),
        Some(FieldValue::Node(map)) => {
            flatten_value(map.get(CDATA_KEY).or_else(|| map.get(TEXT_KEY)))
        }
    }
}

/// Trim a slug and strip any trailing `/`.
///
/// Trailing whitespace and slashes are stripped together so that
/// `"a /"` and `"a"` land on the same value and the function is idempotent.
pub fn normalize_slug(slug: &str) -> String {
    slug.trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}
