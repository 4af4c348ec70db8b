use ammonia::Builder;

/// Sanitize a post body for embedding in a page.
///
/// Ammonia's default allow-list plus figures and images, link targets and
/// `class`/`style` on any element.
pub fn sanitize_body(html: &str) -> String {
    Builder::default()
        .add_tags(&["img", "figure", "figcaption"])
        .add_tag_attributes("img", &["src", "alt", "width", "height"])
        .add_tag_attributes("a", &["href", "name", "target"])
        .add_generic_attributes(&["class", "style"])
        .clean(html)
        .to_string()
}
