//! Plain-text extraction for HTML produced by the rich-text editor.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Entities the editor emits for otherwise-empty content.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Strip every tag and decode the common entities.
///
/// `&amp;` is decoded last so `&amp;nbsp;` stays literal text.
pub fn plain_text(html: &str) -> String {
    let mut text = TAG.replace_all(html, "").into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }
    text
}
