use regex::Regex;
use std::sync::LazyLock;

static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").unwrap());
static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

/// Strips account mentions and URLs, then collapses runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let without_mentions = RE_MENTION.replace_all(text, "");
    let without_urls = RE_URL.replace_all(&without_mentions, "");
    without_urls.split_whitespace().collect::<Vec<_>>().join(" ")
}
