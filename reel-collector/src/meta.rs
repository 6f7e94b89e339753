use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static RE_LIKES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*[KkMm]?) likes").unwrap());
static RE_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*[KkMm]?) comments").unwrap());
static RE_POST_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"on (\w+ \d{1,2}, \d{4}):").unwrap());

/// Engagement summary from the page's `<meta name="description">`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageMeta {
    pub likes: Option<String>,
    pub comments: Option<String>,
    pub post_date: Option<NaiveDate>,
}

/// Reads the description meta tag. Without the tag every field is `None`;
/// with it, missing counts default to "0".
pub fn extract_page_meta(html: &str) -> PageMeta {
    match description_content(html) {
        Some(content) => parse_description(&content),
        None => PageMeta::default(),
    }
}

fn description_content(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    let element = document.select(&selector).next()?;
    Some(element.value().attr("content").unwrap_or("").to_string())
}

pub fn parse_description(content: &str) -> PageMeta {
    let capture = |re: &Regex| re.captures(content).map(|c| c[1].to_string());

    PageMeta {
        likes: Some(capture(&RE_LIKES).unwrap_or_else(|| "0".to_string())),
        comments: Some(capture(&RE_COMMENTS).unwrap_or_else(|| "0".to_string())),
        post_date: capture(&RE_POST_DATE)
            .and_then(|date| NaiveDate::parse_from_str(&date, "%B %d, %Y").ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_description() {
        let meta = parse_description(
            "1.2M likes, 3.4K comments - pubity on March 5, 2024: \"when the cat...\"",
        );
        assert_eq!(meta.likes.as_deref(), Some("1.2M"));
        assert_eq!(meta.comments.as_deref(), Some("3.4K"));
        assert_eq!(meta.post_date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_missing_fields_default() {
        let meta = parse_description("Watch this reel by pubity");
        assert_eq!(meta.likes.as_deref(), Some("0"));
        assert_eq!(meta.comments.as_deref(), Some("0"));
        assert_eq!(meta.post_date, None);
    }

    #[test]
    fn test_extract_from_html() {
        let html = r#"<html><head>
            <meta property="og:title" content="ignored">
            <meta name="description" content="52K likes, 610 comments - someone on July 14, 2023: &quot;hi&quot;">
            </head><body></body></html>"#;
        let meta = extract_page_meta(html);
        assert_eq!(meta.likes.as_deref(), Some("52K"));
        assert_eq!(meta.comments.as_deref(), Some("610"));
        assert_eq!(meta.post_date, NaiveDate::from_ymd_opt(2023, 7, 14));
    }

    #[test]
    fn test_no_meta_tag() {
        assert_eq!(extract_page_meta("<html><head></head></html>"), PageMeta::default());
    }
}
