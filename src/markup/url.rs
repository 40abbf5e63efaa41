//! URL allow-listing for links and images.

use url::{ParseError, Url};

/// Schemes accepted for `<a href>`.
const LINK_SCHEMES: &[&str] = &["http", "https", "mailto", "ftp"];

/// Schemes accepted for `<img src>`.
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

/// Inline image payloads accepted for `<img src="data:...">`.
const DATA_IMAGE_PREFIXES: &[&str] = &[
    "data:image/png",
    "data:image/jpeg",
    "data:image/gif",
    "data:image/webp",
];

/// What the URL will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlTarget {
    Link,
    Image,
}

/// Whether `url` may appear in the document for `target`.
///
/// Relative URLs are always accepted. Absolute URLs must use an allowed
/// scheme; control characters and whitespace inside the scheme are ignored
/// the way browsers ignore them, so `java\tscript:` is still rejected.
pub fn is_safe_url(url: &str, target: UrlTarget) -> bool {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_control() && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if normalized.is_empty() {
        return false;
    }
    let parsed = match Url::parse(&normalized) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) => return true,
        Err(_) => return false,
    };
    let scheme = parsed.scheme();
    match target {
        UrlTarget::Link => LINK_SCHEMES.contains(&scheme),
        UrlTarget::Image => {
            IMAGE_SCHEMES.contains(&scheme)
                || (scheme == "data"
                    && DATA_IMAGE_PREFIXES
                        .iter()
                        .any(|prefix| normalized.starts_with(prefix)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_links_and_relative_paths_are_safe() {
        assert!(is_safe_url("https://tieba.example.com/p/1", UrlTarget::Link));
        assert!(is_safe_url("/p/1#reply", UrlTarget::Link));
        assert!(is_safe_url("mailto:admin@example.com", UrlTarget::Link));
        assert!(is_safe_url("images/cat.png", UrlTarget::Image));
    }

    #[test]
    fn test_script_schemes_are_rejected() {
        assert!(!is_safe_url("javascript:alert(1)", UrlTarget::Link));
        assert!(!is_safe_url(" JavaScript:alert(1)", UrlTarget::Link));
        assert!(!is_safe_url("java\tscript:alert(1)", UrlTarget::Link));
        assert!(!is_safe_url("vbscript:msgbox", UrlTarget::Image));
    }

    #[test]
    fn test_data_urls_only_for_raster_images() {
        assert!(is_safe_url("data:image/png;base64,AAAA", UrlTarget::Image));
        assert!(!is_safe_url("data:image/svg+xml,<svg/>", UrlTarget::Image));
        assert!(!is_safe_url("data:text/html,hi", UrlTarget::Link));
        assert!(!is_safe_url("mailto:a@b.c", UrlTarget::Image));
    }

    #[test]
    fn test_empty_url_is_rejected() {
        assert!(!is_safe_url("   ", UrlTarget::Link));
    }

    #[test]
    fn test_scheme_case_and_hidden_characters_are_normalized() {
        assert!(!is_safe_url("JaVaScRiPt:alert(1)", UrlTarget::Link));
        assert!(!is_safe_url("java\nscript:alert(1)", UrlTarget::Image));
        assert!(!is_safe_url("\u{1}javascript:alert(1)", UrlTarget::Link));
        assert!(is_safe_url("HTTPS://Tieba.Example/p/1", UrlTarget::Link));
    }

    #[test]
    fn test_relative_references_are_safe() {
        assert!(is_safe_url("cat.png", UrlTarget::Image));
        assert!(is_safe_url("//cdn.example/cat.png", UrlTarget::Image));
        assert!(is_safe_url("?page=2", UrlTarget::Link));
        assert!(is_safe_url("../p/1", UrlTarget::Link));
    }

    #[test]
    fn test_malformed_absolute_urls_are_rejected() {
        assert!(!is_safe_url("http://", UrlTarget::Link));
        assert!(!is_safe_url("https://[::1", UrlTarget::Image));
    }
}
