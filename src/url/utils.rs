//! Essential URL parsing utilities.
//!
//! Rewritten URLs carry their payload in the raw query and path text, so most
//! helpers here work on the string as given rather than on a parsed [`Url`],
//! which would re-encode characters the decoders depend on.

use url::Url;

/// Check whether a string is a syntactically valid absolute URL.
///
/// # Examples
///
/// ```
/// use unwrapurl::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/path?q=1"));
/// assert!(!is_valid_url("example.com/path"));
/// assert!(!is_valid_url("not a url"));
/// ```
pub fn is_valid_url(candidate: &str) -> bool {
    Url::parse(candidate).is_ok()
}

/// Split `scheme://host/rest` into its scheme, host and the remainder.
///
/// The remainder starts at the first `/`, `?` or `#` after the host, and is
/// empty when the URL ends at the host. Returns `None` when the string has no
/// `scheme://host` prefix.
///
/// # Examples
///
/// ```
/// use unwrapurl::split_scheme_host;
///
/// let (scheme, host, rest) = split_scheme_host("https://urldefense.com/v3/__x").unwrap();
/// assert_eq!(scheme, "https");
/// assert_eq!(host, "urldefense.com");
/// assert_eq!(rest, "/v3/__x");
/// ```
pub fn split_scheme_host(url: &str) -> Option<(&str, &str, &str)> {
    let (scheme, after) = url.split_once("://")?;
    if scheme.is_empty() || scheme.contains(':') {
        return None;
    }

    let host_end = after.find(['/', '?', '#']).unwrap_or(after.len());
    let host = &after[..host_end];
    if host.is_empty() {
        return None;
    }

    Some((scheme, host, &after[host_end..]))
}

/// Get the first path segment immediately following the host.
///
/// # Examples
///
/// ```
/// use unwrapurl::first_path_segment;
///
/// assert_eq!(first_path_segment("https://example.com/v2/url?u=x"), Some("v2"));
/// assert_eq!(first_path_segment("https://example.com"), None);
/// ```
pub fn first_path_segment(url: &str) -> Option<&str> {
    let (_, _, rest) = split_scheme_host(url)?;
    let path = rest.strip_prefix('/')?;
    let end = path.find(['/', '?', '#']).unwrap_or(path.len());
    let segment = &path[..end];

    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}

/// Get the raw, still-encoded value of a query parameter.
///
/// Returns the value of the first `key=value` pair whose key matches exactly.
/// Nothing is decoded: `+` stays `+` and percent escapes stay intact.
///
/// # Examples
///
/// ```
/// use unwrapurl::raw_query_value;
///
/// let value = raw_query_value("https://example.com/v1/url?k=1&u=http%3A%2F%2Fa.b", "u");
/// assert_eq!(value, Some("http%3A%2F%2Fa.b"));
///
/// assert_eq!(raw_query_value("https://example.com/?k=1", "u"), None);
/// ```
pub fn raw_query_value<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    query.split('&').find_map(|pair| {
        let mut it = pair.splitn(2, '=');
        let k = it.next().unwrap_or("");
        let v = it.next().unwrap_or("");
        (k == key).then_some(v)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("ftp://files.example.org/a.txt"));
        assert!(is_valid_url("mailto:someone@example.com"));

        assert!(!is_valid_url(""));
        assert!(!is_valid_url("foo123bar4Xbaz"));
        assert!(!is_valid_url("has spaces and no scheme"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn test_split_scheme_host() {
        assert_eq!(
            split_scheme_host("https://example.com"),
            Some(("https", "example.com", ""))
        );
        assert_eq!(
            split_scheme_host("http://example.com:8080?x=1"),
            Some(("http", "example.com:8080", "?x=1"))
        );
        assert_eq!(split_scheme_host("https:///path"), None);
        assert_eq!(split_scheme_host("://example.com"), None);
        assert_eq!(split_scheme_host("example.com/path"), None);
    }

    #[test]
    fn test_first_path_segment() {
        assert_eq!(first_path_segment("https://a.com/v1/url?u=x"), Some("v1"));
        assert_eq!(first_path_segment("https://a.com/v3/__x__;y!!z"), Some("v3"));
        assert_eq!(first_path_segment("https://a.com/path"), Some("path"));
        assert_eq!(first_path_segment("https://a.com/?v1"), None);
        assert_eq!(first_path_segment("https://a.com//v1/"), None);
        assert_eq!(first_path_segment("not a url"), None);
    }

    #[test]
    fn test_raw_query_value() {
        let url = "https://a.com/v2/url?u=https-3A__example.com&d=DwMF#frag";
        assert_eq!(raw_query_value(url, "u"), Some("https-3A__example.com"));
        assert_eq!(raw_query_value(url, "d"), Some("DwMF"));
        assert_eq!(raw_query_value(url, "frag"), None);

        // first match wins, no decoding applied
        let url = "https://a.com/?u=a+b%20c&u=second";
        assert_eq!(raw_query_value(url, "u"), Some("a+b%20c"));

        // key present without value
        assert_eq!(raw_query_value("https://a.com/?u", "u"), Some(""));
        assert_eq!(raw_query_value("https://a.com/", "u"), None);
    }
}
