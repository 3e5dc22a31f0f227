//! Recognition of rewritten links and of origins the decoder must not touch.

use url::Url;

/// Check whether `url` is a link on one of the rewriting service's hosts.
///
/// Matches `http(s)://<host>/v*` for any host in `service_hosts`
/// (compared case-insensitively).
///
/// # Examples
///
/// ```
/// use unwrapurl::is_rewritten_link;
///
/// let hosts = ["urldefense.com".to_string()];
/// assert!(is_rewritten_link("https://urldefense.com/v3/__https://a.b__;!!x", &hosts));
/// assert!(!is_rewritten_link("https://example.com/v3/", &hosts));
/// ```
pub fn is_rewritten_link(url: &str, service_hosts: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    is_service_host(&parsed, service_hosts) && parsed.path().starts_with("/v")
}

/// Check whether the parsed URL's host is one of the service hosts.
pub(crate) fn is_service_host(parsed: &Url, service_hosts: &[String]) -> bool {
    parsed.host_str().is_some_and(|host| {
        service_hosts
            .iter()
            .any(|service| service.eq_ignore_ascii_case(host))
    })
}

/// Reduce a URL to its origin and path, dropping query and fragment.
///
/// # Examples
///
/// ```
/// use unwrapurl::origin_and_path;
///
/// let page = origin_and_path("https://ext.example/error.html?u=x#top").unwrap();
/// assert_eq!(page, "https://ext.example/error.html");
/// ```
pub fn origin_and_path(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.into())
}
