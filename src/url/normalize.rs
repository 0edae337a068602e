use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Canonical page identity used for crawl deduplication
///
/// Many raw URLs collapse onto one key. Keys are only compared, never
/// navigated to or handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Options controlling how URLs collapse onto keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Keep the query string as part of the key
    ///
    /// Off by default, so tracking-parameter variants of a page are treated
    /// as one page. Turn on for sites that paginate through query parameters.
    pub query_sensitive: bool,
}

/// Normalizes a URL into its dedup key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject URLs without a host (they have no origin)
/// 3. Take the serialized origin (scheme, host, non-default port)
/// 4. Append the path with every trailing slash stripped
/// 5. Append `?query` only when `options.query_sensitive` is set
///
/// The fragment never participates.
///
/// # Examples
///
/// ```
/// use site_cloner::url::{normalize_url, NormalizeOptions};
///
/// let options = NormalizeOptions::default();
/// let a = normalize_url("https://a.com/x/", &options).unwrap();
/// let b = normalize_url("https://a.com/x?utm_source=feed#top", &options).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "https://a.com/x");
/// ```
pub fn normalize_url(url_str: &str, options: &NormalizeOptions) -> UrlResult<NormalizedKey> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(url_str.to_string()));
    }

    let mut key = url.origin().ascii_serialization();
    key.push_str(url.path().trim_end_matches('/'));

    if options.query_sensitive {
        if let Some(query) = url.query().filter(|q| !q.is_empty()) {
            key.push('?');
            key.push_str(query);
        }
    }

    Ok(NormalizedKey(key))
}

/// Normalizes a URL, mapping any failure to `None`
///
/// `None` means "unusable, drop silently"; use [`normalize_url`] when the
/// reason matters.
pub fn normalize(url_str: &str, options: &NormalizeOptions) -> Option<NormalizedKey> {
    normalize_url(url_str, options).ok()
}
