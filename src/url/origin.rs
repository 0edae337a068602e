use url::Url;

/// Returns the serialized origin of a URL
///
/// This is scheme, host and (non-default) port, the same string a browser
/// reports as `location.origin`. Opaque origins serialize as `"null"`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_cloner::url::origin_of;
///
/// let url = Url::parse("https://example.com:8443/path?q=1").unwrap();
/// assert_eq!(origin_of(&url), "https://example.com:8443");
/// ```
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Returns the root URL of a URL's origin, usable as a join base
pub fn origin_url(url: &Url) -> Option<Url> {
    if !url.origin().is_tuple() {
        return None;
    }
    Url::parse(&origin_of(url)).ok()
}

/// Returns true if both URLs share scheme, host and port
///
/// Opaque origins never compare equal, not even to themselves.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin().is_tuple() && a.origin() == b.origin()
}

/// Resolves a raw hyperlink target against a base URL
///
/// Returns None if the href is empty or cannot be resolved. Whether the
/// result is worth following is decided by the caller's origin check.
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    base.join(href).ok()
}
