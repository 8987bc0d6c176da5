use url::Url;

/// Checks whether two URLs share the exact same host string
///
/// There is no suffix or registrable-domain matching: `blog.example.com` and
/// `example.com` are different domains. Ports are not compared.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use frontier_warden::url::is_same_domain;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("http://example.com/b").unwrap();
/// let c = Url::parse("https://blog.example.com/").unwrap();
/// assert!(is_same_domain(&a, &b));
/// assert!(!is_same_domain(&a, &c));
/// ```
pub fn is_same_domain(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
