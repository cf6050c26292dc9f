//! Node URL normalization and identity

use url::Url;

/// Normalize an operator or registry supplied node address to `scheme://host[:port]`
///
/// Bare hosts are assumed to be served over https. Paths, queries and
/// trailing slashes are dropped, and default ports are elided.
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let candidate = if text.contains("://") {
        text.to_string()
    } else {
        format!("https://{text}")
    };

    let parsed = Url::parse(&candidate).ok()?;
    let host = parsed.host_str()?;

    let mut normalized = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        normalized.push_str(&format!(":{port}"));
    }
    Some(normalized)
}

/// Identity key used to deduplicate nodes: `host:port`
///
/// Two URLs that differ only in an explicit default port share an identity.
pub fn node_identity(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or_default();
            let port = parsed
                .port_or_known_default()
                .unwrap_or(if parsed.scheme() == "https" { 443 } else { 80 });
            format!("{host}:{port}")
        }
        Err(_) => url.to_string(),
    }
}
