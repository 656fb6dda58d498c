// URL normalization and host extraction.
//
// A normalized URL is the raw URL with its query and fragment cut off.
// Nothing else is touched: no lowercasing, no trailing-slash fixes, no
// percent-decoding. The blacklist compares normalized strings exactly, so
// any extra canonicalization here would silently change membership.

/// Strip the query and fragment components from a URL.
///
/// Cuts at the first `?` or `#`, whichever comes first. Idempotent:
/// `normalize(&normalize(u)) == normalize(u)` for every input.
pub fn normalize(url: &str) -> String {
    match url.find(['?', '#']) {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}

/// Return the network location (host, plus any port or userinfo) of a URL.
///
/// Anything that doesn't look like `scheme://host/...` or `//host/...`
/// yields an empty host rather than an error, so callers can keep
/// evaluating rules against `""`.
pub fn host_of(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) if is_scheme(&url[..idx]) => &url[idx + 3..],
        _ => match url.strip_prefix("//") {
            Some(rest) => rest,
            None => return "",
        },
    };

    match rest.find(['/', '?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`.
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
