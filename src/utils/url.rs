//! URL encoding and validation utilities.

/// Result of URL validation
#[derive(Debug, Clone, PartialEq)]
pub enum UrlValidation {
    /// URL is valid (trimmed)
    Valid(String),
    /// URL is invalid
    Invalid(UrlValidationError),
}

/// Errors that can occur during URL validation.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlValidationError {
    /// URL is empty
    Empty,
    /// URL doesn't start with http:// or https://
    InvalidProtocol,
    /// URL has no host/domain
    NoHost,
    /// URL contains whitespace
    Whitespace,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "URL is required"),
            Self::InvalidProtocol => write!(f, "URL must start with http:// or https://"),
            Self::NoHost => write!(f, "URL has no host"),
            Self::Whitespace => write!(f, "URL must not contain spaces"),
        }
    }
}

/// Validate the target of a file link.
///
/// Checks:
/// 1. URL is not empty
/// 2. URL starts with http:// or https://
/// 3. URL has a host
/// 4. URL has no embedded whitespace
pub fn validate_link_url(url: &str) -> UrlValidation {
    let url = url.trim();

    if url.is_empty() {
        return UrlValidation::Invalid(UrlValidationError::Empty);
    }

    let url_lower = url.to_lowercase();
    let rest = if let Some(rest) = url_lower.strip_prefix("https://") {
        rest
    } else if let Some(rest) = url_lower.strip_prefix("http://") {
        rest
    } else {
        return UrlValidation::Invalid(UrlValidationError::InvalidProtocol);
    };

    if url.chars().any(char::is_whitespace) {
        return UrlValidation::Invalid(UrlValidationError::Whitespace);
    }

    // Host ends at the first path, query, or fragment delimiter
    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority
        .rsplit('@')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");
    if host.is_empty() {
        return UrlValidation::Invalid(UrlValidationError::NoHost);
    }

    UrlValidation::Valid(url.to_string())
}

/// Percent-encode a query or path component.
///
/// Unreserved characters (RFC 3986) pass through, everything else is
/// encoded byte by byte.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Decode a percent-encoded component. Malformed escapes are kept verbatim.
pub fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Encode `(key, value)` pairs as `k1=v1&k2=v2`.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Join an API base URL, a path, and optional query pairs.
pub fn build_url(base: &str, path: &str, params: &[(String, String)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if !params.is_empty() {
        url.push('?');
        url.push_str(&encode_query(params));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(matches!(
            validate_link_url("https://example.com/doc.pdf"),
            UrlValidation::Valid(_)
        ));
        assert!(matches!(
            validate_link_url("  http://files.example.org:8080/a?b=c  "),
            UrlValidation::Valid(u) if u == "http://files.example.org:8080/a?b=c"
        ));
    }

    #[test]
    fn test_invalid_urls() {
        assert_eq!(
            validate_link_url(""),
            UrlValidation::Invalid(UrlValidationError::Empty)
        );
        assert_eq!(
            validate_link_url("ftp://example.com"),
            UrlValidation::Invalid(UrlValidationError::InvalidProtocol)
        );
        assert_eq!(
            validate_link_url("javascript:alert(1)"),
            UrlValidation::Invalid(UrlValidationError::InvalidProtocol)
        );
        assert_eq!(
            validate_link_url("https:///path"),
            UrlValidation::Invalid(UrlValidationError::NoHost)
        );
        assert_eq!(
            validate_link_url("https://exa mple.com"),
            UrlValidation::Invalid(UrlValidationError::Whitespace)
        );
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("report"), "report");
        assert_eq!(encode_component("q3 report"), "q3%20report");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("/users"), "%2Fusers");
        assert_eq!(encode_component("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("q3%20report"), "q3 report");
        assert_eq!(decode_component("%C3%A9"), "é");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component(&encode_component("a/b?c")), "a/b?c");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(build_url("/api/", "/folders", &[]), "/api/folders");
        assert_eq!(
            build_url(
                "https://api.example.com",
                "users",
                &[
                    ("page".into(), "1".into()),
                    ("search".into(), "jane doe".into())
                ]
            ),
            "https://api.example.com/users?page=1&search=jane%20doe"
        );
    }
}
