//! Percent-escaping helpers matching the escaping rules users of templated
//! links rely on.
//!
//! Two flavours are provided:
//!
//! - [`path_escape`] - escapes a string so it can be placed inside a single
//!   URL path segment (`/` becomes `%2F`)
//! - [`query_escape`] - escapes a string for use as a query parameter value
//!   (space becomes `+`)
//!
//! Both keep the RFC 3986 unreserved characters (`A-Z a-z 0-9 - _ . ~`) and
//! use upper-case hex digits for everything they escape.

/// Characters outside the unreserved set that may appear unescaped inside a
/// path segment.
const PATH_SEGMENT_SAFE: &[char] = &['$', '&', '+', ':', '=', '@'];

/// Returns whether `c` may appear unescaped inside a URL path segment.
pub fn is_path_segment_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') || PATH_SEGMENT_SAFE.contains(&c)
}

/// Escapes `s` so it can be safely placed inside a URL path segment.
///
/// # Examples
///
/// ```
/// use golinks::utils::escape::path_escape;
///
/// assert_eq!(path_escape("a/b"), "a%2Fb");
/// assert_eq!(path_escape("user@example.com"), "user@example.com");
/// assert_eq!(path_escape("a b"), "a%20b");
/// ```
pub fn path_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut buf = [0u8; 4];

    for c in s.chars() {
        if PATH_SEGMENT_SAFE.contains(&c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }

    out
}

/// Escapes `s` so it can be safely placed inside a URL query.
///
/// Spaces are encoded as `+`; every other reserved character is
/// percent-escaped.
///
/// # Examples
///
/// ```
/// use golinks::utils::escape::query_escape;
///
/// assert_eq!(query_escape("a+b"), "a%2Bb");
/// assert_eq!(query_escape("a b"), "a+b");
/// ```
pub fn query_escape(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

/// Checks that every `%` in `s` starts a well-formed `%XX` escape.
pub fn has_valid_escapes(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_escape_keeps_unreserved() {
        assert_eq!(path_escape("Abc-_.~09"), "Abc-_.~09");
    }

    #[test]
    fn test_path_escape_reserved() {
        assert_eq!(path_escape("a/b"), "a%2Fb");
        assert_eq!(path_escape("a?b"), "a%3Fb");
        assert_eq!(path_escape("a;b,c"), "a%3Bb%2Cc");
        assert_eq!(path_escape("$&+:=@"), "$&+:=@");
    }

    #[test]
    fn test_path_escape_multibyte() {
        assert_eq!(path_escape("é"), "%C3%A9");
    }

    #[test]
    fn test_query_escape() {
        assert_eq!(query_escape("a+b"), "a%2Bb");
        assert_eq!(query_escape("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(query_escape("x/y"), "x%2Fy");
        assert_eq!(query_escape("~ok"), "~ok");
    }

    #[test]
    fn test_has_valid_escapes() {
        assert!(has_valid_escapes("http://host/foo%2f/bar"));
        assert!(has_valid_escapes("plain"));
        assert!(!has_valid_escapes("http://host/%zz"));
        assert!(!has_valid_escapes("trailing%2"));
        assert!(!has_valid_escapes("%"));
    }
}
