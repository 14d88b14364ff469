//! Host name helpers.

/// Strips a trailing `:port` from a host, keeping IPv6 brackets intact.
///
/// # Examples
///
/// ```
/// use golinks::utils::host::strip_port;
///
/// assert_eq!(strip_port("go"), "go");
/// assert_eq!(strip_port("localhost:8080"), "localhost");
/// assert_eq!(strip_port("[::1]:8080"), "[::1]");
/// ```
pub fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 address (e.g., [::1] or [::1]:8080)
        match host.find(']') {
            Some(end_bracket) => &host[..=end_bracket],
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

/// Returns whether `host` names the same service as `service_host`.
///
/// Comparison ignores ports and ASCII case.
pub fn is_same_host(host: &str, service_host: &str) -> bool {
    strip_port(host).eq_ignore_ascii_case(strip_port(service_host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("example.com:3000"), "example.com");
        assert_eq!(strip_port("[::1]"), "[::1]");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }

    #[test]
    fn test_is_same_host() {
        assert!(is_same_host("go", "go"));
        assert!(is_same_host("GO", "go"));
        assert!(is_same_host("localhost", "localhost:8080"));
        assert!(!is_same_host("mygo", "go"));
    }
}
