//! DTOs for link management endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::application::services::SaveLink;
use crate::domain::entities::link::SHORT_NAME_REGEX;

/// Form submitted to `POST /` to create or update a link.
///
/// Missing fields deserialize as empty strings so they are reported by
/// validation (400) rather than rejected by the extractor.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveLinkRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "short and long required"))]
    #[validate(regex(
        path = *SHORT_NAME_REGEX,
        message = "short may only contain letters, numbers, dash, and period"
    ))]
    pub short: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "short and long required"))]
    pub long: String,

    /// New owner; empty means the current user.
    #[serde(default)]
    pub owner: Option<String>,
}

impl From<SaveLinkRequest> for SaveLink {
    fn from(req: SaveLinkRequest) -> Self {
        Self {
            short: req.short,
            long: req.long,
            owner: req.owner.filter(|owner| !owner.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(short: &str, long: &str) -> SaveLinkRequest {
        SaveLinkRequest {
            short: short.to_string(),
            long: long.to_string(),
            owner: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request("meet", "https://meet.example.com/").validate().is_ok());
        assert!(request("team.docs-v2", "https://docs/{{.Path}}").validate().is_ok());
    }

    #[test]
    fn test_invalid_requests() {
        assert!(request("", "https://example.com").validate().is_err());
        assert!(request("meet", "").validate().is_err());
        assert!(request("-meet", "https://example.com").validate().is_err());
        assert!(request("a b", "https://example.com").validate().is_err());
    }

    #[test]
    fn test_empty_owner_is_dropped() {
        let mut req = request("meet", "https://example.com");
        req.owner = Some(String::new());
        assert_eq!(SaveLink::from(req).owner, None);
    }
}
