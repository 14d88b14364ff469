//! Link entity representing a short name and its destination pattern.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::link_id::link_id;

/// Short names start with an ASCII word character, then word characters,
/// dashes and periods.
pub static SHORT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:word:]][[:word:]\-\.]*$").expect("short name pattern is valid")
});

/// A stored short link.
///
/// `long` is either a literal destination URL or a template pattern that is
/// expanded on every resolution (see [`crate::domain::expand`]).
///
/// The JSON form uses the field names of the snapshot format
/// (`ID`, `Short`, `Long`, `Created`, `LastEdit`, `Owner`), one object per
/// line in exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Link {
    /// Normalized key, always `link_id(short)`.
    #[serde(rename = "ID", default)]
    pub id: String,
    /// The "foo" part of `http://go/foo`, as last saved.
    pub short: String,
    /// Target URL or template pattern.
    pub long: String,
    pub created: DateTime<Utc>,
    /// When the link was last edited.
    pub last_edit: DateTime<Utc>,
    /// user@domain
    #[serde(default)]
    pub owner: String,
}

impl Link {
    /// Creates a new link with both timestamps set to `now`.
    pub fn new(
        short: impl Into<String>,
        long: impl Into<String>,
        owner: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let short = short.into();
        Self {
            id: link_id(&short),
            short,
            long: long.into(),
            created: now,
            last_edit: now,
            owner: owner.into(),
        }
    }

    /// Whether `short` is acceptable as a new short name.
    pub fn is_valid_short(short: &str) -> bool {
        SHORT_NAME_REGEX.is_match(short)
    }

    /// Recomputes `id` from `short`.
    ///
    /// Storage adapters call this before every write so the stored key can
    /// never drift from the short name.
    pub fn normalized(mut self) -> Self {
        self.id = link_id(&self.short);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new("Meet-Room", "https://meet.example.com/", "a@example.com", now);

        assert_eq!(link.id, "meetroom");
        assert_eq!(link.short, "Meet-Room");
        assert_eq!(link.long, "https://meet.example.com/");
        assert_eq!(link.owner, "a@example.com");
        assert_eq!(link.created, now);
        assert_eq!(link.last_edit, now);
    }

    #[test]
    fn test_normalized_recomputes_id() {
        let mut link = Link::new("who", "http://who/", "", Utc::now());
        link.short = "Who-Is".to_string();
        link.id = "stale".to_string();

        assert_eq!(link.normalized().id, "whois");
    }

    #[test]
    fn test_valid_short_names() {
        for short in ["a", "foo-bar", "v1.2", "_x", "Meet"] {
            assert!(Link::is_valid_short(short), "{short} should be valid");
        }
        for short in ["", "-foo", ".foo", "a/b", "a b", "a+", "a%20", "über"] {
            assert!(!Link::is_valid_short(short), "{short} should be invalid");
        }
    }

    #[test]
    fn test_link_json_field_names() {
        let at = Utc.with_ymd_and_hms(2022, 6, 2, 1, 2, 3).unwrap();
        let link = Link::new("who", "http://who/", "foo@example.com", at);

        let json = serde_json::to_value(&link).unwrap();

        assert_eq!(json["ID"], "who");
        assert_eq!(json["Short"], "who");
        assert_eq!(json["Long"], "http://who/");
        assert_eq!(json["Owner"], "foo@example.com");
        assert_eq!(json["Created"], "2022-06-02T01:02:03Z");
        assert_eq!(json["LastEdit"], "2022-06-02T01:02:03Z");
    }

    #[test]
    fn test_link_json_without_id() {
        let line = r#"{"Short":"Docs","Long":"https://docs.example.com","Created":"2022-06-02T01:02:03Z","LastEdit":"2022-06-02T01:02:03Z","Owner":"a@example.com"}"#;

        let link: Link = serde_json::from_str(line).unwrap();

        assert_eq!(link.id, "");
        assert_eq!(link.normalized().id, "docs");
    }
}
