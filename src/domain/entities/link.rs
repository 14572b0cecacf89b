//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code mapped to a target URL, with click accounting.
///
/// The code keeps the casing it was created with; uniqueness and lookups ignore ASCII case
/// (see [`Link::matches`]). The serialized shape is also the persisted
/// document layout, so field names are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Creates a fresh record with no clicks.
    pub fn new(code: String, target: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            target,
            created_at,
            clicks: 0,
            last_clicked_at: None,
        }
    }

    /// Returns true if `code` refers to this link, ignoring case.
    pub fn matches(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }

    /// Counts one redirect at `at`.
    pub fn record_click(&mut self, at: DateTime<Utc>) {
        self.clicks = self.clicks.saturating_add(1);
        self.last_clicked_at = Some(at);
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub target: String,
}

impl NewLink {
    /// Builds the stored record, stamping it with `created_at`.
    pub fn into_link(self, created_at: DateTime<Utc>) -> Link {
        Link::new(self.code, self.target, created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            "AbC123x".to_string(),
            "https://example.com".to_string(),
            now,
        );

        assert_eq!(link.code, "AbC123x");
        assert_eq!(link.target, "https://example.com");
        assert_eq!(link.created_at, now);
        assert_eq!(link.clicks, 0);
        assert!(link.last_clicked_at.is_none());
    }

    #[test]
    fn test_matches_ignores_case_but_code_keeps_case() {
        let link = Link::new("MyCode1".to_string(), "https://x.com".to_string(), Utc::now());

        assert_eq!(link.code, "MyCode1");
        assert!(link.matches("mycode1"));
        assert!(link.matches("MYCODE1"));
        assert!(!link.matches("mycode2"));
    }

    #[test]
    fn test_record_click() {
        let mut link = Link::new("abcdef".to_string(), "https://x.com".to_string(), Utc::now());
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 1, 11, 0, 0).unwrap();

        link.record_click(first);
        link.record_click(second);

        assert_eq!(link.clicks, 2);
        assert_eq!(link.last_clicked_at, Some(second));
    }

    #[test]
    fn test_json_shape() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let link = Link::new("abc1234".to_string(), "https://x.com".to_string(), created);

        let value = serde_json::to_value(&link).unwrap();

        assert_eq!(value["code"], "abc1234");
        assert_eq!(value["target"], "https://x.com");
        assert_eq!(value["createdAt"], "2024-01-02T03:04:05Z");
        assert_eq!(value["clicks"], 0);
        assert!(value["lastClickedAt"].is_null());
    }

    #[test]
    fn test_reads_document_written_with_millisecond_timestamps() {
        let json = r#"{
            "code": "Xy12abc",
            "target": "https://example.com",
            "createdAt": "2024-03-01T12:30:00.123Z",
            "clicks": 4,
            "lastClickedAt": null
        }"#;

        let link: Link = serde_json::from_str(json).unwrap();

        assert_eq!(link.code, "Xy12abc");
        assert_eq!(link.clicks, 4);
        assert!(link.last_clicked_at.is_none());
    }

    #[test]
    fn test_new_link_into_link() {
        let now = Utc::now();
        let link = NewLink {
            code: "xyz7890".to_string(),
            target: "https://rust-lang.org".to_string(),
        }
        .into_link(now);

        assert_eq!(link.code, "xyz7890");
        assert_eq!(link.created_at, now);
        assert_eq!(link.clicks, 0);
    }
}
