//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::Link;
use crate::utils::code_generator::CODE_REGEX;
use crate::utils::url_validator::validate_target;

/// Request to create a short link.
///
/// A missing `target` deserializes as an empty string so that it is reported as an invalid
/// target rather than a malformed body. An empty `code` means "generate one". Target length
/// is not limited.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(custom(function = "http_target"))]
    pub target: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(regex(path = *CODE_REGEX, message = "Code must match [A-Za-z0-9]{6,8}"))]
    pub code: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn http_target(target: &str) -> Result<(), ValidationError> {
    validate_target(target).map_err(|e| {
        ValidationError::new("http_target").with_message(e.to_string().into())
    })
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub code: String,
    pub target: String,
    pub created_at: DateTime<Utc>,
    pub clicks: u64,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            target: link.target,
            created_at: link.created_at,
            clicks: link.clicks,
            last_clicked_at: link.last_clicked_at,
        }
    }
}
