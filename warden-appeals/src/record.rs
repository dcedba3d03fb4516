use serde::Deserialize;
use thiserror::Error;

use warden_modmail::{SubjectId, channel_name_for};

/// An appeal as submitted by the web form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealRecord {
    pub user_id: String,
    pub username: String,
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppealRejection {
    #[error("`{0}` is required")]
    MissingField(&'static str),
    #[error("`userId` must be a numeric account id")]
    InvalidUserId,
}

impl AppealRecord {
    /// Trim every field and check the required ones. Blank `details` become `None`.
    pub fn normalized(self) -> Result<Self, AppealRejection> {
        let user_id = required(self.user_id, "userId")?;
        if !user_id.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AppealRejection::InvalidUserId);
        }

        Ok(Self {
            user_id,
            username: required(self.username, "username")?,
            reason: required(self.reason, "reason")?,
            details: self
                .details
                .map(|details| details.trim().to_owned())
                .filter(|details| !details.is_empty()),
        })
    }

    /// Name of the modmail channel that belongs to this appellant.
    pub fn case_channel_name(&self) -> String {
        channel_name_for(&SubjectId::new(self.user_id.clone()))
    }
}

fn required(value: String, field: &'static str) -> Result<String, AppealRejection> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppealRejection::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{AppealRecord, AppealRejection};

    fn record() -> AppealRecord {
        AppealRecord {
            user_id: " 123456789012345678 ".to_owned(),
            username: "avery".to_owned(),
            reason: "I was banned by mistake".to_owned(),
            details: Some("   ".to_owned()),
        }
    }

    #[test]
    fn deserializes_camel_case_body() {
        let parsed: AppealRecord = serde_json::from_str(
            r#"{"userId":"1","username":"a","reason":"r"}"#,
        )
        .unwrap();
        assert_eq!(parsed.user_id, "1");
        assert_eq!(parsed.details, None);
    }

    #[test]
    fn normalizes_fields() {
        let normalized = record().normalized().unwrap();
        assert_eq!(normalized.user_id, "123456789012345678");
        assert_eq!(normalized.details, None);
        assert_eq!(normalized.case_channel_name(), "modmail-123456789012345678");
    }

    #[test]
    fn blank_required_field_is_rejected() {
        let appeal = AppealRecord {
            reason: "  ".to_owned(),
            ..record()
        };
        assert_eq!(
            appeal.normalized(),
            Err(AppealRejection::MissingField("reason"))
        );
    }

    #[test]
    fn non_numeric_user_id_is_rejected() {
        let appeal = AppealRecord {
            user_id: "avery".to_owned(),
            ..record()
        };
        assert_eq!(appeal.normalized(), Err(AppealRejection::InvalidUserId));
    }
}
