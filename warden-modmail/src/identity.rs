use std::fmt;

use crate::error::RelayError;
use crate::platform::{ChannelHandle, Directory, SubjectProfile};

/// Name prefix that marks a channel as a modmail case.
pub const CHANNEL_PREFIX: &str = "modmail-";

/// Raw platform identifier of the individual behind a modmail case.
///
/// Kept as the exact text found after the prefix so that re-deriving the
/// channel name is lossless.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric form of the identifier, if it is a valid non-zero snowflake
    /// written canonically (no leading zeros).
    pub fn as_u64(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        if self.0.len() > 1 && self.0.starts_with('0') {
            return None;
        }
        self.0.parse::<u64>().ok().filter(|value| *value != 0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the subject identifier from a channel name.
pub fn parse_subject_id(channel_name: &str) -> Result<SubjectId, RelayError> {
    match channel_name.strip_prefix(CHANNEL_PREFIX) {
        Some(raw) if !raw.is_empty() => Ok(SubjectId::new(raw)),
        _ => Err(RelayError::NotAModmailChannel {
            name: channel_name.to_owned(),
        }),
    }
}

/// Channel name of the case belonging to `subject`.
pub fn channel_name_for(subject: &SubjectId) -> String {
    format!("{}{}", CHANNEL_PREFIX, subject.as_str())
}

/// Resolve the account behind a modmail channel.
///
/// Fails with `NotAModmailChannel` before touching the directory when the
/// channel name lacks the prefix.
pub async fn resolve_subject<D>(
    directory: &D,
    channel: &ChannelHandle,
) -> Result<SubjectProfile, RelayError>
where
    D: Directory + Sync,
{
    let subject_id = parse_subject_id(&channel.name)?;

    match directory.lookup_user(&subject_id).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(RelayError::UserNotFound(subject_id)),
        Err(source) => Err(RelayError::Lookup(format!("{source:#}"))),
    }
}
