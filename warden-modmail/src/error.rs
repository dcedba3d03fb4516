use std::time::Duration;

use thiserror::Error;

use crate::identity::SubjectId;

/// Rejections a modmail action can end in.
///
/// Every variant is reported privately to the staff member who invoked the
/// action; none of them is an unhandled fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("channel `{name}` is not a modmail channel")]
    NotAModmailChannel { name: String },
    #[error("no account found for `{0}`")]
    UserNotFound(SubjectId),
    #[error("message body is empty")]
    EmptyBody,
    #[error("message body exceeds {max} characters")]
    BodyTooLong { max: usize },
    #[error("user lookup failed: {0}")]
    Lookup(String),
    #[error("failed to post to the staff channel: {0}")]
    ChannelPost(String),
    #[error("no open modmail case for `{0}`")]
    NoOpenCase(SubjectId),
}

impl RelayError {
    /// Text shown to the invoking staff member.
    pub fn acknowledgment(&self) -> String {
        match self {
            Self::NotAModmailChannel { .. } => {
                "This command can only be used in a modmail channel.".to_owned()
            }
            Self::UserNotFound(subject) => {
                format!("I couldn't find the user for this case (`{subject}`).")
            }
            Self::EmptyBody => "Message content cannot be empty.".to_owned(),
            Self::BodyTooLong { max } => {
                format!("Message content is too long (max {max} characters).")
            }
            Self::Lookup(_) => "I couldn't look up the user for this case. Try again.".to_owned(),
            Self::ChannelPost(_) => {
                "I couldn't post in this channel. Check my permissions here.".to_owned()
            }
            Self::NoOpenCase(_) => "There is no open modmail case for this user.".to_owned(),
        }
    }
}

/// Why a direct message to the subject could not be delivered.
///
/// Always recovered into a fallback notice in the staff channel, never
/// returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    #[error("direct message rejected: {0}")]
    Rejected(String),
    #[error("direct message timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}
