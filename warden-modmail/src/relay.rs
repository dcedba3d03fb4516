use std::time::Duration;

use tracing::{error, info, warn};

use warden_utils::time::now_unix_secs;

use crate::error::{DeliveryFailure, RelayError};
use crate::identity::{parse_subject_id, resolve_subject};
use crate::message::{Direction, Identity, RelayMessage, StaffPost, StaffProfile, TeamProfile};
use crate::platform::{CaseLookup, ChannelHandle, ChannelPost, Delivery, Directory, SubjectProfile};

/// Longest body accepted for a staff reply or note.
pub const MAX_BODY_CHARS: usize = 4000;
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TEAM_NAME: &str = "Staff Team";

#[derive(Clone, Debug)]
pub struct ModmailSettings {
    /// Upper bound on a single direct-message attempt.
    pub delivery_timeout: Duration,
    /// Display name of the cloaked identity.
    pub team_name: String,
}

impl Default for ModmailSettings {
    fn default() -> Self {
        Self {
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            team_name: DEFAULT_TEAM_NAME.to_owned(),
        }
    }
}

/// How a modmail action completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The subject received the reply.
    Delivered {
        subject: SubjectProfile,
        message: RelayMessage,
    },
    /// The subject could not be reached; a notice holding the full reply
    /// was posted in the staff channel instead.
    Fallback {
        subject: SubjectProfile,
        message: RelayMessage,
        failure: DeliveryFailure,
    },
    /// A staff-only note was posted.
    Noted { message: RelayMessage },
    /// The subject's direct message was posted into their case channel.
    Forwarded { channel: ChannelHandle },
}

impl RelayOutcome {
    /// Whether the invoking actor should see this as success with a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Text shown to whoever triggered the action.
    pub fn acknowledgment(&self) -> String {
        match self {
            Self::Delivered { subject, .. } => {
                format!("Message sent to **{}**.", subject.display_name)
            }
            Self::Fallback { subject, .. } => format!(
                "Message recorded, but **{}** couldn't be reached by direct message. \
                 A notice was posted in this channel.",
                subject.display_name
            ),
            Self::Noted { .. } => "Note added.".to_owned(),
            Self::Forwarded { .. } => "Your message has been forwarded to the staff team.".to_owned(),
        }
    }
}

/// Runs modmail actions against a chat platform.
///
/// Holds no state across calls: two actions on the same case may run
/// concurrently and are ordered only by the platform.
pub struct ModmailRelay<'a, P> {
    platform: &'a P,
    settings: &'a ModmailSettings,
    team: TeamProfile,
}

impl<'a, P> ModmailRelay<'a, P> {
    pub fn new(platform: &'a P, settings: &'a ModmailSettings, team_icon_url: Option<String>) -> Self {
        Self {
            platform,
            settings,
            team: TeamProfile {
                name: settings.team_name.clone(),
                icon_url: team_icon_url,
            },
        }
    }
}

impl<P> ModmailRelay<'_, P>
where
    P: Directory + Delivery + ChannelPost + Sync,
{
    /// Relay a staff reply to the subject of `channel`.
    ///
    /// Exactly one delivery attempt is made per call; calling twice sends
    /// twice. A failed or timed-out delivery is not an error: it posts a
    /// fallback notice in `channel` and returns [`RelayOutcome::Fallback`].
    pub async fn relay_reply(
        &self,
        channel: &ChannelHandle,
        staff: &StaffProfile,
        body: &str,
        anonymous: bool,
    ) -> Result<RelayOutcome, RelayError> {
        let body = validate_body(body)?;
        let subject = resolve_subject(self.platform, channel).await?;

        let message = RelayMessage {
            body,
            sender: Identity::for_reply(staff, anonymous, &self.team),
            direction: Direction::StaffToUser,
            timestamp: now_unix_secs(),
        };

        match self.deliver(&subject, &message).await {
            Ok(()) => {
                info!(
                    channel_id = channel.id,
                    subject_id = %subject.id,
                    anonymous,
                    "modmail reply delivered"
                );
                Ok(RelayOutcome::Delivered { subject, message })
            }
            Err(failure) => {
                warn!(
                    channel_id = channel.id,
                    subject_id = %subject.id,
                    %failure,
                    "modmail reply undeliverable; posting fallback notice"
                );

                let notice = StaffPost::DeliveryFallback {
                    message: message.clone(),
                    subject: subject.clone(),
                    failure: failure.clone(),
                };
                self.post(channel, &notice).await?;

                Ok(RelayOutcome::Fallback {
                    subject,
                    message,
                    failure,
                })
            }
        }
    }

    /// Post a staff-only note into `channel`. Never reaches the subject.
    pub async fn add_note(
        &self,
        channel: &ChannelHandle,
        staff: &StaffProfile,
        body: &str,
    ) -> Result<RelayOutcome, RelayError> {
        let body = validate_body(body)?;
        parse_subject_id(&channel.name)?;

        let message = RelayMessage {
            body,
            sender: Identity::Real(staff.clone()),
            direction: Direction::StaffToStaff,
            timestamp: now_unix_secs(),
        };

        self.post(channel, &StaffPost::Note(message.clone())).await?;
        info!(channel_id = channel.id, staff_id = staff.user_id, "modmail note added");

        Ok(RelayOutcome::Noted { message })
    }

    async fn deliver(
        &self,
        subject: &SubjectProfile,
        message: &RelayMessage,
    ) -> Result<(), DeliveryFailure> {
        let timeout = self.settings.delivery_timeout;
        match tokio::time::timeout(timeout, self.platform.send_direct(subject, message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(DeliveryFailure::Rejected(format!("{source:#}"))),
            Err(_elapsed) => Err(DeliveryFailure::TimedOut(timeout)),
        }
    }
}

impl<P> ModmailRelay<'_, P>
where
    P: CaseLookup + ChannelPost + Sync,
{
    /// Forward a direct message from `author` into their open case channel.
    ///
    /// Fails with `NoOpenCase` when no `modmail-<id>` channel exists; the
    /// relay never opens cases itself. The body is not length-bounded here:
    /// whatever the subject sent is posted in full.
    pub async fn forward_inbound(
        &self,
        author: &SubjectProfile,
        body: &str,
    ) -> Result<RelayOutcome, RelayError> {
        require_content(body)?;

        let channel = match self.platform.find_case_channel(&author.id).await {
            Ok(Some(channel)) => channel,
            Ok(None) => return Err(RelayError::NoOpenCase(author.id.clone())),
            Err(source) => return Err(RelayError::Lookup(format!("{source:#}"))),
        };

        let message = RelayMessage {
            body: body.to_owned(),
            sender: Identity::Subject(author.clone()),
            direction: Direction::UserToStaff,
            timestamp: now_unix_secs(),
        };
        self.post(&channel, &StaffPost::Inbound(message)).await?;
        info!(channel_id = channel.id, subject_id = %author.id, "modmail inbound forwarded");

        Ok(RelayOutcome::Forwarded { channel })
    }
}

impl<P> ModmailRelay<'_, P>
where
    P: ChannelPost + Sync,
{
    async fn post(&self, channel: &ChannelHandle, post: &StaffPost) -> Result<(), RelayError> {
        self.platform.post(channel, post).await.map_err(|source| {
            error!(?source, channel_id = channel.id, "failed to post modmail message");
            RelayError::ChannelPost(format!("{source:#}"))
        })
    }
}

fn require_content(raw: &str) -> Result<(), RelayError> {
    if raw.trim().is_empty() {
        return Err(RelayError::EmptyBody);
    }
    Ok(())
}

/// Check a staff-written body and return it unchanged.
///
/// Whitespace-only bodies are empty; surrounding whitespace is otherwise kept.
pub fn validate_body(raw: &str) -> Result<String, RelayError> {
    require_content(raw)?;
    if raw.chars().count() > MAX_BODY_CHARS {
        return Err(RelayError::BodyTooLong {
            max: MAX_BODY_CHARS,
        });
    }
    Ok(raw.to_owned())
}
