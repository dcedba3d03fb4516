use crate::error::DeliveryFailure;
use crate::platform::SubjectProfile;

/// Real identity of a staff member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaffProfile {
    pub user_id: u64,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Team-level identity used to cloak replies. Holds no per-member data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamProfile {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Identity attached to a relayed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    Real(StaffProfile),
    Cloaked(TeamProfile),
    /// The subject, on messages they sent to the bot.
    Subject(SubjectProfile),
}

impl Identity {
    /// Pick the identity for a reply. Anonymous replies never carry `staff`.
    pub fn for_reply(staff: &StaffProfile, anonymous: bool, team: &TeamProfile) -> Self {
        if anonymous {
            Self::Cloaked(team.clone())
        } else {
            Self::Real(staff.clone())
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Real(staff) => &staff.name,
            Self::Cloaked(team) => &team.name,
            Self::Subject(subject) => &subject.display_name,
        }
    }

    pub fn icon_url(&self) -> Option<&str> {
        match self {
            Self::Real(staff) => staff.avatar_url.as_deref(),
            Self::Cloaked(team) => team.icon_url.as_deref(),
            Self::Subject(subject) => subject.avatar_url.as_deref(),
        }
    }

    pub fn is_cloaked(&self) -> bool {
        matches!(self, Self::Cloaked(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    StaffToUser,
    StaffToStaff,
    UserToStaff,
}

/// One relayed message. Lives only for the duration of a single attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayMessage {
    pub body: String,
    pub sender: Identity,
    pub direction: Direction,
    pub timestamp: u64,
}

/// Everything the relay ever writes into a staff channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaffPost {
    /// Staff-only annotation.
    Note(RelayMessage),
    /// A reply that could not reach the subject, kept in full.
    DeliveryFallback {
        message: RelayMessage,
        subject: SubjectProfile,
        failure: DeliveryFailure,
    },
    /// A direct message the subject sent to the bot.
    Inbound(RelayMessage),
}

#[cfg(test)]
mod tests {
    use super::{Identity, StaffProfile, TeamProfile};
    use crate::identity::SubjectId;
    use crate::platform::SubjectProfile;

    fn staff() -> StaffProfile {
        StaffProfile {
            user_id: 10,
            name: "jordan".to_owned(),
            avatar_url: Some("https://cdn.example/jordan.png".to_owned()),
        }
    }

    fn team() -> TeamProfile {
        TeamProfile {
            name: "Staff Team".to_owned(),
            icon_url: Some("https://cdn.example/guild.png".to_owned()),
        }
    }

    #[test]
    fn anonymous_reply_uses_team_identity() {
        let identity = Identity::for_reply(&staff(), true, &team());
        assert!(identity.is_cloaked());
        assert_eq!(identity.display_name(), "Staff Team");
        assert_eq!(identity.icon_url(), Some("https://cdn.example/guild.png"));
    }

    #[test]
    fn default_reply_uses_staff_identity() {
        let identity = Identity::for_reply(&staff(), false, &team());
        assert_eq!(identity, Identity::Real(staff()));
        assert_eq!(identity.display_name(), "jordan");
    }

    #[test]
    fn subject_identity_shows_the_user() {
        let identity = Identity::Subject(SubjectProfile {
            id: SubjectId::new("7"),
            display_name: "Avery".to_owned(),
            avatar_url: Some("https://cdn.example/avery.png".to_owned()),
        });
        assert!(!identity.is_cloaked());
        assert_eq!(identity.display_name(), "Avery");
        assert_eq!(identity.icon_url(), Some("https://cdn.example/avery.png"));
    }
}
