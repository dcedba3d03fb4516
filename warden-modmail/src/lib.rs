//! Modmail relay engine.
//!
//! A modmail case is a staff channel named `modmail-<user id>`. This crate
//! derives the subject from that name, relays staff replies to the subject
//! by direct message (falling back to a notice in the staff channel when
//! delivery fails), posts staff-only notes, and forwards the subject's own
//! direct messages into their case channel.
//!
//! Nothing here talks to Discord directly: the chat platform is reached
//! through the capability traits in [`platform`].

pub mod error;
pub mod identity;
pub mod message;
pub mod platform;
pub mod relay;

#[cfg(test)]
mod fake;

pub use error::{DeliveryFailure, RelayError};
pub use identity::{CHANNEL_PREFIX, SubjectId, channel_name_for, parse_subject_id, resolve_subject};
pub use message::{Direction, Identity, RelayMessage, StaffPost, StaffProfile, TeamProfile};
pub use platform::{CaseLookup, ChannelHandle, ChannelPost, Delivery, Directory, SubjectProfile};
pub use relay::{MAX_BODY_CHARS, ModmailRelay, ModmailSettings, RelayOutcome};
