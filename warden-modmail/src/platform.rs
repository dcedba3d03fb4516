//! Chat-platform capabilities consumed by the relay.
//!
//! The bot implements these against Discord; tests use an in-memory fake.

use std::future::Future;

use crate::identity::SubjectId;
use crate::message::{RelayMessage, StaffPost};

/// A staff-visible channel, identified by id and carrying its current name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: u64,
    pub name: String,
}

impl ChannelHandle {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// The account a modmail case is about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectProfile {
    pub id: SubjectId,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

pub trait Directory {
    /// `Ok(None)` when no such account exists.
    fn lookup_user(
        &self,
        id: &SubjectId,
    ) -> impl Future<Output = anyhow::Result<Option<SubjectProfile>>> + Send;
}

pub trait Delivery {
    fn send_direct(
        &self,
        subject: &SubjectProfile,
        message: &RelayMessage,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub trait ChannelPost {
    fn post(
        &self,
        channel: &ChannelHandle,
        post: &StaffPost,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub trait CaseLookup {
    /// Find the open case channel of `subject`, if any.
    fn find_case_channel(
        &self,
        subject: &SubjectId,
    ) -> impl Future<Output = anyhow::Result<Option<ChannelHandle>>> + Send;
}
