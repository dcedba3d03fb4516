//! In-memory platform used by the relay tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::anyhow;

use crate::identity::{SubjectId, channel_name_for};
use crate::message::{RelayMessage, StaffPost};
use crate::platform::{CaseLookup, ChannelHandle, ChannelPost, Delivery, Directory, SubjectProfile};

#[derive(Clone, Copy, Debug, Default)]
pub enum DeliveryMode {
    #[default]
    Accept,
    Reject,
    Hang,
}

#[derive(Default)]
struct Recorded {
    deliveries: Vec<(SubjectProfile, RelayMessage)>,
    posts: Vec<(ChannelHandle, StaffPost)>,
}

#[derive(Default)]
pub struct FakePlatform {
    users: HashMap<String, String>,
    channels: Vec<ChannelHandle>,
    delivery: DeliveryMode,
    lookups_fail: bool,
    posts_fail: bool,
    lookups: AtomicUsize,
    recorded: Mutex<Recorded>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. `id` must be a canonical snowflake.
    pub fn with_user(mut self, id: &str, display_name: &str) -> Self {
        self.users.insert(id.to_owned(), display_name.to_owned());
        self
    }

    pub fn with_channel(mut self, channel: ChannelHandle) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_delivery(mut self, mode: DeliveryMode) -> Self {
        self.delivery = mode;
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.lookups_fail = true;
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.posts_fail = true;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn deliveries(&self) -> Vec<(SubjectProfile, RelayMessage)> {
        self.recorded.lock().unwrap().deliveries.clone()
    }

    pub fn posts(&self) -> Vec<(ChannelHandle, StaffPost)> {
        self.recorded.lock().unwrap().posts.clone()
    }
}

impl Directory for FakePlatform {
    async fn lookup_user(&self, id: &SubjectId) -> anyhow::Result<Option<SubjectProfile>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.lookups_fail {
            return Err(anyhow!("directory unavailable"));
        }

        if id.as_u64().is_none() {
            return Ok(None);
        }

        Ok(self.users.get(id.as_str()).map(|name| SubjectProfile {
            id: id.clone(),
            display_name: name.clone(),
            avatar_url: None,
        }))
    }
}

impl Delivery for FakePlatform {
    async fn send_direct(
        &self,
        subject: &SubjectProfile,
        message: &RelayMessage,
    ) -> anyhow::Result<()> {
        self.recorded
            .lock()
            .unwrap()
            .deliveries
            .push((subject.clone(), message.clone()));

        match self.delivery {
            DeliveryMode::Accept => Ok(()),
            DeliveryMode::Reject => Err(anyhow!("Cannot send messages to this user")),
            DeliveryMode::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

impl ChannelPost for FakePlatform {
    async fn post(&self, channel: &ChannelHandle, post: &StaffPost) -> anyhow::Result<()> {
        if self.posts_fail {
            return Err(anyhow!("Missing Access"));
        }

        self.recorded
            .lock()
            .unwrap()
            .posts
            .push((channel.clone(), post.clone()));
        Ok(())
    }
}

impl CaseLookup for FakePlatform {
    async fn find_case_channel(&self, subject: &SubjectId) -> anyhow::Result<Option<ChannelHandle>> {
        let channel_name = channel_name_for(subject);
        Ok(self
            .channels
            .iter()
            .find(|channel| channel.name == channel_name)
            .cloned())
    }
}
