use anyhow::bail;
use poise::serenity_prelude as serenity;

use warden_modmail::{
    CaseLookup, ChannelHandle, ChannelPost, Delivery, Directory, RelayMessage, StaffPost, SubjectId,
    SubjectProfile, channel_name_for,
};

use crate::modmail::embeds::{direct_reply_embed, staff_post_embeds};

/// Modmail capabilities backed by the Discord HTTP API.
pub struct SerenityPlatform<'a> {
    http: &'a serenity::Http,
    guild_id: serenity::GuildId,
    guild_name: String,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(http: &'a serenity::Http, guild_id: serenity::GuildId, guild_name: String) -> Self {
        Self {
            http,
            guild_id,
            guild_name,
        }
    }
}

fn display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Subject profile of a user who wrote to the bot directly.
pub fn subject_from_user(user: &serenity::User) -> SubjectProfile {
    SubjectProfile {
        id: SubjectId::new(user.id.get().to_string()),
        display_name: display_name(user),
        avatar_url: Some(user.face()),
    }
}

fn is_unknown_user_error(source: &serenity::Error) -> bool {
    matches!(
        source,
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 404 || response.error.code == 10013
    )
}

impl Directory for SerenityPlatform<'_> {
    async fn lookup_user(&self, id: &SubjectId) -> anyhow::Result<Option<SubjectProfile>> {
        let Some(raw_id) = id.as_u64() else {
            return Ok(None);
        };

        match self.http.get_user(serenity::UserId::new(raw_id)).await {
            Ok(user) => Ok(Some(SubjectProfile {
                id: id.clone(),
                display_name: display_name(&user),
                avatar_url: Some(user.face()),
            })),
            Err(source) if is_unknown_user_error(&source) => Ok(None),
            Err(source) => Err(source.into()),
        }
    }
}

impl Delivery for SerenityPlatform<'_> {
    async fn send_direct(
        &self,
        subject: &SubjectProfile,
        message: &RelayMessage,
    ) -> anyhow::Result<()> {
        let Some(raw_id) = subject.id.as_u64() else {
            bail!("`{}` is not a user id", subject.id);
        };

        let dm_channel = serenity::UserId::new(raw_id)
            .create_dm_channel(self.http)
            .await?;
        dm_channel
            .send_message(
                self.http,
                serenity::CreateMessage::new().embed(direct_reply_embed(message, &self.guild_name)),
            )
            .await?;

        Ok(())
    }
}

impl ChannelPost for SerenityPlatform<'_> {
    async fn post(&self, channel: &ChannelHandle, post: &StaffPost) -> anyhow::Result<()> {
        let channel_id = serenity::ChannelId::new(channel.id);
        for embed in staff_post_embeds(post) {
            channel_id
                .send_message(
                    self.http,
                    serenity::CreateMessage::new()
                        .embed(embed)
                        .allowed_mentions(serenity::CreateAllowedMentions::new()),
                )
                .await?;
        }

        Ok(())
    }
}

impl CaseLookup for SerenityPlatform<'_> {
    async fn find_case_channel(&self, subject: &SubjectId) -> anyhow::Result<Option<ChannelHandle>> {
        let channel_name = channel_name_for(subject);
        let channels = self.guild_id.channels(self.http).await?;

        Ok(channels
            .values()
            .find(|channel| channel.name == channel_name)
            .map(|channel| ChannelHandle::new(channel.id.get(), channel.name.clone())))
    }
}
