use poise::serenity_prelude as serenity;
use warden_modmail::ModmailSettings;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub guild_id: serenity::GuildId,
    pub modlog_channel_id: Option<serenity::ChannelId>,
    pub modmail: ModmailSettings,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
