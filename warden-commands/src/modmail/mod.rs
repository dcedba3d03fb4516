//! `modmail` command group and the Discord side of the relay.

pub mod embeds;
pub mod note;
pub mod platform;
pub mod reply;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use warden_core::{Context, Error};
use warden_modmail::{ChannelHandle, StaffProfile};

pub use platform::SerenityPlatform;

use note::note;
use reply::reply;

pub const META: CommandMeta = CommandMeta {
    name: "modmail",
    desc: "Talk to a user through their modmail channel.",
    category: "modmail",
    usage: "!modmail <reply|note> ...",
};

#[poise::command(
    prefix_command,
    slash_command,
    subcommands("reply", "note"),
    subcommand_required,
    category = "Modmail"
)]
pub async fn modmail(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Staff identity of the invoking user.
pub fn staff_profile(user: &serenity::User) -> StaffProfile {
    StaffProfile {
        user_id: user.id.get(),
        name: user.global_name.clone().unwrap_or_else(|| user.name.clone()),
        avatar_url: Some(user.face()),
    }
}

/// Handle of the channel the command was invoked in.
///
/// Non-guild channels resolve to an empty name, which the relay rejects.
pub(crate) async fn invoking_channel(ctx: Context<'_>) -> Result<ChannelHandle, Error> {
    let channel_id = ctx.channel_id();
    let channel = channel_id.to_channel(ctx.serenity_context()).await?;
    let name = channel.guild().map(|channel| channel.name).unwrap_or_default();

    Ok(ChannelHandle::new(channel_id.get(), name))
}

/// Reply visible only to the invoking staff member.
pub(crate) async fn acknowledge_privately(
    ctx: Context<'_>,
    reply: poise::CreateReply,
) -> Result<(), Error> {
    ctx.send(reply.ephemeral(true)).await?;
    Ok(())
}
