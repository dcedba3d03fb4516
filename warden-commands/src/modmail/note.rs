use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::modmail::{SerenityPlatform, acknowledge_privately, invoking_channel, staff_profile};
use crate::moderation::embeds::{guild_only_message, permission_denied_message, usage_message};
use warden_core::{Context, Error};
use warden_modmail::ModmailRelay;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "modmail note",
    desc: "Leave a staff-only note in this modmail channel.",
    category: "modmail",
    usage: "!modmail note <note>",
};

/// Leave a staff-only note in this modmail channel.
#[poise::command(prefix_command, slash_command, category = "Modmail")]
pub async fn note(
    ctx: Context<'_>,
    #[description = "Note content"]
    #[rest]
    note: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        let reply = poise::CreateReply::default().content(permission_denied_message());
        return acknowledge_privately(ctx, reply).await;
    }

    let Some(note) = note else {
        let reply = poise::CreateReply::default().content(usage_message(META.usage));
        return acknowledge_privately(ctx, reply).await;
    };

    let channel = invoking_channel(ctx).await?;
    let platform = SerenityPlatform::new(ctx.http(), guild_id, String::new());
    let relay = ModmailRelay::new(&platform, &ctx.data().modmail, None);

    let text = match relay
        .add_note(&channel, &staff_profile(ctx.author()), &note)
        .await
    {
        Ok(outcome) => outcome.acknowledgment(),
        Err(rejection) => rejection.acknowledgment(),
    };

    acknowledge_privately(ctx, poise::CreateReply::default().content(text)).await
}
