use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::modmail::embeds::reply_receipt_embed;
use crate::modmail::{SerenityPlatform, acknowledge_privately, invoking_channel, staff_profile};
use crate::moderation::embeds::{guild_only_message, permission_denied_message, usage_message};
use warden_core::{Context, Error};
use warden_modmail::ModmailRelay;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "modmail reply",
    desc: "Send a message to the user of this modmail channel.",
    category: "modmail",
    usage: "!modmail reply [anonymous] <message>",
};

/// Send a message to the user of this modmail channel.
#[poise::command(prefix_command, slash_command, category = "Modmail")]
pub async fn reply(
    ctx: Context<'_>,
    #[description = "Hide your name behind the staff team identity"]
    #[flag]
    anonymous: bool,
    #[description = "Message to send"]
    #[rest]
    message: Option<String>,
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

    let Some(message) = message else {
        let reply = poise::CreateReply::default().content(usage_message(META.usage));
        return acknowledge_privately(ctx, reply).await;
    };

    // Delivery can take up to the configured timeout; keep the interaction alive.
    ctx.defer_ephemeral().await?;

    let channel = invoking_channel(ctx).await?;
    let guild = guild_id.to_partial_guild(ctx.http()).await?;
    let platform = SerenityPlatform::new(ctx.http(), guild_id, guild.name.clone());
    let relay = ModmailRelay::new(&platform, &ctx.data().modmail, guild.icon_url());

    let reply = match relay
        .relay_reply(&channel, &staff_profile(ctx.author()), &message, anonymous)
        .await
    {
        Ok(outcome) => poise::CreateReply::default().embed(reply_receipt_embed(&outcome)),
        Err(rejection) => poise::CreateReply::default().content(rejection.acknowledgment()),
    };

    acknowledge_privately(ctx, reply).await
}
