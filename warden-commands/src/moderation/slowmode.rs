use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, permission_denied_message,
};
use crate::moderation::logging::{ModAction, publish_mod_action};
use warden_core::{Context, Error};
use warden_utils::embed::notice_embed;
use warden_utils::formatting::format_compact_duration;
use warden_utils::parse::parse_duration_seconds;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "slowmode",
    desc: "Set the per-user message delay in this channel (max 6h).",
    category: "moderation",
    usage: "!slowmode <duration|off>",
};

/// Discord caps `rate_limit_per_user` at six hours.
const MAX_SLOWMODE_SECS: u16 = 21_600;

/// Parse a slowmode argument into seconds; `off` and `0` disable it.
fn parse_slowmode(raw: &str) -> Option<u16> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("off") || value == "0" {
        return Some(0);
    }

    parse_duration_seconds(value)
        .and_then(|seconds| u16::try_from(seconds).ok())
        .filter(|seconds| *seconds <= MAX_SLOWMODE_SECS)
}

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn slowmode(
    ctx: Context<'_>,
    #[description = "Delay such as 10s, 2m, 1h, or off"] duration: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_CHANNELS,
    )
    .await?
    {
        ctx.say(permission_denied_message()).await?;
        return Ok(());
    }

    let Some(seconds) = duration.as_deref().and_then(parse_slowmode) else {
        ctx.say(format!(
            "Invalid duration. Usage: `{}` (examples: 10s, 2m, 1h, off; max 6h)",
            META.usage
        ))
        .await?;
        return Ok(());
    };

    let channel_id = ctx.channel_id();
    let edit = serenity::EditChannel::new().rate_limit_per_user(seconds);
    if let Err(source) = channel_id.edit(ctx.http(), edit).await {
        if !is_missing_permissions_error(&source) {
            error!(?source, "slowmode edit request failed");
        }
        ctx.say("I couldn't change slowmode. I likely need the 'Manage Channels' permission.")
            .await?;
        return Ok(());
    }

    let label = if seconds == 0 {
        "off".to_owned()
    } else {
        format_compact_duration(u64::from(seconds))
    };

    publish_mod_action(
        &ctx,
        ModAction {
            action: "slowmode",
            moderator_user_id: ctx.author().id.get(),
            target_user_id: None,
            channel_id: Some(channel_id.get()),
            reason: None,
            detail: Some(label.clone()),
        },
    )
    .await;

    ctx.send(poise::CreateReply::default().embed(notice_embed(
        "Slowmode updated",
        format!("Slowmode is now **{}**.", label),
    )))
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_slowmode;

    #[test]
    fn accepts_durations_within_range() {
        assert_eq!(parse_slowmode("10s"), Some(10));
        assert_eq!(parse_slowmode("2m"), Some(120));
        assert_eq!(parse_slowmode("6h"), Some(21_600));
    }

    #[test]
    fn off_disables() {
        assert_eq!(parse_slowmode("off"), Some(0));
        assert_eq!(parse_slowmode("OFF"), Some(0));
        assert_eq!(parse_slowmode("0"), Some(0));
    }

    #[test]
    fn rejects_out_of_range_or_garbage() {
        assert_eq!(parse_slowmode("6h 1s"), None);
        assert_eq!(parse_slowmode("1d"), None);
        assert_eq!(parse_slowmode("soon"), None);
    }
}
