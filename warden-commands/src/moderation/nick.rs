use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, permission_denied_message, usage_message,
};
use crate::moderation::logging::{ModAction, publish_mod_action};
use warden_core::{Context, Error};
use warden_utils::embed::notice_embed;
use warden_utils::formatting::sanitize_mentions;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "nick",
    desc: "Change or reset a member's nickname.",
    category: "moderation",
    usage: "!nick <user> [nickname]",
};

const MAX_NICKNAME_CHARS: usize = 32;

/// Normalized nickname; an empty string resets to the account name.
fn normalize_nickname(raw: Option<&str>) -> Result<String, String> {
    let nickname = raw.map(str::trim).unwrap_or_default();
    if nickname.chars().count() > MAX_NICKNAME_CHARS {
        return Err(format!(
            "Nicknames can be at most {} characters.",
            MAX_NICKNAME_CHARS
        ));
    }
    Ok(nickname.to_owned())
}

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn nick(
    ctx: Context<'_>,
    #[description = "Member to rename"] user: Option<serenity::User>,
    #[description = "New nickname (leave empty to reset)"]
    #[rest]
    nickname: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_NICKNAMES,
    )
    .await?
    {
        ctx.say(permission_denied_message()).await?;
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    let nickname = match normalize_nickname(nickname.as_deref()) {
        Ok(nickname) => nickname,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let edit = serenity::EditMember::new().nickname(nickname.clone());
    if let Err(source) = guild_id.edit_member(ctx.http(), user.id, edit).await {
        if !is_missing_permissions_error(&source) {
            error!(?source, "nickname edit request failed");
        }
        ctx.say("I couldn't change that nickname. Check role hierarchy and permissions.")
            .await?;
        return Ok(());
    }

    let detail = if nickname.is_empty() {
        "Nickname reset".to_owned()
    } else {
        format!("Nickname set to {}", nickname)
    };

    publish_mod_action(
        &ctx,
        ModAction {
            action: "nick",
            moderator_user_id: ctx.author().id.get(),
            target_user_id: Some(user.id.get()),
            channel_id: None,
            reason: None,
            detail: Some(detail.clone()),
        },
    )
    .await;

    ctx.send(poise::CreateReply::default().embed(notice_embed(
        "Nickname updated",
        format!("<@{}>: {}", user.id.get(), sanitize_mentions(&detail)),
    )))
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::normalize_nickname;

    #[test]
    fn trims_and_resets() {
        assert_eq!(normalize_nickname(Some("  Ace  ")), Ok("Ace".to_owned()));
        assert_eq!(normalize_nickname(None), Ok(String::new()));
        assert_eq!(normalize_nickname(Some("   ")), Ok(String::new()));
    }

    #[test]
    fn rejects_long_names() {
        assert!(normalize_nickname(Some(&"x".repeat(33))).is_err());
        assert!(normalize_nickname(Some(&"x".repeat(32))).is_ok());
    }
}
