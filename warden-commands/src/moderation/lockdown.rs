use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, permission_denied_message, usage_message,
};
use crate::moderation::logging::{ModAction, publish_mod_action};
use warden_core::{Context, Error};
use warden_utils::embed::notice_embed;
use warden_utils::parse::parse_toggle;
use warden_utils::permissions::has_user_permission;

pub const META: CommandMeta = CommandMeta {
    name: "lockdown",
    desc: "Stop (or allow again) @everyone from sending messages in this channel.",
    category: "moderation",
    usage: "!lockdown [on|off] [reason]",
};

fn locked_bits() -> serenity::Permissions {
    serenity::Permissions::SEND_MESSAGES | serenity::Permissions::SEND_MESSAGES_IN_THREADS
}

fn everyone_overwrite<'a>(
    overwrites: &'a [serenity::PermissionOverwrite],
    everyone: serenity::RoleId,
) -> Option<&'a serenity::PermissionOverwrite> {
    overwrites
        .iter()
        .find(|overwrite| overwrite.kind == serenity::PermissionOverwriteType::Role(everyone))
}

fn is_locked(existing: Option<&serenity::PermissionOverwrite>) -> bool {
    existing.is_some_and(|overwrite| overwrite.deny.contains(serenity::Permissions::SEND_MESSAGES))
}

/// The `@everyone` overwrite after locking or unlocking, keeping unrelated bits.
fn lockdown_overwrite(
    existing: Option<&serenity::PermissionOverwrite>,
    everyone: serenity::RoleId,
    lock: bool,
) -> serenity::PermissionOverwrite {
    let (mut allow, mut deny) = existing.map_or(
        (serenity::Permissions::empty(), serenity::Permissions::empty()),
        |overwrite| (overwrite.allow, overwrite.deny),
    );

    if lock {
        allow.remove(locked_bits());
        deny.insert(locked_bits());
    } else {
        deny.remove(locked_bits());
    }

    serenity::PermissionOverwrite {
        allow,
        deny,
        kind: serenity::PermissionOverwriteType::Role(everyone),
    }
}

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn lockdown(
    ctx: Context<'_>,
    #[description = "on to lock, off to unlock (default: toggle)"] mode: Option<String>,
    #[description = "Reason for the lockdown"]
    #[rest]
    reason: Option<String>,
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

    let requested = match mode.as_deref() {
        Some(raw) => match parse_toggle(raw) {
            Some(lock) => Some(lock),
            None => {
                ctx.say(usage_message(META.usage)).await?;
                return Ok(());
            }
        },
        None => None,
    };

    let channel_id = ctx.channel_id();
    let Some(channel) = channel_id.to_channel(ctx.serenity_context()).await?.guild() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let everyone = serenity::RoleId::new(guild_id.get());
    let existing = everyone_overwrite(&channel.permission_overwrites, everyone);
    let lock = requested.unwrap_or(!is_locked(existing));
    let overwrite = lockdown_overwrite(existing, everyone, lock);

    if let Err(source) = channel_id.create_permission(ctx.http(), overwrite).await {
        if !is_missing_permissions_error(&source) {
            error!(?source, "lockdown overwrite request failed");
        }
        ctx.say("I couldn't change this channel's permissions. I likely need 'Manage Roles'.")
            .await?;
        return Ok(());
    }

    publish_mod_action(
        &ctx,
        ModAction {
            action: if lock { "lockdown" } else { "unlock" },
            moderator_user_id: ctx.author().id.get(),
            target_user_id: None,
            channel_id: Some(channel_id.get()),
            reason: reason.as_deref(),
            detail: None,
        },
    )
    .await;

    let (title, description) = if lock {
        ("Channel locked", "Members can no longer send messages here.")
    } else {
        ("Channel unlocked", "Members can send messages here again.")
    };
    ctx.send(poise::CreateReply::default().embed(notice_embed(title, description)))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_locked, lockdown_overwrite, locked_bits};
    use poise::serenity_prelude as serenity;

    fn everyone() -> serenity::RoleId {
        serenity::RoleId::new(10)
    }

    #[test]
    fn locking_denies_sending_and_keeps_other_bits() {
        let existing = serenity::PermissionOverwrite {
            allow: serenity::Permissions::SEND_MESSAGES | serenity::Permissions::ADD_REACTIONS,
            deny: serenity::Permissions::ATTACH_FILES,
            kind: serenity::PermissionOverwriteType::Role(everyone()),
        };

        let locked = lockdown_overwrite(Some(&existing), everyone(), true);

        assert!(locked.deny.contains(locked_bits()));
        assert!(locked.deny.contains(serenity::Permissions::ATTACH_FILES));
        assert!(!locked.allow.contains(serenity::Permissions::SEND_MESSAGES));
        assert!(locked.allow.contains(serenity::Permissions::ADD_REACTIONS));
        assert!(is_locked(Some(&locked)));
    }

    #[test]
    fn unlocking_only_clears_lock_bits() {
        let existing = serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: locked_bits() | serenity::Permissions::EMBED_LINKS,
            kind: serenity::PermissionOverwriteType::Role(everyone()),
        };

        let unlocked = lockdown_overwrite(Some(&existing), everyone(), false);

        assert_eq!(unlocked.deny, serenity::Permissions::EMBED_LINKS);
        assert!(!is_locked(Some(&unlocked)));
    }

    #[test]
    fn missing_overwrite_is_unlocked() {
        assert!(!is_locked(None));
        let locked = lockdown_overwrite(None, everyone(), true);
        assert_eq!(locked.deny, locked_bits());
        assert_eq!(locked.allow, serenity::Permissions::empty());
    }
}
