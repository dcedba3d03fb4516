use tokio::time::{Duration, sleep};
use tracing::error;

use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::moderation::embeds::{
    guild_only_message, is_missing_permissions_error, permission_denied_message, usage_message,
};
use crate::moderation::logging::{ModAction, publish_mod_action};
use warden_core::{Context, Error};
use warden_utils::permissions::has_user_permission;
use warden_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "clear",
    desc: "Bulk delete the latest messages in this channel.",
    category: "moderation",
    usage: "!clear <amount>",
};

const MAX_CLEAR: u8 = 100;
/// Discord refuses to bulk delete messages older than two weeks.
const BULK_DELETE_MAX_AGE_SECS: u64 = 14 * 24 * 60 * 60;

/// Group message ids into bulk delete requests, appending the invoking
/// prefix message (not counted as cleared) when there is one.
fn delete_batches<T>(mut targets: Vec<T>, invocation: Option<T>) -> Vec<Vec<T>> {
    targets.extend(invocation);

    let mut batches = Vec::new();
    while targets.len() > usize::from(MAX_CLEAR) {
        let rest = targets.split_off(usize::from(MAX_CLEAR));
        batches.push(std::mem::replace(&mut targets, rest));
    }
    if !targets.is_empty() {
        batches.push(targets);
    }
    batches
}

fn is_bulk_deletable(created_unix: i64, now_unix: u64) -> bool {
    let Ok(created_unix) = u64::try_from(created_unix) else {
        return false;
    };
    now_unix.saturating_sub(created_unix) < BULK_DELETE_MAX_AGE_SECS
}

#[poise::command(prefix_command, slash_command, category = "Moderation")]
pub async fn clear(
    ctx: Context<'_>,
    #[description = "Amount of messages to delete (1-100)"] amount: Option<u8>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    let Some(requested) = amount else {
        ctx.say(usage_message(META.usage)).await?;
        return Ok(());
    };

    if requested == 0 || requested > MAX_CLEAR {
        ctx.say(format!("Amount must be between 1 and {}.", MAX_CLEAR))
            .await?;
        return Ok(());
    }

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::MANAGE_MESSAGES,
    )
    .await?
    {
        ctx.say(permission_denied_message()).await?;
        return Ok(());
    }

    let invocation = match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg.id),
        _ => None,
    };
    if invocation.is_none() {
        ctx.defer_ephemeral().await?;
    }

    let channel_id = ctx.channel_id();
    let mut request = serenity::GetMessages::new().limit(requested);
    if let Some(invocation_id) = invocation {
        request = request.before(invocation_id);
    }
    let messages = channel_id.messages(ctx.http(), request).await?;

    let now = now_unix_secs();
    let ids: Vec<serenity::MessageId> = messages
        .into_iter()
        .filter(|message| is_bulk_deletable(message.timestamp.unix_timestamp(), now))
        .map(|message| message.id)
        .collect();

    if ids.is_empty() {
        ctx.say("No recent messages found to delete.").await?;
        return Ok(());
    }

    let deleted_count = ids.len();
    let mut delete_result = Ok(());
    for batch in delete_batches(ids, invocation) {
        delete_result = if batch.len() == 1 {
            channel_id.delete_message(ctx.http(), batch[0]).await
        } else {
            channel_id.delete_messages(ctx.http(), batch).await
        };
        if delete_result.is_err() {
            break;
        }
    }

    if let Err(source) = delete_result {
        if !is_missing_permissions_error(&source) {
            error!(?source, "clear delete request failed");
        }
        ctx.say("I couldn't delete messages. I likely need the 'Manage Messages' permission.")
            .await?;
        return Ok(());
    }

    publish_mod_action(
        &ctx,
        ModAction {
            action: "clear",
            moderator_user_id: ctx.author().id.get(),
            target_user_id: None,
            channel_id: Some(channel_id.get()),
            reason: None,
            detail: Some(format!("{} message(s)", deleted_count)),
        },
    )
    .await;

    let summary = format!("Cleared {} message(s).", deleted_count);
    if invocation.is_none() {
        ctx.send(poise::CreateReply::default().ephemeral(true).content(summary))
            .await?;
        return Ok(());
    }

    let success_message = channel_id.say(ctx.http(), summary).await?;
    sleep(Duration::from_secs(3)).await;
    let _ = success_message.delete(ctx.http()).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BULK_DELETE_MAX_AGE_SECS, delete_batches, is_bulk_deletable};

    #[test]
    fn invocation_is_deleted_but_not_counted() {
        let targets: Vec<u64> = (1..=10).collect();
        let batches = delete_batches(targets.clone(), Some(99));
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 11);
        assert_eq!(batches[0].last(), Some(&99));

        assert_eq!(delete_batches(targets, None)[0].len(), 10);
    }

    #[test]
    fn full_clear_with_invocation_splits_requests() {
        let targets: Vec<u64> = (1..=100).collect();
        let batches = delete_batches(targets, Some(500));
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[1], [500]);
    }

    #[test]
    fn nothing_to_delete_yields_no_requests() {
        assert!(delete_batches::<u64>(Vec::new(), None).is_empty());
    }

    #[test]
    fn old_messages_are_skipped() {
        let now = 2_000_000;
        assert!(is_bulk_deletable(1_999_000, now));
        assert!(!is_bulk_deletable((now - BULK_DELETE_MAX_AGE_SECS) as i64, now));
        assert!(!is_bulk_deletable(-1, now));
    }
}
