use tracing::error;

use poise::serenity_prelude as serenity;

use warden_core::Context;
use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::formatting::{action_display_name, sanitize_mentions};
use warden_utils::time::{discord_timestamp, now_unix_secs};

/// A completed moderation action, as shown in the modlog channel.
pub struct ModAction<'a> {
    pub action: &'a str,
    pub moderator_user_id: u64,
    pub target_user_id: Option<u64>,
    pub channel_id: Option<u64>,
    pub reason: Option<&'a str>,
    pub detail: Option<String>,
}

pub fn mod_action_description(action: &ModAction<'_>, when: u64) -> String {
    let mut fields = vec![format!("**Action :** {}", action_display_name(action.action))];

    if let Some(target_user_id) = action.target_user_id {
        fields.push(format!("**Target :** <@{}>", target_user_id));
    }

    if let Some(channel_id) = action.channel_id {
        fields.push(format!("**Channel :** <#{}>", channel_id));
    }

    if let Some(detail) = action.detail.as_deref() {
        fields.push(format!("**Details :** {}", sanitize_mentions(detail)));
    }

    fields.push(format!(
        "**Reason :** {}",
        sanitize_mentions(action.reason.unwrap_or("No reason provided"))
    ));
    fields.push(format!("**Moderator :** <@{}>", action.moderator_user_id));
    fields.push(format!(
        "**When :** {} • {}",
        discord_timestamp(when, 'R'),
        discord_timestamp(when, 'f')
    ));

    fields.join("\n")
}

/// Post `action` to the configured modlog channel, if any. Failures are logged only.
pub async fn publish_mod_action(ctx: &Context<'_>, action: ModAction<'_>) {
    let Some(channel_id) = ctx.data().modlog_channel_id else {
        return;
    };

    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(action_display_name(action.action))
        .description(mod_action_description(&action, now_unix_secs()));

    if let Err(source) = channel_id
        .send_message(ctx.http(), serenity::CreateMessage::new().embed(embed))
        .await
    {
        error!(?source, action = action.action, "failed to publish to modlog channel");
    }
}
