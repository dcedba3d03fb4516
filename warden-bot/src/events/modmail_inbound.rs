use poise::serenity_prelude as serenity;
use tracing::{debug, warn};

use warden_commands::modmail::SerenityPlatform;
use warden_commands::modmail::platform::subject_from_user;
use warden_core::Data;
use warden_modmail::{ModmailRelay, RelayError};
use warden_utils::COMMAND_PREFIX;

const FORWARD_FAILED_NOTICE: &str =
    "Your message couldn't be passed on to the staff team right now. Please try again in a few minutes.";

/// Text forwarded for a direct message: its content plus attachment links.
fn inbound_body(content: &str, attachment_urls: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(1 + attachment_urls.len());
    if !content.trim().is_empty() {
        parts.push(content);
    }
    parts.extend(attachment_urls.iter().copied());
    parts.join("\n")
}

/// Whether a direct message should be relayed to staff at all.
fn is_relayable(is_bot: bool, in_guild: bool, content: &str) -> bool {
    !is_bot && !in_guild && !content.trim_start().starts_with(COMMAND_PREFIX)
}

/// Forward a user's direct message into their open modmail channel.
pub async fn handle_direct_message(ctx: &serenity::Context, data: &Data, message: &serenity::Message) {
    if !is_relayable(message.author.bot, message.guild_id.is_some(), &message.content) {
        return;
    }

    let attachment_urls: Vec<&str> = message
        .attachments
        .iter()
        .map(|attachment| attachment.url.as_str())
        .collect();
    let body = inbound_body(&message.content, &attachment_urls);

    let platform = SerenityPlatform::new(&ctx.http, data.guild_id, String::new());
    let relay = ModmailRelay::new(&platform, &data.modmail, None);
    let author = subject_from_user(&message.author);

    match relay.forward_inbound(&author, &body).await {
        Ok(_) => {
            if let Err(source) = message.react(ctx, '✅').await {
                debug!(?source, "failed to acknowledge forwarded direct message");
            }
        }
        Err(RelayError::NoOpenCase(subject_id)) => {
            debug!(%subject_id, "direct message without an open modmail case");
        }
        Err(RelayError::EmptyBody) => {}
        Err(rejection) => {
            warn!(%rejection, subject_id = %author.id, "failed to forward direct message");
            if let Err(source) = message.reply(ctx, FORWARD_FAILED_NOTICE).await {
                debug!(?source, "failed to notify user about unforwarded direct message");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{inbound_body, is_relayable};

    #[test]
    fn joins_content_and_attachments() {
        assert_eq!(
            inbound_body("  hello", &["https://cdn.example/a.png"]),
            "  hello\nhttps://cdn.example/a.png"
        );
        assert_eq!(inbound_body("", &["https://cdn.example/a.png"]), "https://cdn.example/a.png");
        assert_eq!(inbound_body("   ", &[]), "");
    }

    #[test]
    fn prefix_commands_are_not_relayed() {
        assert!(is_relayable(false, false, "hello staff"));
        assert!(!is_relayable(false, false, "!help"));
        assert!(!is_relayable(false, false, "  !modmail reply hi"));
        assert!(!is_relayable(true, false, "hello"));
        assert!(!is_relayable(false, true, "hello"));
    }
}
