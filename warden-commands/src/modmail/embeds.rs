use poise::serenity_prelude as serenity;

use warden_modmail::{
    DeliveryFailure, Identity, RelayMessage, RelayOutcome, StaffPost, SubjectProfile,
};
use warden_utils::embed::{DEFAULT_EMBED_COLOR, WARNING_EMBED_COLOR};
use warden_utils::formatting::{sanitize_mentions, truncate_chars};

const EMBED_DESCRIPTION_LIMIT: usize = 4096;
const EMBED_FOOTER_LIMIT: usize = 2048;

fn identity_author(identity: &Identity) -> serenity::CreateEmbedAuthor {
    let author = serenity::CreateEmbedAuthor::new(identity.display_name());
    match identity.icon_url() {
        Some(url) => author.icon_url(url),
        None => author,
    }
}

fn with_timestamp(embed: serenity::CreateEmbed, unix_secs: u64) -> serenity::CreateEmbed {
    match i64::try_from(unix_secs)
        .ok()
        .and_then(|secs| serenity::Timestamp::from_unix_timestamp(secs).ok())
    {
        Some(timestamp) => embed.timestamp(timestamp),
        None => embed,
    }
}

fn preview_body(body: &str) -> String {
    truncate_chars(&sanitize_mentions(body), EMBED_DESCRIPTION_LIMIT)
}

/// Split `text` into pieces of at most `limit` characters. Always yields at
/// least one piece.
fn chunk_chars(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    chunks.push(current);
    chunks
}

/// Embed delivered to the subject's direct messages.
pub fn direct_reply_embed(message: &RelayMessage, guild_name: &str) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .author(identity_author(&message.sender))
        .description(message.body.clone())
        .footer(serenity::CreateEmbedFooter::new(direct_reply_footer(guild_name)));

    with_timestamp(embed, message.timestamp)
}

pub fn direct_reply_footer(guild_name: &str) -> String {
    format!("Staff reply from {}", guild_name)
}

struct PostLayout<'a> {
    message: &'a RelayMessage,
    color: u32,
    title: Option<String>,
    footer: String,
}

fn post_layout(post: &StaffPost) -> PostLayout<'_> {
    match post {
        StaffPost::Note(message) => PostLayout {
            message,
            color: DEFAULT_EMBED_COLOR,
            title: Some("Internal note".to_owned()),
            footer: "Staff only. Not sent to the user.".to_owned(),
        },
        StaffPost::DeliveryFallback {
            message,
            subject,
            failure,
        } => PostLayout {
            message,
            color: WARNING_EMBED_COLOR,
            title: Some(fallback_title(subject)),
            footer: fallback_footer(failure, &message.sender),
        },
        StaffPost::Inbound(message) => PostLayout {
            message,
            color: DEFAULT_EMBED_COLOR,
            title: None,
            footer: inbound_footer(&message.sender),
        },
    }
}

/// Embeds posted into a modmail channel for one staff post.
///
/// Bodies longer than an embed description continue in further embeds; the
/// first carries the author and title, the last the footer and timestamp.
pub fn staff_post_embeds(post: &StaffPost) -> Vec<serenity::CreateEmbed> {
    let layout = post_layout(post);
    let chunks = chunk_chars(
        &sanitize_mentions(&layout.message.body),
        EMBED_DESCRIPTION_LIMIT,
    );
    let last = chunks.len() - 1;

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let mut embed = serenity::CreateEmbed::new()
                .color(layout.color)
                .description(chunk);

            if index == 0 {
                if let Some(title) = &layout.title {
                    embed = embed.title(title.clone());
                }
                embed = embed.author(identity_author(&layout.message.sender));
            }
            if index == last {
                embed = embed.footer(serenity::CreateEmbedFooter::new(layout.footer.clone()));
                embed = with_timestamp(embed, layout.message.timestamp);
            }

            embed
        })
        .collect()
}

pub fn inbound_footer(sender: &Identity) -> String {
    match sender {
        Identity::Subject(subject) => format!("User ID {}", subject.id),
        _ => "Direct message".to_owned(),
    }
}

pub fn fallback_title(subject: &SubjectProfile) -> String {
    truncate_chars(
        &format!("Message not delivered to {}", subject.display_name),
        256,
    )
}

pub fn fallback_footer(failure: &DeliveryFailure, sender: &Identity) -> String {
    let reason = match failure {
        DeliveryFailure::Rejected(_) => "The user has direct messages closed or is unreachable.".to_owned(),
        DeliveryFailure::TimedOut(after) => {
            format!("Discord did not answer within {}s.", after.as_secs())
        }
    };

    let sent_as = if sender.is_cloaked() {
        format!("Sent anonymously as {}", sender.display_name())
    } else {
        format!("Sent by {}", sender.display_name())
    };

    truncate_chars(&format!("{} {}", reason, sent_as), EMBED_FOOTER_LIMIT)
}

/// Private acknowledgment shown to the staff member after a reply.
pub fn reply_receipt_embed(outcome: &RelayOutcome) -> serenity::CreateEmbed {
    let color = if outcome.is_warning() {
        WARNING_EMBED_COLOR
    } else {
        DEFAULT_EMBED_COLOR
    };

    let embed = serenity::CreateEmbed::new()
        .color(color)
        .title(outcome.acknowledgment());

    match outcome {
        RelayOutcome::Delivered { message, .. } | RelayOutcome::Fallback { message, .. } => embed
            .author(identity_author(&message.sender))
            .description(preview_body(&message.body)),
        RelayOutcome::Noted { .. } | RelayOutcome::Forwarded { .. } => embed,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        EMBED_DESCRIPTION_LIMIT, chunk_chars, direct_reply_footer, fallback_footer, fallback_title,
        inbound_footer, staff_post_embeds,
    };
    use warden_modmail::{
        DeliveryFailure, Direction, Identity, RelayMessage, StaffPost, StaffProfile, SubjectId,
        SubjectProfile, TeamProfile,
    };

    fn subject() -> SubjectProfile {
        SubjectProfile {
            id: SubjectId::new("1"),
            display_name: "Avery".to_owned(),
            avatar_url: None,
        }
    }

    fn inbound(body: String) -> StaffPost {
        StaffPost::Inbound(RelayMessage {
            body,
            sender: Identity::Subject(subject()),
            direction: Direction::UserToStaff,
            timestamp: 1_700_000_000,
        })
    }

    #[test]
    fn chunks_respect_limit_and_keep_every_char() {
        let text = "ab".repeat(5);
        let chunks = chunk_chars(&text, 4);
        assert_eq!(chunks, ["abab", "abab", "ab"]);
        assert_eq!(chunks.concat(), text);

        assert_eq!(chunk_chars("", 4), [""]);
        assert_eq!(chunk_chars("abcd", 4), ["abcd"]);
    }

    #[test]
    fn long_inbound_post_spans_several_embeds() {
        let short = staff_post_embeds(&inbound("hello".to_owned()));
        assert_eq!(short.len(), 1);

        let long = staff_post_embeds(&inbound("x".repeat(EMBED_DESCRIPTION_LIMIT + 10)));
        assert_eq!(long.len(), 2);
    }

    #[test]
    fn inbound_footer_names_user_id() {
        assert_eq!(inbound_footer(&Identity::Subject(subject())), "User ID 1");
    }

    #[test]
    fn fallback_title_names_subject() {
        assert_eq!(fallback_title(&subject()), "Message not delivered to Avery");
    }

    #[test]
    fn anonymous_fallback_footer_hides_staff_name() {
        let sender = Identity::Cloaked(TeamProfile {
            name: "Staff Team".to_owned(),
            icon_url: None,
        });
        let footer = fallback_footer(&DeliveryFailure::Rejected("50007".to_owned()), &sender);

        assert!(footer.contains("direct messages closed"));
        assert!(footer.ends_with("Sent anonymously as Staff Team"));
        assert!(!footer.contains("50007"));
    }

    #[test]
    fn timed_out_fallback_footer_reports_wait() {
        let sender = Identity::Real(StaffProfile {
            user_id: 2,
            name: "jordan".to_owned(),
            avatar_url: None,
        });
        let footer = fallback_footer(&DeliveryFailure::TimedOut(Duration::from_secs(10)), &sender);

        assert_eq!(
            footer,
            "Discord did not answer within 10s. Sent by jordan"
        );
    }

    #[test]
    fn direct_reply_footer_names_guild() {
        assert_eq!(direct_reply_footer("Cozy Corner"), "Staff reply from Cozy Corner");
    }
}
