use std::sync::Arc;

use poise::serenity_prelude as serenity;

use warden_appeals::{AppealRecord, AppealSink};
use warden_utils::embed::DEFAULT_EMBED_COLOR;
use warden_utils::formatting::{sanitize_mentions, truncate_chars};

const EMBED_FIELD_LIMIT: usize = 1024;

/// Surfaces accepted appeals as embeds in the appeals channel.
pub struct ChannelAppealSink {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
}

impl ChannelAppealSink {
    pub fn new(http: Arc<serenity::Http>, channel_id: serenity::ChannelId) -> Self {
        Self { http, channel_id }
    }
}

fn field_value(raw: &str) -> String {
    truncate_chars(&sanitize_mentions(raw), EMBED_FIELD_LIMIT)
}

/// `(name, value)` pairs shown on an appeal embed.
fn appeal_fields(appeal: &AppealRecord) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        (
            "User",
            format!("<@{}> (`{}`)", appeal.user_id, appeal.user_id),
        ),
        ("Username", field_value(&appeal.username)),
        ("Reason", field_value(&appeal.reason)),
    ];

    if let Some(details) = appeal.details.as_deref() {
        fields.push(("Details", field_value(details)));
    }

    fields.push(("Case channel", format!("`#{}`", appeal.case_channel_name())));
    fields
}

impl AppealSink for ChannelAppealSink {
    async fn submit(&self, appeal: &AppealRecord) -> anyhow::Result<()> {
        let embed = serenity::CreateEmbed::new()
            .color(DEFAULT_EMBED_COLOR)
            .title("New appeal")
            .fields(
                appeal_fields(appeal)
                    .into_iter()
                    .map(|(name, value)| (name, value, false)),
            );

        self.channel_id
            .send_message(
                &*self.http,
                serenity::CreateMessage::new()
                    .embed(embed)
                    .allowed_mentions(serenity::CreateAllowedMentions::new()),
            )
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::appeal_fields;
    use warden_appeals::AppealRecord;

    #[test]
    fn lists_fields_with_case_channel() {
        let appeal = AppealRecord {
            user_id: "123".to_owned(),
            username: "avery".to_owned(),
            reason: "please @here".to_owned(),
            details: None,
        };

        let fields = appeal_fields(&appeal);
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["User", "Username", "Reason", "Case channel"]);
        assert_eq!(fields[2].1, "please @\u{200B}here");
        assert_eq!(fields[3].1, "`#modmail-123`");
    }
}
