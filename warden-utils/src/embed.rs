use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x3B_6E_8F;

/// Accent used for degraded-but-completed outcomes (e.g. undeliverable modmail).
pub const WARNING_EMBED_COLOR: u32 = 0xE0_A1_2B;

/// Build a plain titled embed with the default color.
pub fn notice_embed(title: &str, description: impl Into<String>) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title.to_owned())
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

