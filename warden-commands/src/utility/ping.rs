use std::time::Instant;

use warden_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check that the bot is responsive.",
    category: "utility",
    usage: "!ping",
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let handle = ctx.say("Pong!").await?;
    let elapsed_ms = started.elapsed().as_millis();

    handle
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("Pong! ({} ms)", elapsed_ms)),
        )
        .await?;
    Ok(())
}
