mod appeals;
mod config;
mod events;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use appeals::ChannelAppealSink;
use config::{AppealsConfig, BotConfig};
use warden_appeals::AppealState;
use warden_core::{Data, Error};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;
    info!(
        guild_id = config.guild_id,
        modlog_enabled = config.modlog_channel_id.is_some(),
        delivery_timeout_seconds = config.modmail.delivery_timeout.as_secs(),
        "Configuration loaded."
    );

    let data = Data {
        guild_id: serenity::GuildId::new(config.guild_id),
        modlog_channel_id: config.modlog_channel_id.map(serenity::ChannelId::new),
        modmail: config.modmail.clone(),
    };

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: warden_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(warden_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Warden is on duty.");

                poise::builtins::register_in_guild(
                    ctx,
                    &framework.options().commands,
                    data.guild_id,
                )
                .await?;

                Ok(data)
            })
        })
        .build();

    info!("Warden is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    match config.appeals {
        AppealsConfig::Enabled(appeals) => {
            let sink = ChannelAppealSink::new(
                client.http.clone(),
                serenity::ChannelId::new(appeals.channel_id),
            );
            let state = AppealState::new(appeals.api_token, sink);
            tokio::spawn(async move {
                if let Err(err) = warden_appeals::serve(appeals.bind_addr, state).await {
                    error!(?err, "appeal intake stopped");
                }
            });
        }
        AppealsConfig::Misconfigured(reason) => {
            warn!(%reason, "APPEALS_ENABLED=true but the appeal intake is misconfigured; it stays off.");
        }
        AppealsConfig::Disabled => {
            info!("Appeal intake disabled (set APPEALS_ENABLED=true to enable).");
        }
    }

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(warden_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `!{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        events::modmail_inbound::handle_direct_message(ctx, data, new_message).await;
    }

    Ok(())
}
