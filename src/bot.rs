//! Discord bot core logic and command dispatch.

use std::sync::Mutex;

use log::{debug, error, info};
use poise::{
    Framework, FrameworkOptions, PrefixFrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, GatewayIntents},
};

use crate::commands::poll_commands;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::poll::Poll;

/// Shared state handed to every command invocation.
///
/// The current poll is process-wide: creating a new poll replaces the old one
/// wholesale. The mutex serializes create/vote/results so two votes from the
/// same voter cannot race past the uniqueness check.
pub struct Data {
    pub poll: Mutex<Option<Poll>>,
}

/// Run the Discord bot.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: poll_commands(),
            prefix_options: PrefixFrameworkOptions {
                prefix: Some("!".to_string()),
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                debug!("Registering commands globally");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(Data {
                    poll: Mutex::new(None),
                })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut client = ClientBuilder::new(config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, BotError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Error processing command from {}: {}",
                ctx.author().tag(),
                error
            );
            if let Err(e) = ctx.say(error.user_message()).await {
                error!("Failed to send error reply: {}", e);
            }
        }
        other => {
            if let Err(e) = builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
