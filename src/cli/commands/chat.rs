use anyhow::Result;
use std::io::{self, IsTerminal};
use std::path::Path;

use crate::chat::ChatSession;
use crate::completion::{CompletionError, OpenAiClient};
use crate::config::{ConfigManager, Settings, SettingsOverrides, resolve_settings};
use crate::input::{LineReader, PromptReader, StdinReader};
use crate::ui;

/// Loads settings and runs the chat loop until the user leaves.
pub async fn run_chat(overrides: SettingsOverrides) -> Result<()> {
    let manager = ConfigManager::new()?;
    let settings = load_settings(&manager, &overrides)?;

    if settings.api_key.is_none() {
        tracing::warn!(
            "no API key configured; set one with --api-key, in {}, or via OPENAI_API_KEY",
            manager.config_path().display()
        );
    }

    let interactive = io::stdin().is_terminal();
    let client = OpenAiClient::new(settings.endpoint.clone(), settings.api_key.clone());

    let result = if interactive {
        drive(settings, client, PromptReader::new(), io::stderr().is_terminal()).await
    } else {
        drive(settings, client, StdinReader::stdin(), false).await
    };

    result.map_err(add_auth_hint)
}

fn load_settings(manager: &ConfigManager, overrides: &SettingsOverrides) -> Result<Settings> {
    let (config_file, created) = manager.load_or_create()?;
    if created {
        ui::print_status(&mut io::stdout(), &created_message(manager.config_path()))?;
    }

    resolve_settings(overrides, &config_file)
}

fn created_message(path: &Path) -> String {
    format!("Config file not found at {}. Creating one now...", path.display())
}

async fn drive<R: LineReader>(
    settings: Settings,
    client: OpenAiClient,
    reader: R,
    show_spinner: bool,
) -> Result<()> {
    let mut session =
        ChatSession::new(settings, client, reader, io::stdout()).with_spinner(show_spinner);
    session.run().await?;
    Ok(())
}

fn add_auth_hint(err: anyhow::Error) -> anyhow::Error {
    let rejected = err
        .downcast_ref::<CompletionError>()
        .is_some_and(CompletionError::is_auth);

    if rejected {
        err.context(
            "The API key was rejected. Provide a valid key via --api-key, \
             the api_key field of the config file, or OPENAI_API_KEY",
        )
    } else {
        err
    }
}
