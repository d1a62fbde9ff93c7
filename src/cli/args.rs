use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;

use crate::completion::DEFAULT_ENDPOINT;
use crate::config::{ConfigFile, SettingsOverrides, validate_temperature};

/// Command-line arguments. Every setting defaults to the config file value.
#[derive(Parser, Debug)]
#[command(name = "gpt")]
#[command(about = "Chat with GPT")]
#[command(version)]
pub struct Args {
    /// The name of the GPT model to use
    #[arg(long)]
    pub model: Option<String>,

    /// The maximum number of tokens to generate in the response
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// The temperature to use for sampling from the GPT model (0 to 2)
    #[arg(long, value_parser = parse_temperature)]
    pub temperature: Option<f64>,

    /// The OpenAI API key to use (falls back to OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// The message added to the chat before the first message
    #[arg(long)]
    pub system_message: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Parses the process arguments, showing `defaults` in `--help`.
    pub fn parse_with_defaults(defaults: &ConfigFile) -> Self {
        Self::try_parse_with_defaults(std::env::args_os(), defaults).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_with_defaults<I, T>(
        args: I,
        defaults: &ConfigFile,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command_with_defaults(defaults);
        let matches = command.try_get_matches_from_mut(args)?;
        Self::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
    }

    /// The clap command with each setting's help suffixed by its current default.
    pub fn command_with_defaults(defaults: &ConfigFile) -> clap::Command {
        let api_key = if defaults.api_key.is_some() {
            "set in config file"
        } else {
            "none"
        };
        let endpoint = defaults.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

        Self::command()
            .mut_arg("model", |a| with_default(a, &defaults.model))
            .mut_arg("max_tokens", |a| with_default(a, defaults.max_tokens))
            .mut_arg("temperature", |a| with_default(a, defaults.temperature))
            .mut_arg("api_key", |a| with_default(a, api_key))
            .mut_arg("system_message", |a| with_default(a, &defaults.system_message))
            .mut_arg("endpoint", |a| with_default(a, endpoint))
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            api_key: self.api_key.clone(),
            system_message: self.system_message.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

fn with_default(arg: clap::Arg, default: impl std::fmt::Display) -> clap::Arg {
    let help = arg.get_help().map(ToString::to_string).unwrap_or_default();
    arg.help(format!("{help} (Default: {default})"))
}

fn parse_temperature(value: &str) -> Result<f64, String> {
    let temperature: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    validate_temperature(temperature).map_err(|e| e.to_string())?;
    Ok(temperature)
}
