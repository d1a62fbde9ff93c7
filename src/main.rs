use anyhow::Result;

use gpt_cli::cli::Args;
use gpt_cli::cli::commands::chat;
use gpt_cli::config::{ConfigFile, ConfigManager};
use gpt_cli::logging;
use gpt_cli::output::{self, OutputConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Read-only: a missing file is created later by the chat command, not by --help.
    let defaults = ConfigManager::new()
        .and_then(|m| m.load())
        .unwrap_or_else(|_| ConfigFile::default());
    let args = Args::parse_with_defaults(&defaults);

    output::init(OutputConfig::from_flag(args.no_color));
    logging::init();

    chat::run_chat(args.overrides()).await
}
