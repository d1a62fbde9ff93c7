//! # gpt - Minimal Chat CLI
//!
//! `gpt` is a small interactive chat client for OpenAI-compatible
//! completion endpoints. The conversation lives entirely in the client:
//! every turn resends the whole transcript, preamble first.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start chatting with the configured defaults
//! gpt
//!
//! # Override settings for one session
//! gpt --model gpt-4o --temperature 0.2 --system-message "Answer tersely."
//!
//! # Pipe a scripted conversation
//! printf 'hello\nhistory\nexit\n' | gpt
//! ```
//!
//! Inside the loop, `help` (`?`), `clear` (`c`), `history` (`h`) and `exit`
//! are commands; anything else is sent to the model.
//!
//! ## Configuration
//!
//! Settings are stored in `~/.chatgpt_config.json`, created with defaults
//! on first run:
//!
//! ```json
//! {
//!   "model": "gpt-3.5-turbo",
//!   "max_tokens": 1024,
//!   "temperature": 0.7,
//!   "api_key": null,
//!   "system_message": "You are ChatGPT, ..."
//! }
//! ```
//!
//! An optional `endpoint` field points the client at another
//! OpenAI-compatible service.

/// Conversation state and the interactive loop.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Client for the remote chat completion service.
pub mod completion;

/// Settings file management and CLI overlay.
pub mod config;

/// File system utilities.
pub mod fs;

/// Line sources for interactive and piped input.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (colors).
pub mod output;

/// Location of the settings file.
pub mod paths;

/// Terminal UI components (spinner, colors).
pub mod ui;
