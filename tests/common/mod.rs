#![allow(clippy::unwrap_used, dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const REPLY_HELLO: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "choices": [
        {"index": 0, "message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
    ]
}"#;

/// A throwaway home directory for one invocation of the binary.
pub struct TestHome {
    pub dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Creates a home whose settings file already holds `json`.
    pub fn with_config(json: &str) -> Self {
        let home = Self::new();
        fs::write(home.config_path(), json).unwrap();
        home
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join(".chatgpt_config.json")
    }

    /// The `gpt` binary with a clean, colorless environment.
    #[allow(deprecated)]
    pub fn gpt(&self) -> Command {
        let mut cmd = Command::cargo_bin("gpt").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("OPENAI_API_KEY")
            .env_remove("GPT_CLI_LOG");
        cmd
    }
}

pub fn config_json(model: &str, max_tokens: u32, endpoint: &str) -> String {
    serde_json::json!({
        "model": model,
        "max_tokens": max_tokens,
        "temperature": 0.5,
        "api_key": "sk-file",
        "system_message": "S",
        "endpoint": endpoint,
    })
    .to_string()
}
