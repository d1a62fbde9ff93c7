use anyhow::{Context, Result};
use std::future::Future;
use std::io::Write;
use std::pin::Pin;

use super::command::{Command, Input, parse_input};
use super::message::Message;
use super::transcript::Transcript;
use super::ui;
use crate::completion::{Completer, CompletionRequest};
use crate::config::Settings;
use crate::input::{LineReader, ReadEvent};
use crate::ui::Spinner;

/// Why the chat loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user typed `exit`.
    Command,
    /// Ctrl+C while waiting for input or for a reply.
    Interrupted,
    /// Input was exhausted.
    EndOfInput,
}

/// State of the chat loop after handling one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Exiting(ExitReason),
}

/// Resolves once, when the user asks to abort.
type Interrupt = Pin<Box<dyn Future<Output = ()>>>;

/// An interactive chat session.
///
/// Owns the transcript and drives it from user input. The completion
/// service, the line source and the output sink are injected so the loop
/// can run against a terminal or against scripted input.
pub struct ChatSession<C, R, W> {
    settings: Settings,
    transcript: Transcript,
    completer: C,
    reader: R,
    out: W,
    show_spinner: bool,
    // Polled across reads and requests so a signal between them is not lost.
    interrupt: Interrupt,
}

impl<C, R, W> ChatSession<C, R, W>
where
    C: Completer,
    R: LineReader,
    W: Write,
{
    /// Creates a session whose transcript starts from the configured preamble.
    pub fn new(settings: Settings, completer: C, reader: R, out: W) -> Self {
        let transcript = Transcript::new(settings.system_message.clone());
        Self {
            settings,
            transcript,
            completer,
            reader,
            out,
            show_spinner: false,
            interrupt: Box::pin(ctrl_c()),
        }
    }

    /// Replaces the Ctrl+C listener with another abort trigger.
    #[must_use]
    pub fn with_interrupt(mut self, interrupt: impl Future<Output = ()> + 'static) -> Self {
        self.interrupt = Box::pin(interrupt);
        self
    }

    /// Shows a spinner while a reply is pending.
    #[must_use]
    pub const fn with_spinner(mut self, show: bool) -> Self {
        self.show_spinner = show;
        self
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Runs the loop until the user leaves.
    ///
    /// The exit banner is printed on every path out, including when a
    /// completion fails; that failure is returned afterwards.
    pub async fn run(&mut self) -> Result<ExitReason> {
        let outcome = self.run_until_exit().await;
        let farewell = ui::print_exiting(&mut self.out);
        let reason = outcome?;
        farewell?;
        tracing::debug!(?reason, "chat session finished");
        Ok(reason)
    }

    async fn run_until_exit(&mut self) -> Result<ExitReason> {
        loop {
            let event = tokio::select! {
                event = self.reader.read_line() => event?,
                () = &mut self.interrupt => ReadEvent::Interrupted,
            };

            let state = match event {
                ReadEvent::Line(line) => self.handle_line(&line).await?,
                ReadEvent::Interrupted => self.abort(ExitReason::Interrupted)?,
                ReadEvent::Eof => self.abort(ExitReason::EndOfInput)?,
            };

            if let SessionState::Exiting(reason) = state {
                return Ok(reason);
            }
        }
    }

    /// Classifies and handles a single line of input.
    pub async fn handle_line(&mut self, line: &str) -> Result<SessionState> {
        match parse_input(line) {
            Input::Empty => Ok(SessionState::Running),
            Input::Command(cmd) => self.handle_command(cmd),
            Input::Chat(text) => self.chat_turn(text).await,
        }
    }

    fn handle_command(&mut self, cmd: Command) -> Result<SessionState> {
        match cmd {
            Command::Exit => return Ok(SessionState::Exiting(ExitReason::Command)),
            Command::Clear => {
                self.transcript.reset(self.settings.system_message.clone());
                ui::print_cleared(&mut self.out)?;
            }
            Command::History => ui::print_history(&mut self.out, &self.transcript)?,
            Command::Help => ui::print_help(&mut self.out)?,
        }
        Ok(SessionState::Running)
    }

    async fn chat_turn(&mut self, text: String) -> Result<SessionState> {
        self.transcript.append(Message::user(text));

        let spinner = Spinner::visible_if(self.show_spinner, "Thinking...");
        let reply = {
            let request = CompletionRequest {
                model: &self.settings.model,
                messages: self.transcript.messages(),
                max_tokens: self.settings.max_tokens,
                temperature: self.settings.temperature,
            };

            tokio::select! {
                reply = self.completer.complete(&request) => Some(reply),
                () = &mut self.interrupt => None,
            }
        };
        spinner.stop();

        let Some(reply) = reply else {
            return self.abort(ExitReason::Interrupted);
        };
        let reply = reply.context("Failed to get a reply from the completion service")?;

        writeln!(self.out, "{}", reply.content())?;
        self.transcript.append(reply);
        Ok(SessionState::Running)
    }

    fn abort(&mut self, reason: ExitReason) -> Result<SessionState> {
        // Keep the exit banner off the prompt line.
        writeln!(self.out)?;
        Ok(SessionState::Exiting(reason))
    }
}

/// Resolves when the process receives Ctrl+C.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never fire.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use crate::completion::CompletionError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Replies from a fixed script; `None` simulates a failed request.
    struct ScriptedCompleter {
        replies: Mutex<VecDeque<Option<String>>>,
        requests: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedCompleter {
        fn new(replies: &[Option<&str>]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<Message>> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Completer for &ScriptedCompleter {
        async fn complete(
            &self,
            request: &CompletionRequest<'_>,
        ) -> Result<Message, CompletionError> {
            self.requests.lock().unwrap().push(request.messages.to_vec());
            match self.replies.lock().unwrap().pop_front().flatten() {
                Some(content) => Ok(Message::assistant(content)),
                None => Err(CompletionError::NoChoices),
            }
        }
    }

    /// Fires the session's interrupt, then never replies.
    struct StalledCompleter {
        fire: Mutex<Option<oneshot::Sender<()>>>,
    }

    impl StalledCompleter {
        fn new() -> (Self, impl Future<Output = ()>) {
            let (tx, rx) = oneshot::channel();
            let completer = Self {
                fire: Mutex::new(Some(tx)),
            };
            (completer, async move {
                let _ = rx.await;
            })
        }
    }

    impl Completer for StalledCompleter {
        async fn complete(
            &self,
            _request: &CompletionRequest<'_>,
        ) -> Result<Message, CompletionError> {
            if let Some(tx) = self.fire.lock().unwrap().take() {
                let _ = tx.send(());
            }
            std::future::pending().await
        }
    }

    /// Never produces a line.
    struct StalledReader;

    impl LineReader for StalledReader {
        async fn read_line(&mut self) -> Result<ReadEvent> {
            std::future::pending().await
        }
    }

    struct ScriptedReader {
        events: VecDeque<ReadEvent>,
    }

    impl ScriptedReader {
        fn lines(lines: &[&str]) -> Self {
            Self {
                events: lines
                    .iter()
                    .map(|l| ReadEvent::Line((*l).to_string()))
                    .collect(),
            }
        }

        fn then(mut self, event: ReadEvent) -> Self {
            self.events.push_back(event);
            self
        }
    }

    impl LineReader for ScriptedReader {
        async fn read_line(&mut self) -> Result<ReadEvent> {
            Ok(self.events.pop_front().unwrap_or(ReadEvent::Eof))
        }
    }

    fn settings(preamble: &str) -> Settings {
        Settings {
            model: "gpt-test".to_string(),
            max_tokens: 64,
            temperature: 0.7,
            api_key: None,
            system_message: preamble.to_string(),
            endpoint: "http://localhost".to_string(),
        }
    }

    fn session<'a>(
        completer: &'a ScriptedCompleter,
        reader: ScriptedReader,
    ) -> ChatSession<&'a ScriptedCompleter, ScriptedReader, Vec<u8>> {
        ChatSession::new(settings("S"), completer, reader, Vec::new())
    }

    fn output<C, R>(session: &ChatSession<C, R, Vec<u8>>) -> String {
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[test]
    fn test_new_session_holds_only_preamble() {
        let completer = ScriptedCompleter::new(&[]);
        let session = ChatSession::new(
            settings("Be terse."),
            &completer,
            ScriptedReader::lines(&[]),
            Vec::new(),
        );

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(
            session.transcript().messages()[0],
            Message::system("Be terse.")
        );
    }

    #[tokio::test]
    async fn test_chat_turn_prints_exactly_the_reply() {
        let completer = ScriptedCompleter::new(&[Some("hello")]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        let state = session.handle_line("hi").await.unwrap();

        assert_eq!(state, SessionState::Running);
        assert_eq!(output(&session), "hello\n");
        assert_eq!(
            session.transcript().messages(),
            &[
                Message::system("S"),
                Message::user("hi"),
                Message::assistant("hello"),
            ]
        );
    }

    #[tokio::test]
    async fn test_chat_text_is_sent_as_typed() {
        let completer = ScriptedCompleter::new(&[Some("ok")]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        session.handle_line("    indented code;  ").await.unwrap();

        let requests = completer.requests();
        assert_eq!(requests[0][1], Message::user("    indented code;  "));
    }

    #[tokio::test]
    async fn test_every_request_carries_full_transcript() {
        let completer = ScriptedCompleter::new(&[Some("one"), Some("two")]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        session.handle_line("first").await.unwrap();
        session.handle_line("second").await.unwrap();

        let requests = completer.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0],
            vec![Message::system("S"), Message::user("first")]
        );
        assert_eq!(
            requests[1],
            vec![
                Message::system("S"),
                Message::user("first"),
                Message::assistant("one"),
                Message::user("second"),
            ]
        );
    }

    #[tokio::test]
    async fn test_n_turns_grow_transcript_alternating() {
        let replies = [Some("a"), Some("b"), Some("c"), Some("d")];
        let completer = ScriptedCompleter::new(&replies);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        for i in 0..replies.len() {
            session.handle_line(&format!("turn {i}")).await.unwrap();
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1 + 2 * replies.len());
        for (i, message) in transcript.render().enumerate().skip(1) {
            let expected = if i % 2 == 1 { Role::User } else { Role::Assistant };
            assert_eq!(message.role(), expected);
        }
    }

    #[tokio::test]
    async fn test_clear_resets_to_preamble_idempotently() {
        let completer = ScriptedCompleter::new(&[Some("hello")]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        session.handle_line("hi").await.unwrap();
        session.handle_line("clear").await.unwrap();
        let once = session.transcript().clone();
        session.handle_line("c").await.unwrap();

        assert_eq!(session.transcript(), &once);
        assert_eq!(session.transcript(), &Transcript::new("S"));
        assert!(output(&session).contains("Chat history cleared."));
    }

    #[tokio::test]
    async fn test_history_and_help_are_read_only() {
        let completer = ScriptedCompleter::new(&[Some("hello")]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));
        session.handle_line("hi").await.unwrap();
        let before = session.transcript().clone();

        for line in ["history", "h", "help", "?"] {
            let state = session.handle_line(line).await.unwrap();
            assert_eq!(state, SessionState::Running);
        }

        assert_eq!(session.transcript(), &before);
        assert_eq!(completer.requests().len(), 1);
        let out = output(&session);
        assert!(out.contains("USER"));
        assert!(out.contains("Commands:"));
    }

    #[tokio::test]
    async fn test_empty_line_is_ignored() {
        let completer = ScriptedCompleter::new(&[]);
        let mut session = session(&completer, ScriptedReader::lines(&[]));

        let state = session.handle_line("   ").await.unwrap();

        assert_eq!(state, SessionState::Running);
        assert_eq!(session.transcript().len(), 1);
        assert!(completer.requests().is_empty());
        assert!(output(&session).is_empty());
    }

    #[tokio::test]
    async fn test_exit_command_ends_session_with_banner() {
        let completer = ScriptedCompleter::new(&[]);
        let reader = ScriptedReader::lines(&["help", "exit", "never read"]);
        let mut session = session(&completer, reader);

        let reason = session.run().await.unwrap();

        assert_eq!(reason, ExitReason::Command);
        assert!(output(&session).contains("Exiting..."));
        assert!(completer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_prints_blank_line_then_banner() {
        let completer = ScriptedCompleter::new(&[]);
        let reader = ScriptedReader::lines(&[]).then(ReadEvent::Interrupted);
        let mut session = session(&completer, reader);

        let reason = session.run().await.unwrap();

        assert_eq!(reason, ExitReason::Interrupted);
        let out = output(&session);
        assert!(out.starts_with('\n'));
        assert!(out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let completer = ScriptedCompleter::new(&[Some("hello")]);
        let mut session = session(&completer, ScriptedReader::lines(&["hi"]));

        let reason = session.run().await.unwrap();

        assert_eq!(reason, ExitReason::EndOfInput);
        let out = output(&session);
        assert!(out.starts_with("hello\n\n"));
        assert!(out.contains("Exiting..."));
    }

    #[tokio::test]
    async fn test_completion_failure_keeps_user_message_and_prints_banner() {
        let completer = ScriptedCompleter::new(&[None]);
        let reader = ScriptedReader::lines(&["hi", "never read"]);
        let mut session = session(&completer, reader);

        let err = session.run().await.unwrap_err();

        assert!(err.downcast_ref::<CompletionError>().is_some());
        assert_eq!(
            session.transcript().messages(),
            &[Message::system("S"), Message::user("hi")]
        );
        assert!(session.transcript().last_from(Role::Assistant).is_none());
        assert!(output(&session).contains("Exiting..."));
    }

    #[tokio::test]
    async fn test_interrupt_during_pending_reply() {
        let (completer, interrupt) = StalledCompleter::new();
        let mut session = ChatSession::new(
            settings("S"),
            completer,
            ScriptedReader::lines(&["hi", "never read"]),
            Vec::new(),
        )
        .with_interrupt(interrupt);

        let reason = session.run().await.unwrap();

        assert_eq!(reason, ExitReason::Interrupted);
        let out = output(&session);
        assert!(out.starts_with('\n'));
        assert!(out.contains("Exiting..."));
        assert_eq!(
            session.transcript().messages(),
            &[Message::system("S"), Message::user("hi")]
        );
    }

    #[tokio::test]
    async fn test_interrupt_while_waiting_for_input() {
        let completer = ScriptedCompleter::new(&[]);
        let mut session = ChatSession::new(settings("S"), &completer, StalledReader, Vec::new())
            .with_interrupt(async {});

        let reason = session.run().await.unwrap();

        assert_eq!(reason, ExitReason::Interrupted);
        assert!(output(&session).starts_with('\n'));
        assert_eq!(session.transcript().len(), 1);
    }
}
