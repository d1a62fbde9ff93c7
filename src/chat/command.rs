// Interactive commands: (command, label, description). Order is the help order.
pub const COMMANDS: &[(Command, &str, &str)] = &[
    (Command::Help, "help (?):", "Print this message"),
    (Command::Clear, "clear (c):", "Clear chat history"),
    (Command::Exit, "exit (^D, ^C):", "Exit the program"),
    (Command::History, "history (h):", "Print chat history"),
];

/// Control commands understood by the chat loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    History,
    Exit,
}

/// A classified line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// A control command.
    Command(Command),
    /// Free text sent to the model as a user turn.
    Chat(String),
    /// Blank or whitespace-only input; ignored.
    Empty,
}

/// Classifies a line. Chat text is kept exactly as typed.
pub fn parse_input(input: &str) -> Input {
    match input.trim() {
        "" => Input::Empty,
        "help" | "?" => Input::Command(Command::Help),
        "clear" | "c" => Input::Command(Command::Clear),
        "history" | "h" => Input::Command(Command::History),
        "exit" => Input::Command(Command::Exit),
        _ => Input::Chat(input.to_string()),
    }
}
