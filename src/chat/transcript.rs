use std::slice;

use super::message::{Message, Role};

/// The ordered conversation history replayed to the model on every turn.
///
/// The first message is always the `system` preamble. It is only ever
/// replaced as a whole by [`Transcript::reset`]; everything after it grows
/// by appending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates a transcript holding only the given preamble.
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(preamble)],
        }
    }

    /// Discards the conversation and starts over from `preamble`.
    pub fn reset(&mut self, preamble: impl Into<String>) {
        self.messages.clear();
        self.messages.push(Message::system(preamble));
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Iterates over the messages in insertion order.
    ///
    /// The iterator is cheap to clone, so callers can walk it more than once.
    pub fn render(&self) -> slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the most recent message if it was written by `role`.
    pub fn last_from(&self, role: Role) -> Option<&Message> {
        self.messages.last().filter(|m| m.role() == role)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.render()
    }
}
