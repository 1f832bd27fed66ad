//! Motorsport chat assistant.
//!
//! Two responders are available: the offline [`FaqBot`] and the hosted
//! [`CompletionClient`]. A [`ChatSession`] keeps the transcript and works
//! with either.

pub mod completion;
pub mod faq;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub use completion::{CompletionClient, FAILURE_REPLY, MISSING_KEY_REPLY};
pub use faq::{FaqBot, FaqRule, DEFAULT_ANSWER};

/// First bot message of every session.
pub const GREETING: &str = "Hi there! I'm your motorsport expert assistant. Ask me anything \
     about racing, championships, drivers, or how to get started in motorsports!";

/// Something that answers a chat question. Replies are always displayable.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce a reply to `question`.
    async fn respond(&self, question: &str) -> String;
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person asking.
    User,
    /// The assistant.
    Bot,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Message body.
    pub text: String,
    /// Who wrote it.
    pub sender: Sender,
    /// When it was added.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn now(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// A conversation with a responder.
#[derive(Debug)]
pub struct ChatSession<R> {
    responder: R,
    messages: Vec<Message>,
}

impl<R: Responder> ChatSession<R> {
    /// Start a session seeded with the greeting.
    pub fn new(responder: R) -> Self {
        Self {
            responder,
            messages: vec![Message::now(GREETING, Sender::Bot)],
        }
    }

    /// Send a message and return the bot's reply.
    ///
    /// Blank input is ignored and returns `None` without touching the
    /// transcript.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(Message::now(input, Sender::User));
        let reply = self.responder.respond(input).await;
        self.messages.push(Message::now(reply, Sender::Bot));
        self.messages.last()
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Responder for Echo {
        async fn respond(&self, question: &str) -> String {
            format!("echo: {question}")
        }
    }

    #[test]
    fn test_session_starts_with_greeting() {
        let session = ChatSession::new(Echo);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, GREETING);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let mut session = ChatSession::new(Echo);
        let reply = session.send("hello").await.unwrap();
        assert_eq!(reply.text, "echo: hello");

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].text, "hello");
        assert_eq!(messages[2].sender, Sender::Bot);
        assert!(messages[1].timestamp <= messages[2].timestamp);
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let mut session = ChatSession::new(Echo);
        assert!(session.send("   \t").await.is_none());
        assert!(session.send("").await.is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_session_with_faq_bot() {
        let mut session = ChatSession::new(FaqBot::new());
        let reply = session.send("Tell me about WEC").await.unwrap();
        assert!(reply.text.contains("24 Hours of Le Mans"));
    }
}
