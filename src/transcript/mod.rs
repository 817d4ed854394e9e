use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered, append-only chat log for one builder session. Committed messages
/// are never reordered or edited; the in-progress streaming text lives in a
/// separate transient slot that is discarded once the terminal assistant
/// message is appended.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    streaming: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, body: impl Into<String>) {
        self.push(Role::User, body.into());
    }

    pub fn push_assistant(&mut self, body: impl Into<String>) {
        self.push(Role::Assistant, body.into());
    }

    fn push(&mut self, role: Role, body: String) {
        self.messages.push(Message {
            id: Uuid::new_v4(),
            role,
            body,
            created_at: Utc::now(),
        });
    }

    pub fn set_streaming(&mut self, text: &str) {
        self.streaming = Some(text.to_string());
    }

    pub fn take_streaming(&mut self) -> Option<String> {
        self.streaming.take()
    }

    pub fn streaming(&self) -> Option<&str> {
        self.streaming.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_insertion_order() {
        let mut t = Transcript::new();
        t.push_user("build it");
        t.push_assistant("done");
        t.push_user("again");

        let bodies: Vec<&str> = t.messages().iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, ["build it", "done", "again"]);
        assert_eq!(t.messages()[0].role, Role::User);
        assert_eq!(t.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn streaming_entry_is_transient() {
        let mut t = Transcript::new();
        t.set_streaming("<!DOCT");
        t.set_streaming("<!DOCTYPE html>");
        assert_eq!(t.streaming(), Some("<!DOCTYPE html>"));

        t.take_streaming();
        t.push_assistant("Your website is ready.");
        assert!(t.streaming().is_none());
        assert_eq!(t.messages().len(), 1);
    }
}
