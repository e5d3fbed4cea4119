//! Prompt specifications for schema-constrained calls.

use serde_json::Value;
use vasari_core::Message;

/// Natural-language instructions plus structured context to interpolate.
///
/// Context documents (brief, rejected format, feedback memory, trend items)
/// are rendered as labeled pretty-printed JSON blocks after the
/// instructions; the schema contract is appended last by the generator.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct PromptSpec {
    /// Optional system message
    system: Option<String>,
    /// Task instructions
    instructions: String,
    /// Labeled context documents, in render order
    context: Vec<(String, Value)>,
}

impl PromptSpec {
    /// Creates a prompt spec from task instructions.
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            system: None,
            instructions: instructions.into(),
            context: Vec::new(),
        }
    }

    /// Sets the system message.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Appends a labeled context document.
    pub fn with_context(mut self, label: impl Into<String>, value: Value) -> Self {
        self.context.push((label.into(), value));
        self
    }

    /// Renders the conversation, appending the schema contract block.
    pub fn render(&self, contract: &str) -> Vec<Message> {
        let mut user = self.instructions.clone();
        for (label, value) in &self.context {
            let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            user.push_str(&format!("\n\n{} (JSON):\n{}", label, body));
        }
        user.push_str("\n\n");
        user.push_str(contract);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(user));
        messages
    }
}
