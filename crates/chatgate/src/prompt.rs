//! System prompt construction and conversation assembly.

use crate::llm::{ChatError, Message, Role};

/// Instruction used when the caller supplies no soul.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Separator placed between the soul and the identity.
pub const IDENTITY_SEPARATOR: &str = "\n\n---\n\n";

/// Combine the soul and identity texts into one system instruction.
///
/// The soul already carries the full persona; identity is appended after a
/// visible separator. Without a soul the generic assistant persona is used.
pub fn build_system_prompt(soul: Option<&str>, identity: Option<&str>) -> String {
    let Some(soul) = soul.filter(|s| !s.is_empty()) else {
        return DEFAULT_SYSTEM_PROMPT.to_string();
    };

    let mut prompt = soul.to_string();
    if let Some(identity) = identity.filter(|s| !s.is_empty()) {
        prompt.push_str(IDENTITY_SEPARATOR);
        prompt.push_str(identity);
    }
    prompt
}

/// Build the canonical conversation: system prompt, history, then the new user turn.
///
/// System entries in `history` are dropped so callers cannot override or
/// duplicate the instruction.
pub fn assemble(
    system_prompt: &str,
    history: &[Message],
    user_message: &str,
) -> Result<Vec<Message>, ChatError> {
    if user_message.is_empty() {
        return Err(ChatError::Validation("Message is required".to_string()));
    }

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(history.iter().filter(|m| m.role != Role::System).cloned());
    messages.push(Message::user(user_message));
    Ok(messages)
}
