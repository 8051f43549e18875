//! Prompt composition and default system instructions.

use crate::llm::{ChatMessage, Role};

/// System instruction for visualization requests. Output is captured to
/// a file, never rendered, so the model must not call `plt.show()`.
fn visualization_system_text() -> String {
    "You are a data assistant that produces matplotlib plots.\n\
     First give a brief explanation of the plot you will draw.\n\
     Then emit exactly one fenced code block tagged `python` that draws it.\n\
     Use only `matplotlib.pyplot` as `plt` and, if needed, `numpy` as `np`; both are already imported.\n\
     Do not import anything and do not call plt.show(); the figure is saved for you."
        .to_string()
}

fn conversational_system_text() -> String {
    "You are a data assistant.\n\
     Provide concise, accurate answers.\n\
     If you need to store any data, assume it will be stored in the conversation."
        .to_string()
}

/// Build the message sequence for one completion call.
///
/// Appends the new user utterance to `history` (callers must pass a
/// history they own) and returns the full sequence with the system turn
/// first, then the history including the just-appended user turn.
pub fn compose(
    visual: bool,
    history: &mut Vec<ChatMessage>,
    user_input: &str,
) -> Vec<ChatMessage> {
    let system_text = if visual {
        visualization_system_text()
    } else {
        conversational_system_text()
    };

    history.push(ChatMessage::new(Role::User, user_input));

    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(ChatMessage::new(Role::System, system_text));
    messages.extend(history.iter().cloned());
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_turn_first_then_full_history() {
        let mut history = vec![
            ChatMessage::new(Role::User, "hello"),
            ChatMessage::new(Role::Assistant, "hi there"),
        ];
        let messages = compose(false, &mut history, "plot something later");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].content, "hello");
        assert_eq!(messages[3].role, Role::User);
        assert_eq!(messages[3].content, "plot something later");
    }

    #[test]
    fn appends_user_turn_to_caller_history() {
        let mut history = Vec::new();
        compose(true, &mut history, "bar chart of revenue");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
    }

    #[test]
    fn visual_intent_swaps_system_instruction() {
        let mut h1 = Vec::new();
        let mut h2 = Vec::new();
        let plot = compose(true, &mut h1, "x");
        let chat = compose(false, &mut h2, "x");
        assert!(plot[0].content.contains("plt.show()"));
        assert!(!chat[0].content.contains("plt.show()"));
    }
}
