//! Player-facing narration and choices.

use std::collections::VecDeque;

/// The conversation surface a facility talks through.
pub trait Dialog {
    fn message(&mut self, text: &str);

    /// Offer `options` and return the chosen index, or `None` when the player backs out.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<usize>;

    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Replays queued answers and records everything it was shown.
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    choices: VecDeque<Option<usize>>,
    confirms: VecDeque<bool>,
    pub messages: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choices(mut self, choices: impl IntoIterator<Item = Option<usize>>) -> Self {
        self.choices.extend(choices);
        self
    }

    pub fn with_confirms(mut self, confirms: impl IntoIterator<Item = bool>) -> Self {
        self.confirms.extend(confirms);
        self
    }

    pub fn saw(&self, fragment: &str) -> bool {
        self.messages.iter().any(|m| m.contains(fragment))
    }
}

impl Dialog for ScriptedDialog {
    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    /// Falls back to backing out once the queue is empty.
    fn choose(&mut self, prompt: &str, options: &[String]) -> Option<usize> {
        self.prompts.push(prompt.to_string());
        self.choices
            .pop_front()
            .flatten()
            .filter(|&i| i < options.len())
    }

    /// Falls back to "no" once the queue is empty.
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }
}
