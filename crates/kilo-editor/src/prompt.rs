//! Prompt — the one-line input shown on the message line.
//!
//! Used for "Save as" and for incremental search. The prompt only edits its
//! own input and classifies each key; what a submitted or cancelled prompt
//! means is up to the editor.
//!
//! | Key                          | Effect                              |
//! |------------------------------|-------------------------------------|
//! | printable char               | append                              |
//! | Backspace / Ctrl-H / Delete  | remove the last char                |
//! | Enter                        | submit, only when input is nonempty |
//! | Escape                       | cancel                              |
//! | anything else                | passed through                      |

use kilo_term::input::{KeyCode, KeyEvent, Modifiers};

/// What the prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveAs,
    Search,
}

/// Result of feeding one key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// The input text changed (or a deletion was attempted).
    Edited,
    /// Enter with nonempty input.
    Submitted(String),
    /// Escape.
    Cancelled,
    /// The key did not edit the input (arrows, Enter on empty input, ...).
    Other,
}

/// An open prompt and its input.
#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    #[must_use]
    pub const fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PromptKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The message-line text for the current input.
    #[must_use]
    pub fn message(&self) -> String {
        match self.kind {
            PromptKind::SaveAs => format!("Save as: {} (ESC to cancel)", self.input),
            PromptKind::Search => format!("Search: {} (Use ESC/Arrows/Enter)", self.input),
        }
    }

    /// Feed one key.
    pub fn handle(&mut self, key: &KeyEvent) -> PromptEvent {
        match key.code {
            KeyCode::Backspace | KeyCode::Delete => {
                self.input.pop();
                PromptEvent::Edited
            }
            KeyCode::Char('h') if key.modifiers == Modifiers::CTRL => {
                self.input.pop();
                PromptEvent::Edited
            }
            KeyCode::Escape => PromptEvent::Cancelled,
            KeyCode::Enter if !self.input.is_empty() => {
                PromptEvent::Submitted(self.input.clone())
            }
            KeyCode::Char(c)
                if !c.is_control()
                    && !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) =>
            {
                self.input.push(c);
                PromptEvent::Edited
            }
            _ => PromptEvent::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::plain(code)
    }

    fn typed(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle(&press(KeyCode::Char(c))), PromptEvent::Edited);
        }
    }

    #[test]
    fn typing_appends() {
        let mut p = Prompt::new(PromptKind::Search);
        typed(&mut p, "fn ma");
        assert_eq!(p.input(), "fn ma");
    }

    #[test]
    fn deletion_keys() {
        let mut p = Prompt::new(PromptKind::SaveAs);
        typed(&mut p, "abcd");
        p.handle(&press(KeyCode::Backspace));
        p.handle(&press(KeyCode::Delete));
        p.handle(&KeyEvent::ctrl('h'));
        assert_eq!(p.input(), "a");
    }

    #[test]
    fn backspace_on_empty_is_harmless() {
        let mut p = Prompt::new(PromptKind::SaveAs);
        assert_eq!(p.handle(&press(KeyCode::Backspace)), PromptEvent::Edited);
        assert_eq!(p.input(), "");
    }

    #[test]
    fn enter_requires_input() {
        let mut p = Prompt::new(PromptKind::SaveAs);
        assert_eq!(p.handle(&press(KeyCode::Enter)), PromptEvent::Other);
        typed(&mut p, "out.c");
        assert_eq!(
            p.handle(&press(KeyCode::Enter)),
            PromptEvent::Submitted("out.c".into())
        );
    }

    #[test]
    fn escape_cancels() {
        let mut p = Prompt::new(PromptKind::Search);
        assert_eq!(p.handle(&press(KeyCode::Escape)), PromptEvent::Cancelled);
    }

    #[test]
    fn control_keys_pass_through() {
        let mut p = Prompt::new(PromptKind::Search);
        assert_eq!(p.handle(&press(KeyCode::Up)), PromptEvent::Other);
        assert_eq!(p.handle(&press(KeyCode::Tab)), PromptEvent::Other);
        assert_eq!(p.handle(&KeyEvent::ctrl('s')), PromptEvent::Other);
        assert_eq!(p.input(), "");
    }

    #[test]
    fn messages() {
        let mut p = Prompt::new(PromptKind::Search);
        typed(&mut p, "x");
        assert_eq!(p.message(), "Search: x (Use ESC/Arrows/Enter)");
        let p = Prompt::new(PromptKind::SaveAs);
        assert_eq!(p.message(), "Save as:  (ESC to cancel)");
    }
}
