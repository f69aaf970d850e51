/// Text shown in the speech bubble above the cat. Owned by the chat side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialogue {
    pub message: Option<String>,
    pub thinking: bool,
}

impl Dialogue {
    /// What the bubble should say, if anything.
    pub fn bubble_text(&self) -> Option<&str> {
        if self.thinking {
            return Some("...");
        }
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }

    /// Mark a chat request as in flight.
    pub fn start_thinking(&mut self) {
        self.thinking = true;
    }

    /// Apply a chat reply. Failures are shown in the cat's own voice.
    pub fn show_reply(&mut self, reply: Result<String, String>) {
        self.thinking = false;
        self.message = Some(match reply {
            Ok(text) if text.trim().is_empty() => "...".to_string(),
            Ok(text) => text,
            Err(reason) => format!("Meow... ({reason})"),
        });
    }
}
