//! Message composer view model

use parichat_core::MessageDraft;

/// Text input plus an optional image attachment
#[derive(Debug, Clone)]
pub struct ComposeViewModel {
    text: String,
    image_uri: Option<String>,
    max_len: usize,
}

impl ComposeViewModel {
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            image_uri: None,
            max_len,
        }
    }

    /// Input beyond `max_len` characters is cut off, like a capped text field
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(self.max_len).collect();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attach_image(&mut self, uri: impl Into<String>) {
        self.image_uri = Some(uri.into());
    }

    pub fn remove_image(&mut self) {
        self.image_uri = None;
    }

    pub fn image_uri(&self) -> Option<&str> {
        self.image_uri.as_deref()
    }

    /// Send is enabled for non-blank text or an attached image
    pub fn can_send(&self) -> bool {
        !self.text.trim().is_empty() || self.image_uri.is_some()
    }

    pub fn draft(&self) -> MessageDraft {
        MessageDraft::new(self.text.clone(), self.image_uri.clone())
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.image_uri = None;
    }
}
