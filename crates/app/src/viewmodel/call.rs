//! Video call overlay view model
//!
//! Presentation state only. No media is captured or sent.

use parichat_core::Identity;

const FALLBACK_NAME: &str = "Partner";

#[derive(Debug, Clone, PartialEq)]
pub struct CallViewModel {
    pub visible: bool,
    pub muted: bool,
    pub camera_on: bool,
    pub minimized: bool,
    /// Drag offset of the minimized overlay
    pub offset: (f32, f32),
}

impl Default for CallViewModel {
    fn default() -> Self {
        Self {
            visible: false,
            muted: false,
            camera_on: true,
            minimized: false,
            offset: (0.0, 0.0),
        }
    }
}

impl CallViewModel {
    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    pub fn toggle_camera(&mut self) {
        self.camera_on = !self.camera_on;
    }

    /// Expanding back to full screen resets the overlay position
    pub fn toggle_minimize(&mut self) {
        if self.minimized {
            self.offset = (0.0, 0.0);
        }
        self.minimized = !self.minimized;
    }

    /// Move the minimized overlay; ignored while full screen
    pub fn drag_by(&mut self, dx: f32, dy: f32) {
        if self.minimized {
            self.offset.0 += dx;
            self.offset.1 += dy;
        }
    }

    pub fn partner_video_label(partner: Option<&Identity>) -> String {
        format!("{}'s Video", partner_name(partner))
    }

    pub fn self_video_label() -> &'static str {
        "Your Video"
    }

    pub fn minimized_label(partner: Option<&Identity>) -> String {
        partner_name(partner).to_string()
    }
}

fn partner_name(partner: Option<&Identity>) -> &str {
    partner.map(|p| p.username.as_str()).unwrap_or(FALLBACK_NAME)
}
