//! Status overlay shown in place of the map: message text and ellipsis timing.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use crate::consts::STATUS_STEP_MS;
use crate::sync::ConnectionState;

/// Which status overlay a frame shows instead of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    NotConnected,
    Connecting,
    Reconnecting,
    /// Connected, but no in-game snapshot yet.
    WaitingForRaid,
}

impl StatusKind {
    /// Overlay for a connection state that is not `Connected`.
    #[must_use]
    pub fn for_state(state: ConnectionState) -> Option<Self> {
        match state {
            ConnectionState::Disconnected => Some(Self::NotConnected),
            ConnectionState::Connecting => Some(Self::Connecting),
            ConnectionState::Reconnecting => Some(Self::Reconnecting),
            ConnectionState::Connected => None,
        }
    }

    fn base(self) -> &'static str {
        match self {
            Self::NotConnected => "Not Connected!",
            Self::Connecting => "Connecting",
            Self::Reconnecting => "Re-Connecting",
            Self::WaitingForRaid => "Waiting for Raid Start",
        }
    }

    fn animated(self) -> bool {
        !matches!(self, Self::NotConnected)
    }

    /// Message with `dots` trailing periods (ignored for static messages).
    #[must_use]
    pub fn text(self, dots: u8) -> String {
        let base = self.base();
        if self.animated() { format!("{base}{}", ".".repeat(usize::from(dots))) } else { base.to_owned() }
    }

    /// The one-dot variant; its width centers every step so the text does not jitter.
    #[must_use]
    pub fn anchor_text(self) -> String {
        self.text(1)
    }
}

/// Ellipsis step counter cycling 1 → 2 → 3 → 1, one step per elapsed second
/// while a status is on screen.
#[derive(Debug, Clone, Copy)]
pub struct StatusAnimation {
    dots: u8,
    last_step_ms: Option<f64>,
}

impl Default for StatusAnimation {
    fn default() -> Self {
        Self { dots: 1, last_step_ms: None }
    }
}

impl StatusAnimation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current dot count.
    #[must_use]
    pub fn dots(&self) -> u8 {
        self.dots
    }

    /// Forget the last step time so the next status frame starts a fresh
    /// one-second interval. Called whenever a frame shows the map instead.
    pub fn pause(&mut self) {
        self.last_step_ms = None;
    }

    /// Advance the animation to `now_ms` and return the dot count to draw.
    pub fn tick(&mut self, now_ms: f64) -> u8 {
        match self.last_step_ms {
            None => self.last_step_ms = Some(now_ms),
            Some(last) if now_ms - last >= STATUS_STEP_MS => {
                self.dots = if self.dots >= 3 { 1 } else { self.dots + 1 };
                self.last_step_ms = Some(now_ms);
            }
            Some(_) => {}
        }
        self.dots
    }
}
