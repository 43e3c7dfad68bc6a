use std::sync::{Arc, Mutex, MutexGuard};

use eclipse_shared::TeamId;

use crate::error::ClientError;
use crate::ports::outbound::{ClientUi, FrameSink};

/// One observed UI effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCall {
    Show(String, bool),
    Enabled(String, bool),
    Options(String, Vec<String>),
    Highlight(Vec<u32>),
    TabLabel(TeamId, String),
    Blanket(bool),
    SessionEnded,
    Alert(String),
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `ClientUi` that records every call. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingUi {
    calls: Arc<Mutex<Vec<UiCall>>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<UiCall> {
        lock(&self.calls).clone()
    }

    pub fn take(&self) -> Vec<UiCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Last visibility the element was given, if it was ever touched.
    pub fn visible(&self, id: &str) -> Option<bool> {
        lock(&self.calls).iter().rev().find_map(|c| match c {
            UiCall::Show(e, show) if e == id => Some(*show),
            _ => None,
        })
    }

    pub fn blanket(&self) -> Option<bool> {
        lock(&self.calls).iter().rev().find_map(|c| match c {
            UiCall::Blanket(show) => Some(*show),
            _ => None,
        })
    }

    fn push(&self, call: UiCall) {
        lock(&self.calls).push(call);
    }
}

impl ClientUi for RecordingUi {
    fn show_element(&self, id: &str, show: bool) {
        self.push(UiCall::Show(id.to_string(), show));
    }

    fn set_enabled(&self, id: &str, enabled: bool) {
        self.push(UiCall::Enabled(id.to_string(), enabled));
    }

    fn set_options(&self, id: &str, options: &[String]) {
        self.push(UiCall::Options(id.to_string(), options.to_vec()));
    }

    fn highlight_positions(&self, positions: &[u32]) {
        self.push(UiCall::Highlight(positions.to_vec()));
    }

    fn set_tab_label(&self, team: &TeamId, label: &str) {
        self.push(UiCall::TabLabel(team.clone(), label.to_string()));
    }

    fn show_blanket(&self, show: bool) {
        self.push(UiCall::Blanket(show));
    }

    fn show_session_ended(&self) {
        self.push(UiCall::SessionEnded);
    }

    fn alert(&self, message: &str) {
        self.push(UiCall::Alert(message.to_string()));
    }
}

/// `FrameSink` that keeps every frame written. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    frames: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        lock(&self.frames).clone()
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.frames))
    }
}

impl FrameSink for RecordingSink {
    fn send_text(&mut self, frame: String) -> Result<(), ClientError> {
        lock(&self.frames).push(frame);
        Ok(())
    }
}
