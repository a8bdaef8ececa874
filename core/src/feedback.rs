//! Feedback events (sound / vibration hooks) raised while composing.
//!
//! The engine reports *what happened*; whether that becomes a click, a buzz
//! or nothing is up to the sink. Sinks are invoked synchronously on the
//! thread that called into the context and are not required to be `Send`.
//! An adapter whose host delivers events on another thread must marshal them
//! itself.

use serde::{Deserialize, Serialize};

/// Kind of state-changing action that just happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackEvent {
    KeyPress,
    KeyDelete,
    KeyEnter,
    KeySpace,
    Candidate,
    ModeChange,
    Error,
}

/// Receiver for feedback events.
pub trait FeedbackSink {
    fn on_feedback(&mut self, event: FeedbackEvent);
}

impl<F: FnMut(FeedbackEvent)> FeedbackSink for F {
    fn on_feedback(&mut self, event: FeedbackEvent) {
        self(event)
    }
}
