//! Transition events and their dispatch to callbacks.
//!
//! Every session transition collects the events it raises into a
//! [`Transition`], which keeps at most one event per callback. The session
//! then hands the batch to [`dispatch`], which calls the matching callbacks
//! synchronously and in order. Two code paths reaching the same transition
//! in one update therefore still fire each callback once.

use crate::settings::Callbacks;
use serde::Serialize;
use std::fmt;
use std::mem::discriminant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "camelCase")]
pub enum LightboxEvent {
    /// The displayed slide changed to this index.
    SlideChange(usize),
    LightboxOpened,
    LightboxClosed,
    /// Number of slides, reported when the lightbox opens from closed.
    CountSlides(usize),
}

impl LightboxEvent {
    /// Name of the callback this event fires.
    pub fn callback_name(&self) -> &'static str {
        match self {
            LightboxEvent::SlideChange(_) => "onSlideChange",
            LightboxEvent::LightboxOpened => "onLightboxOpened",
            LightboxEvent::LightboxClosed => "onLightboxClosed",
            LightboxEvent::CountSlides(_) => "onCountSlides",
        }
    }
}

impl fmt::Display for LightboxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightboxEvent::SlideChange(n) | LightboxEvent::CountSlides(n) => {
                write!(f, "{}({})", self.callback_name(), n)
            }
            _ => write!(f, "{}()", self.callback_name()),
        }
    }
}

/// Events raised by one transition, at most one per callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    events: Vec<LightboxEvent>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    /// Record `event`. A later event for the same callback replaces the
    /// earlier one in place.
    pub fn raise(&mut self, event: LightboxEvent) {
        match self
            .events
            .iter_mut()
            .find(|e| discriminant(&**e) == discriminant(&event))
        {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[LightboxEvent] {
        &self.events
    }
}

/// Fire the callbacks for every event of `transition`, in order.
pub fn dispatch(callbacks: &Callbacks, transition: &Transition) {
    for event in transition.events() {
        tracing::debug!(%event, "dispatch");
        match *event {
            LightboxEvent::SlideChange(index) => {
                if let Some(cb) = &callbacks.on_slide_change {
                    cb(index);
                }
            }
            LightboxEvent::LightboxOpened => {
                if let Some(cb) = &callbacks.on_lightbox_opened {
                    cb();
                }
            }
            LightboxEvent::LightboxClosed => {
                if let Some(cb) = &callbacks.on_lightbox_closed {
                    cb();
                }
            }
            LightboxEvent::CountSlides(count) => {
                if let Some(cb) = &callbacks.on_count_slides {
                    cb(count);
                }
            }
        }
    }
}
