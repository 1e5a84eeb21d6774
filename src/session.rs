//! The lightbox session state machine.
//!
//! [`Session`] owns everything a renderer needs to draw the lightbox: whether
//! it is open, the catalogue, the selected entry, and the merged settings.
//! It is the only writer of that state. Scanning and catalogue building
//! produce new values and hand them in through [`Session::replace_catalogue`].
//!
//! ## States
//!
//! ```text
//!             open_with_element
//!   Closed ───────────────────────▶ Open(index) ──┐ navigate / goto_index
//!     ▲                                  │  ▲─────┘ autoplay tick
//!     └──────── close ───────────────────┘
//!     └──────── replace_catalogue (selected entry vanished)
//! ```
//!
//! The current index is never stored: it is the position of the selected
//! entry's id in the catalogue. While open, the selected entry is always in
//! the catalogue. Closing clears the flag and the selection together.
//!
//! ## Callbacks
//!
//! Every action returns the [`Transition`] it caused after dispatching it.
//! An action that changes nothing returns an empty transition and fires
//! nothing; closing twice fires `onLightboxClosed` once.
//!
//! ## Timers
//!
//! Autoplay and control hiding run on virtual time. The host reports elapsed
//! time with [`Session::advance`] (from a real timer scheduled with
//! [`Session::autoplay_remaining`], an animation frame loop, or a test).
//! Manual navigation restarts the autoplay period, closing cancels it, and
//! time that passes while closed does nothing. An interval of `0` never arms.

use crate::catalogue::{Catalogue, CatalogueEntry};
use crate::dom::Dimensions;
use crate::events::{LightboxEvent, Transition, dispatch};
use crate::settings::Settings;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Where the session is, as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Phase {
    Closed,
    Open { index: usize },
}

/// State exposed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_opened: bool,
    pub catalogue: Catalogue,
    pub selected: Option<CatalogueEntry>,
    pub settings: Settings,
}

/// A restartable one-shot countdown. No period means never armed.
#[derive(Debug, Clone, Copy, Default)]
struct Countdown {
    period: Option<Duration>,
    remaining: Option<Duration>,
}

impl Countdown {
    fn new(period: Option<Duration>) -> Self {
        Self {
            period: period.filter(|p| !p.is_zero()),
            remaining: None,
        }
    }

    fn restart(&mut self) {
        self.remaining = self.period;
    }

    fn cancel(&mut self) {
        self.remaining = None;
    }

    fn set_period(&mut self, period: Option<Duration>) {
        let armed = self.remaining.is_some();
        *self = Self::new(period);
        if armed {
            self.restart();
        }
    }

    fn elapse(&mut self, elapsed: Duration) {
        self.remaining = self.remaining.map(|r| r.saturating_sub(elapsed));
    }

    fn expired(&self) -> bool {
        self.remaining.is_some_and(|r| r.is_zero())
    }
}

#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    autoplay: Countdown,
    controls_idle: Countdown,
    controls_visible: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let autoplay = Countdown::new(settings.options.autoplay_interval());
        let controls_idle = Countdown::new(settings.options.controls_idle());
        Self {
            state: SessionState {
                settings,
                ..SessionState::default()
            },
            autoplay,
            controls_idle,
            controls_visible: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_opened(&self) -> bool {
        self.state.is_opened
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.state.catalogue
    }

    pub fn selected(&self) -> Option<&CatalogueEntry> {
        self.state.selected.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn current_index(&self) -> Option<usize> {
        if !self.state.is_opened {
            return None;
        }
        let selected = self.state.selected.as_ref()?;
        self.state.catalogue.position(&selected.id)
    }

    pub fn phase(&self) -> Phase {
        match self.current_index() {
            Some(index) => Phase::Open { index },
            None => Phase::Closed,
        }
    }

    /// Whether the renderer should draw the navigation controls.
    pub fn controls_visible(&self) -> bool {
        self.state.is_opened && self.controls_visible
    }

    /// Time until the next autoplay step, if one is scheduled.
    pub fn autoplay_remaining(&self) -> Option<Duration> {
        if self.state.is_opened {
            self.autoplay.remaining
        } else {
            None
        }
    }

    fn finish(&self, transition: Transition) -> Transition {
        dispatch(&self.state.settings.callbacks, &transition);
        transition
    }

    fn show_controls(&mut self) {
        self.controls_visible = true;
        self.controls_idle.restart();
    }

    /// Open the lightbox on `entry`, or switch to it if already open.
    ///
    /// The entry is looked up by id; an entry that is not in the catalogue,
    /// or that is already displayed, leaves the session unchanged.
    pub fn open_with_element(&mut self, entry: &CatalogueEntry) -> Transition {
        let Some(entry) = self.state.catalogue.find(&entry.id).cloned() else {
            tracing::warn!(id = %entry.id, "open requested for an entry not in the catalogue");
            return Transition::none();
        };
        if self.state.is_opened
            && self.state.selected.as_ref().is_some_and(|s| s.id == entry.id)
        {
            return Transition::none();
        }

        let was_closed = !self.state.is_opened;
        tracing::info!(id = %entry.id, "lightbox opened");
        self.state.selected = Some(entry);
        self.state.is_opened = true;
        self.autoplay.restart();
        self.show_controls();

        let mut transition = Transition::none();
        transition.raise(LightboxEvent::LightboxOpened);
        if was_closed {
            transition.raise(LightboxEvent::CountSlides(self.state.catalogue.len()));
        }
        self.finish(transition)
    }

    /// Open on the entry with `id`.
    pub fn open_by_id(&mut self, id: &str) -> Transition {
        match self.state.catalogue.find(id).cloned() {
            Some(entry) => self.open_with_element(&entry),
            None => {
                tracing::warn!(id, "open requested for an unknown id");
                Transition::none()
            }
        }
    }

    fn select_index(&mut self, index: usize) -> Transition {
        let mut transition = Transition::none();
        if self.current_index() == Some(index) {
            return transition;
        }
        if let Some(entry) = self.state.catalogue.get(index) {
            self.state.selected = Some(entry.clone());
            transition.raise(LightboxEvent::SlideChange(index));
        }
        transition
    }

    fn step(&mut self, direction: Direction) -> Transition {
        let (Some(current), len) = (self.current_index(), self.state.catalogue.len()) else {
            return Transition::none();
        };
        let target = match direction {
            Direction::Next => (current + 1) % len,
            Direction::Prev => (current + len - 1) % len,
        };
        self.select_index(target)
    }

    /// Move one slide, wrapping at both ends. No-op while closed.
    pub fn navigate(&mut self, direction: Direction) -> Transition {
        if !self.state.is_opened {
            tracing::debug!(?direction, "navigate ignored while closed");
            return Transition::none();
        }
        self.autoplay.restart();
        self.show_controls();
        let transition = self.step(direction);
        self.finish(transition)
    }

    /// Jump to `index`, clamped into the catalogue. No-op while closed.
    pub fn goto_index(&mut self, index: isize) -> Transition {
        if !self.state.is_opened || self.state.catalogue.is_empty() {
            tracing::debug!(index, "goto ignored");
            return Transition::none();
        }
        let last = self.state.catalogue.len() - 1;
        let target = usize::try_from(index).unwrap_or(0).min(last);
        self.autoplay.restart();
        self.show_controls();
        let transition = self.select_index(target);
        self.finish(transition)
    }

    fn close_inner(&mut self) -> Transition {
        let mut transition = Transition::none();
        if !self.state.is_opened {
            return transition;
        }
        tracing::info!("lightbox closed");
        self.state.is_opened = false;
        self.state.selected = None;
        self.autoplay.cancel();
        self.controls_idle.cancel();
        self.controls_visible = false;
        transition.raise(LightboxEvent::LightboxClosed);
        transition
    }

    /// Close the lightbox. Closing a closed lightbox does nothing.
    pub fn close(&mut self) -> Transition {
        let transition = self.close_inner();
        self.finish(transition)
    }

    /// Swap in a freshly built catalogue.
    ///
    /// If the displayed entry is not in the new catalogue the lightbox closes;
    /// otherwise the selection is refreshed from the new value.
    pub fn replace_catalogue(&mut self, catalogue: Catalogue) -> Transition {
        self.state.catalogue = catalogue;
        let transition = match self.state.selected.as_ref().map(|s| s.id.clone()) {
            Some(id) if self.state.is_opened => match self.state.catalogue.find(&id) {
                Some(entry) => {
                    self.state.selected = Some(entry.clone());
                    Transition::none()
                }
                None => {
                    tracing::info!(id = %id, "displayed entry left the catalogue");
                    self.close_inner()
                }
            },
            _ => Transition::none(),
        };
        self.finish(transition)
    }

    /// Swap in new merged settings. Timers pick up the new intervals.
    pub fn replace_settings(&mut self, settings: Settings) -> Transition {
        self.autoplay
            .set_period(settings.options.autoplay_interval());
        self.controls_idle.set_period(settings.options.controls_idle());
        if self.state.is_opened && self.autoplay.remaining.is_none() {
            self.autoplay.restart();
        }
        self.state.settings = settings;
        Transition::none()
    }

    /// Record intrinsic dimensions the renderer measured for `id`.
    pub fn backfill_dimensions(&mut self, id: &str, dimensions: Dimensions) -> bool {
        let Some(catalogue) = self.state.catalogue.with_dimensions(id, dimensions) else {
            return false;
        };
        self.state.catalogue = catalogue;
        if let Some(selected) = self.state.selected.as_mut().filter(|s| s.id == id) {
            selected.dimensions = Some(dimensions);
        }
        true
    }

    /// Pointer or key activity over the lightbox: show the controls again.
    pub fn pointer_activity(&mut self) {
        if self.state.is_opened {
            self.show_controls();
        }
    }

    /// Let `elapsed` pass. Returns the transitions autoplay caused, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Transition> {
        let mut fired = Vec::new();
        let mut left = elapsed;

        while self.state.is_opened {
            let controls_due = if self.controls_visible {
                self.controls_idle.remaining
            } else {
                None
            };
            let due = match (self.autoplay.remaining, controls_due) {
                (Some(a), Some(c)) => a.min(c),
                (Some(a), None) => a,
                (None, Some(c)) => c,
                (None, None) => break,
            };
            if controls_due.is_none() {
                left = self.skip_autoplay_laps(left);
            }
            if due > left {
                break;
            }
            left -= due;
            self.autoplay.elapse(due);
            self.controls_idle.elapse(due);

            if self.controls_visible && self.controls_idle.expired() {
                self.controls_visible = false;
                self.controls_idle.cancel();
            }
            if self.autoplay.expired() {
                self.autoplay.restart();
                let transition = self.step(Direction::Next);
                if !transition.is_empty() {
                    fired.push(self.finish(transition));
                }
            }
        }

        self.autoplay.elapse(left);
        self.controls_idle.elapse(left);
        fired
    }

    /// Drop whole autoplay laps from `left`. A lap steps through every entry
    /// once and lands back on the slide it started from, so only the ticks
    /// past the last full lap change anything. Skipped ticks fire nothing.
    fn skip_autoplay_laps(&self, left: Duration) -> Duration {
        let (Some(first), Some(period)) = (self.autoplay.remaining, self.autoplay.period) else {
            return left;
        };
        if first > left {
            return left;
        }
        let period_ns = period.as_nanos();
        let ticks = 1 + (left - first).as_nanos() / period_ns;
        let len = self.state.catalogue.len().max(1) as u128;
        let laps = ticks / len;
        if laps == 0 {
            return left;
        }
        tracing::debug!(laps = %laps, "autoplay skipped whole laps");
        left - duration_from_nanos(laps * len * period_ns)
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    Duration::new(
        (nanos / NANOS_PER_SEC) as u64,
        (nanos % NANOS_PER_SEC) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn open_session(n: usize, recorder: &Recorder) -> Session {
        let mut session = Session::new(settings_with(recorder, "autoplaySpeed = 0"));
        session.replace_catalogue(catalogue_of(n));
        session
    }

    #[test]
    fn starts_closed() {
        let session = Session::default();
        assert_eq!(session.phase(), Phase::Closed);
        assert!(!session.is_opened());
        assert!(session.selected().is_none());
    }

    #[test]
    fn open_from_closed_reports_count() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        let t = session.open_by_id("element1");

        assert_eq!(session.phase(), Phase::Open { index: 1 });
        assert_eq!(
            t.events(),
            &[LightboxEvent::LightboxOpened, LightboxEvent::CountSlides(4)]
        );
        assert_eq!(recorder.events(), t.events().to_vec());
    }

    #[test]
    fn open_while_open_switches_without_count() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element1");
        recorder.clear();

        let t = session.open_by_id("element3");
        assert_eq!(session.current_index(), Some(3));
        assert_eq!(t.events(), &[LightboxEvent::LightboxOpened]);
    }

    #[test]
    fn open_same_entry_twice_is_noop() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element2");
        recorder.clear();
        assert!(session.open_by_id("element2").is_empty());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn open_unknown_entry_is_noop() {
        let recorder = Recorder::default();
        let mut session = open_session(2, &recorder);
        let stranger = catalogue_of(5).get(4).unwrap().clone();
        assert!(session.open_with_element(&stranger).is_empty());
        assert_eq!(session.phase(), Phase::Closed);
    }

    #[test]
    fn next_wraps_to_first() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        session.open_by_id("element2");
        let t = session.navigate(Direction::Next);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(t.events(), &[LightboxEvent::SlideChange(0)]);
    }

    #[test]
    fn prev_wraps_to_last() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        session.open_by_id("element0");
        session.navigate(Direction::Prev);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn next_n_times_cycles_back() {
        for n in 1..6 {
            for start in 0..n {
                let recorder = Recorder::default();
                let mut session = open_session(n, &recorder);
                session.open_by_id(&format!("element{start}"));
                for _ in 0..n {
                    session.navigate(Direction::Next);
                }
                assert_eq!(session.current_index(), Some(start), "n={n} start={start}");
            }
        }
    }

    #[test]
    fn prev_inverts_next() {
        for n in 1..6 {
            for start in 0..n {
                let recorder = Recorder::default();
                let mut session = open_session(n, &recorder);
                session.open_by_id(&format!("element{start}"));
                session.navigate(Direction::Next);
                session.navigate(Direction::Prev);
                assert_eq!(session.current_index(), Some(start));
                session.navigate(Direction::Prev);
                session.navigate(Direction::Next);
                assert_eq!(session.current_index(), Some(start));
            }
        }
    }

    #[test]
    fn single_entry_navigation_fires_nothing() {
        let recorder = Recorder::default();
        let mut session = open_session(1, &recorder);
        session.open_by_id("element0");
        assert!(session.navigate(Direction::Next).is_empty());
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn navigate_while_closed_is_noop() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        assert!(session.navigate(Direction::Next).is_empty());
        assert!(session.goto_index(1).is_empty());
        assert_eq!(session.phase(), Phase::Closed);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn goto_clamps_both_ends() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element1");

        let t = session.goto_index(99);
        assert_eq!(session.current_index(), Some(3));
        assert_eq!(t.events(), &[LightboxEvent::SlideChange(3)]);

        let t = session.goto_index(-7);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(t.events(), &[LightboxEvent::SlideChange(0)]);
    }

    #[test]
    fn goto_current_index_fires_nothing() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element2");
        assert!(session.goto_index(2).is_empty());
    }

    #[test]
    fn close_twice_fires_once() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        session.open_by_id("element0");
        recorder.clear();

        let first = session.close();
        let second = session.close();
        assert_eq!(first.events(), &[LightboxEvent::LightboxClosed]);
        assert!(second.is_empty());
        assert_eq!(recorder.events(), vec![LightboxEvent::LightboxClosed]);
        assert!(!session.is_opened());
        assert!(session.selected().is_none());
    }

    #[test]
    fn catalogue_replacement_without_selected_forces_close() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element1");
        recorder.clear();

        let replacement = Catalogue::new(
            catalogue_of(4)
                .iter()
                .filter(|e| e.id == "element0" || e.id == "element3")
                .cloned()
                .collect(),
        );
        let t = session.replace_catalogue(replacement);

        assert_eq!(session.phase(), Phase::Closed);
        assert!(session.selected().is_none());
        assert_eq!(t.events(), &[LightboxEvent::LightboxClosed]);
        assert_eq!(recorder.events(), vec![LightboxEvent::LightboxClosed]);
        // Closing again does not fire a second time
        assert!(session.close().is_empty());
    }

    #[test]
    fn catalogue_replacement_keeping_selected_stays_open() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        session.open_by_id("element2");
        recorder.clear();

        let replacement = Catalogue::new(catalogue_of(4).iter().skip(1).cloned().collect());
        let t = session.replace_catalogue(replacement);
        assert!(t.is_empty());
        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.selected().unwrap().id, "element2");
    }

    #[test]
    fn catalogue_replacement_while_closed_is_silent() {
        let recorder = Recorder::default();
        let mut session = open_session(4, &recorder);
        assert!(session.replace_catalogue(Catalogue::default()).is_empty());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn autoplay_advances_each_interval() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(&recorder, "autoplaySpeed = 1000"));
        session.replace_catalogue(catalogue_of(3));
        session.open_by_id("element0");
        recorder.clear();

        let fired = session.advance(Duration::from_millis(2500));
        assert_eq!(fired.len(), 2);
        assert_eq!(session.current_index(), Some(2));
        assert_eq!(
            recorder.events(),
            vec![LightboxEvent::SlideChange(1), LightboxEvent::SlideChange(2)]
        );
        assert_eq!(session.autoplay_remaining(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn autoplay_over_a_long_idle_lands_on_the_right_slide() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(
            &recorder,
            "autoplaySpeed = 1\nhideControlsAfter = 0",
        ));
        session.replace_catalogue(catalogue_of(7));
        session.open_by_id("element0");
        recorder.clear();

        // 86_400_000 ticks of 1ms over 7 slides
        let fired = session.advance(Duration::from_secs(24 * 3600));
        assert_eq!(session.current_index(), Some(86_400_000 % 7));
        assert!(fired.len() <= 7);
        assert_eq!(session.autoplay_remaining(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn skipping_laps_matches_stepping_one_tick_at_a_time() {
        let recorder = Recorder::default();
        let settings = || settings_with(&recorder, "autoplaySpeed = 1\nhideControlsAfter = 0");
        let mut at_once = Session::new(settings());
        let mut stepped = Session::new(settings());
        for session in [&mut at_once, &mut stepped] {
            session.replace_catalogue(catalogue_of(7));
            session.open_by_id("element0");
        }

        at_once.advance(Duration::from_micros(100_500));
        for _ in 0..100 {
            stepped.advance(Duration::from_millis(1));
        }
        stepped.advance(Duration::from_micros(500));

        assert_eq!(at_once.current_index(), Some(100 % 7));
        assert_eq!(at_once.current_index(), stepped.current_index());
        assert_eq!(at_once.autoplay_remaining(), stepped.autoplay_remaining());
    }

    #[test]
    fn autoplay_zero_never_fires() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        session.open_by_id("element0");
        recorder.clear();

        assert!(session.advance(Duration::from_secs(24 * 3600)).is_empty());
        assert_eq!(session.current_index(), Some(0));
        assert!(recorder.events().is_empty());
        assert_eq!(session.autoplay_remaining(), None);
    }

    #[test]
    fn manual_navigation_restarts_autoplay() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(&recorder, "autoplaySpeed = 1000"));
        session.replace_catalogue(catalogue_of(5));
        session.open_by_id("element0");

        session.advance(Duration::from_millis(900));
        session.navigate(Direction::Next);
        assert_eq!(session.autoplay_remaining(), Some(Duration::from_millis(1000)));

        session.advance(Duration::from_millis(900));
        assert_eq!(session.current_index(), Some(1));
        session.advance(Duration::from_millis(100));
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn time_after_close_is_noop() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(&recorder, "autoplaySpeed = 1000"));
        session.replace_catalogue(catalogue_of(3));
        session.open_by_id("element0");
        session.close();
        recorder.clear();

        assert!(session.advance(Duration::from_secs(10)).is_empty());
        assert!(recorder.events().is_empty());
        assert_eq!(session.autoplay_remaining(), None);
    }

    #[test]
    fn disabling_autoplay_while_open_cancels_it() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(&recorder, "autoplaySpeed = 1000"));
        session.replace_catalogue(catalogue_of(3));
        session.open_by_id("element0");

        session.replace_settings(settings_with(&recorder, "autoplaySpeed = 0"));
        assert_eq!(session.autoplay_remaining(), None);
        assert!(session.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn enabling_autoplay_while_open_arms_it() {
        let recorder = Recorder::default();
        let mut session = open_session(3, &recorder);
        session.open_by_id("element0");
        session.replace_settings(settings_with(&recorder, "autoplaySpeed = 200"));
        session.advance(Duration::from_millis(200));
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn controls_hide_after_idle_and_return_on_activity() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(
            &recorder,
            "autoplaySpeed = 0\nhideControlsAfter = 500",
        ));
        session.replace_catalogue(catalogue_of(2));
        session.open_by_id("element0");
        assert!(session.controls_visible());

        session.advance(Duration::from_millis(499));
        assert!(session.controls_visible());
        session.advance(Duration::from_millis(1));
        assert!(!session.controls_visible());

        session.pointer_activity();
        assert!(session.controls_visible());
        session.navigate(Direction::Next);
        session.advance(Duration::from_millis(400));
        assert!(session.controls_visible());
    }

    #[test]
    fn autoplay_does_not_reveal_controls() {
        let recorder = Recorder::default();
        let mut session = Session::new(settings_with(
            &recorder,
            "autoplaySpeed = 1000\nhideControlsAfter = 300",
        ));
        session.replace_catalogue(catalogue_of(3));
        session.open_by_id("element0");

        session.advance(Duration::from_millis(1000));
        assert_eq!(session.current_index(), Some(1));
        assert!(!session.controls_visible());
    }

    #[test]
    fn backfill_updates_catalogue_and_selection() {
        let recorder = Recorder::default();
        let mut session = open_session(2, &recorder);
        session.open_by_id("element1");
        let dims = Dimensions {
            width: 4000,
            height: 3000,
        };

        assert!(session.backfill_dimensions("element1", dims));
        assert_eq!(session.selected().unwrap().dimensions, Some(dims));
        assert_eq!(
            find_entry(session.catalogue(), "element1").dimensions,
            Some(dims)
        );
        assert!(!session.backfill_dimensions("element7", dims));
    }
}
