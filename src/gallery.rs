//! The gallery: discovery, readiness, and catalogue building wired to a session.
//!
//! A [`Gallery`] is what a host embeds. It owns the [`Session`], the settings
//! overrides, the latest discovery snapshot and the click bindings, and
//! exposes the steps of a refresh separately so the host can run the one
//! asynchronous step (waiting for media to load) however it likes:
//!
//! ```text
//! rescan(doc)            ──▶ Snapshot            (sync, records it as latest)
//! await_ready(probe, s)  ──▶ ReadyReport         (async, host-driven)
//! apply(doc, report)     ──▶ ApplyOutcome        (sync, drops stale reports)
//! ```
//!
//! [`Gallery::refresh`] runs all three in sequence for hosts that don't care.
//!
//! ## Stale reports
//!
//! If the page changes while a readiness wait is in flight, the host re-scans
//! and starts a second wait. Whichever finishes first, only a report whose
//! snapshot equals the latest one is applied; the other is discarded. Every
//! [`Gallery::rescan`] bumps the snapshot generation, so an older scan can
//! never overwrite the catalogue of a newer one, even when both found the
//! same nodes.
//!
//! ## Measured dimensions
//!
//! Linked entries have no dimensions until the renderer measures them and
//! calls [`Session::backfill_dimensions`]. A rebuilt catalogue keeps those
//! measurements for every entry whose id and source did not change.

use crate::catalogue::{ClickBindings, build_catalogue};
use crate::dom::{HostDocument, Marker, NodeId};
use crate::events::Transition;
use crate::ready::{LoadProbe, ReadyReport, await_ready};
use crate::scan::{Snapshot, scan};
use crate::session::Session;
use crate::settings::{Overrides, Settings, SettingsError, merge, settings_differ};

/// What [`Gallery::apply`] did with a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new catalogue replaced the old one.
    Applied {
        entries: usize,
        transition: Transition,
    },
    /// The rebuilt catalogue equals the current one.
    Unchanged,
    /// The report was computed for a snapshot that is no longer current,
    /// or some of its nodes left the document while it was pending.
    Stale,
}

/// Result of an input event on a scanned node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The gallery handled it; the host must suppress the default action
    /// (following the anchor).
    Handled(Transition),
    /// Not a gallery node; let the host do its default.
    Ignored,
}

/// Whether new overrides changed the effective settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsUpdate {
    /// Settings were replaced. Re-scan so the change takes effect.
    Changed,
    Unchanged,
}

#[derive(Debug)]
pub struct Gallery {
    marker: Marker,
    defaults: Settings,
    session: Session,
    latest: Option<Snapshot>,
    generation: u64,
    bindings: ClickBindings,
}

impl Gallery {
    pub fn new(defaults: Settings) -> Self {
        Self {
            marker: Marker::default(),
            session: Session::new(defaults.clone()),
            defaults,
            latest: None,
            generation: 0,
            bindings: ClickBindings::default(),
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn bindings(&self) -> &ClickBindings {
        &self.bindings
    }

    pub fn latest_snapshot(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    /// Merge `overrides` onto the defaults and install the result if it
    /// differs from the current settings.
    ///
    /// On error the current settings stay in force.
    pub fn set_overrides(&mut self, overrides: &Overrides) -> Result<SettingsUpdate, SettingsError> {
        let merged = merge(&self.defaults, overrides)?;
        if !settings_differ(self.session.settings(), &merged) {
            return Ok(SettingsUpdate::Unchanged);
        }
        tracing::debug!("settings replaced");
        self.session.replace_settings(merged);
        Ok(SettingsUpdate::Changed)
    }

    /// Scan the document and record the result as the latest snapshot.
    ///
    /// Reports for any earlier snapshot are stale from here on.
    pub fn rescan<D: HostDocument + ?Sized>(&mut self, doc: &D) -> Snapshot {
        self.generation += 1;
        let snapshot = Snapshot {
            generation: self.generation,
            ..scan(doc, doc.root(), &self.marker).snapshot()
        };
        tracing::debug!(
            generation = snapshot.generation,
            category = ?snapshot.category,
            nodes = snapshot.nodes.len(),
            "discovered"
        );
        self.latest = Some(snapshot.clone());
        snapshot
    }

    /// Build and install a catalogue from `report`, unless it is stale.
    pub fn apply<D: HostDocument + ?Sized>(&mut self, doc: &D, report: ReadyReport) -> ApplyOutcome {
        if self.latest.as_ref() != Some(&report.snapshot) || !report.all_complete {
            tracing::debug!(
                generation = report.snapshot.generation,
                nodes = report.snapshot.nodes.len(),
                "discarding stale readiness report"
            );
            return ApplyOutcome::Stale;
        }

        let (catalogue, bindings) = build_catalogue(doc, &report);
        let catalogue = catalogue.keep_dimensions_from(self.session.catalogue());
        self.bindings = bindings;
        if &catalogue == self.session.catalogue() {
            return ApplyOutcome::Unchanged;
        }

        let entries = catalogue.len();
        let transition = self.session.replace_catalogue(catalogue);
        ApplyOutcome::Applied {
            entries,
            transition,
        }
    }

    /// Rescan, wait for readiness, and apply, in one go.
    pub async fn refresh<D, P>(&mut self, doc: &D, probe: &P) -> ApplyOutcome
    where
        D: HostDocument + ?Sized,
        P: LoadProbe + ?Sized,
    {
        let snapshot = self.rescan(doc);
        let report = await_ready(probe, snapshot).await;
        self.apply(doc, report)
    }

    /// Route an input event on `node` (click, tap, key) to the session.
    pub fn activate(&mut self, node: NodeId) -> Activation {
        let Some(id) = self.bindings.entry_id(node).map(String::from) else {
            return Activation::Ignored;
        };
        Activation::Handled(self.session.open_by_id(&id))
    }
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
