//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **entry-centric, not node-centric**. The primary display for
//! every catalogue entry is its positional index and caption; the id and the
//! media sources are secondary context on indented lines. Nodes that were
//! discovered but never made it into the catalogue only show up in the
//! readiness summary.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Discovery: plain, 3 nodes
//! Readiness: 2 loaded, 1 failed
//!
//! Catalogue (2 entries)
//! 001 Dawn
//!     Id: element0
//!     Source: photos/dawn.jpg
//!     Size: 1600x1067
//! 002 (photos/dusk.jpg)
//!     Id: element2
//!     Source: photos/dusk.jpg
//!     Thumbnail: thumbs/dusk.jpg
//! ```
//!
//! ## Play
//!
//! ```text
//! > open element0
//!     onLightboxOpened()
//!     onCountSlides(2)
//!     open at 001
//! > wait 3000
//!     onSlideChange(1)
//!     open at 002
//! > close
//!     onLightboxClosed()
//!     closed
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::catalogue::Catalogue;
use crate::dom::MediaKind;
use crate::ready::{LoadOutcome, ReadyReport};
use crate::scan::Category;
use crate::script::StepReport;
use crate::session::{Phase, Session};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entry line: captioned entries show the caption, others show
/// their source in parens.
///
/// ```text
/// 001 The Sunset        // captioned
/// 001 (sunset.jpg)      // uncaptioned, the source IS the identity
/// ```
fn entry_line(index: usize, caption: Option<&str>, source: &str) -> String {
    match caption {
        Some(c) if !c.trim().is_empty() => {
            format!("{} {}", format_index(index), truncate_caption(c.trim(), 60))
        }
        _ => format!("{} ({})", format_index(index), source),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_caption(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

fn phase_line(phase: Phase) -> String {
    match phase {
        Phase::Closed => "closed".to_string(),
        Phase::Open { index } => format!("open at {}", format_index(index + 1)),
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format the discovery and readiness summary of one refresh.
pub fn format_readiness(report: &ReadyReport) -> Vec<String> {
    let category = match report.snapshot.category {
        Category::Plain => "plain",
        Category::Linked => "linked",
    };
    let count = |outcome: LoadOutcome| {
        report
            .per_node
            .iter()
            .filter(|r| r.outcome == outcome)
            .count()
    };

    let mut lines = vec![format!(
        "Discovery: {}, {}",
        category,
        plural(report.snapshot.nodes.len(), "node", "nodes")
    )];
    let mut readiness = format!(
        "Readiness: {} loaded, {} failed",
        count(LoadOutcome::Loaded),
        count(LoadOutcome::Failed)
    );
    let detached = count(LoadOutcome::Detached);
    if detached > 0 {
        readiness.push_str(&format!(", {} detached", detached));
    }
    lines.push(readiness);
    lines
}

/// Format the catalogue as an entry inventory.
pub fn format_catalogue(catalogue: &Catalogue) -> Vec<String> {
    let mut lines = vec![format!(
        "Catalogue ({})",
        plural(catalogue.len(), "entry", "entries")
    )];

    for (i, entry) in catalogue.iter().enumerate() {
        lines.push(entry_line(i + 1, entry.caption.as_deref(), &entry.source));
        let ctx = indent(1);
        lines.push(format!("{}Id: {}", ctx, entry.id));
        if entry.kind == MediaKind::Video {
            lines.push(format!("{}Kind: video", ctx));
        }
        lines.push(format!("{}Source: {}", ctx, entry.source));
        if entry.thumbnail != entry.source {
            lines.push(format!("{}Thumbnail: {}", ctx, entry.thumbnail));
        }
        if let Some(d) = entry.dimensions {
            lines.push(format!("{}Size: {}x{}", ctx, d.width, d.height));
        }
    }

    lines
}

/// Print the readiness summary and catalogue to stdout.
pub fn print_scan_output(report: &ReadyReport, catalogue: &Catalogue) {
    for line in format_readiness(report) {
        println!("{}", line);
    }
    println!();
    for line in format_catalogue(catalogue) {
        println!("{}", line);
    }
}

// ============================================================================
// Play
// ============================================================================

/// Format one replayed step: the step, every event it dispatched, and the
/// resulting phase.
pub fn format_step(report: &StepReport) -> Vec<String> {
    let mut lines = vec![format!("> {}", report.step)];
    for event in &report.events {
        lines.push(format!("{}{}", indent(1), event));
    }
    lines.push(format!("{}{}", indent(1), phase_line(report.phase)));
    lines
}

/// Format what a renderer would see right now.
pub fn format_session_state(session: &Session) -> Vec<String> {
    let mut lines = Vec::new();
    match (session.phase(), session.selected()) {
        (Phase::Open { index }, Some(entry)) => {
            lines.push(format!(
                "Lightbox open at {} of {}",
                format_index(index + 1),
                format_index(session.catalogue().len())
            ));
            lines.push(format!("{}Id: {}", indent(1), entry.id));
            lines.push(format!("{}Source: {}", indent(1), entry.source));
            let controls = if session.controls_visible() {
                "visible"
            } else {
                "hidden"
            };
            lines.push(format!("{}Controls: {}", indent(1), controls));
            if let Some(left) = session.autoplay_remaining() {
                lines.push(format!(
                    "{}Autoplay: next in {}ms",
                    indent(1),
                    left.as_millis()
                ));
            }
        }
        _ => lines.push("Lightbox closed".to_string()),
    }
    lines
}

/// Print a replay and the final state to stdout.
pub fn print_play_output(reports: &[StepReport], session: &Session) {
    for report in reports {
        for line in format_step(report) {
            println!("{}", line);
        }
    }
    println!();
    for line in format_session_state(session) {
        println!("{}", line);
    }
}
