//! Session replay scripts for the `play` command.
//!
//! A script is one step per line. Blank lines and lines starting with `#`
//! are skipped.
//!
//! ```text
//! # open the second image, then let autoplay run
//! open element1
//! wait 6500
//! touch
//! click 0        # the first discovered node
//! remove 0       # remove it from the page and re-scan
//! close
//! ```
//!
//! `click` and `remove` address nodes by their position in the latest
//! discovery snapshot, so the same script works against any page with
//! enough gallery nodes.

use crate::dom::{Document, DomError};
use crate::events::LightboxEvent;
use crate::gallery::{Activation, ApplyOutcome, Gallery};
use crate::session::{Direction, Phase};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "arg", rename_all = "lowercase")]
pub enum Step {
    /// Open on the entry with this id.
    Open(String),
    /// Activate the N-th node of the latest snapshot.
    Click(usize),
    Next,
    Prev,
    Goto(isize),
    /// Let this many milliseconds pass.
    Wait(u64),
    Close,
    /// Remove the N-th node of the latest snapshot from the page, then re-scan.
    Remove(usize),
    /// Pointer activity over the lightbox.
    Touch,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Open(id) => write!(f, "open {id}"),
            Step::Click(n) => write!(f, "click {n}"),
            Step::Next => write!(f, "next"),
            Step::Prev => write!(f, "prev"),
            Step::Goto(i) => write!(f, "goto {i}"),
            Step::Wait(ms) => write!(f, "wait {ms}"),
            Step::Close => write!(f, "close"),
            Step::Remove(n) => write!(f, "remove {n}"),
            Step::Touch => write!(f, "touch"),
        }
    }
}

fn arg<T: std::str::FromStr>(command: &str, args: &[&str]) -> Result<T, String> {
    match args {
        [one] => one
            .parse()
            .map_err(|_| format!("{command}: invalid argument '{one}'")),
        [] => Err(format!("{command}: missing argument")),
        _ => Err(format!("{command}: expected one argument, got {}", args.len())),
    }
}

fn no_args(command: &str, step: Step, args: &[&str]) -> Result<Step, String> {
    if args.is_empty() {
        Ok(step)
    } else {
        Err(format!("{command}: takes no arguments"))
    }
}

fn parse_line(line: &str) -> Result<Option<Step>, String> {
    let line = line.split('#').next().unwrap_or_default();
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let step = match command {
        "open" => Step::Open(arg(command, &args)?),
        "click" => Step::Click(arg(command, &args)?),
        "next" => no_args(command, Step::Next, &args)?,
        "prev" => no_args(command, Step::Prev, &args)?,
        "goto" => Step::Goto(arg(command, &args)?),
        "wait" => Step::Wait(arg(command, &args)?),
        "close" => no_args(command, Step::Close, &args)?,
        "remove" => Step::Remove(arg(command, &args)?),
        "touch" => no_args(command, Step::Touch, &args)?,
        other => return Err(format!("unknown step '{other}'")),
    };
    Ok(Some(step))
}

/// Parse a script. Line numbers in errors are 1-based.
pub fn parse_script(source: &str) -> Result<Vec<Step>, ScriptError> {
    let mut steps = Vec::new();
    for (i, line) in source.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => {}
            Err(message) => return Err(ScriptError::Parse { line: i + 1, message }),
        }
    }
    Ok(steps)
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let source = std::fs::read_to_string(path)?;
    parse_script(&source)
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub step: Step,
    /// Events dispatched while running the step, in order.
    pub events: Vec<LightboxEvent>,
    /// Session phase after the step.
    pub phase: Phase,
}

fn snapshot_node(gallery: &Gallery, position: usize) -> Option<crate::dom::NodeId> {
    gallery
        .latest_snapshot()
        .and_then(|s| s.nodes.get(position).copied())
}

/// Run `steps` against a gallery that has already been refreshed on `doc`.
///
/// Steps that address a node the latest snapshot doesn't have are skipped
/// with a warning.
pub async fn play(
    gallery: &mut Gallery,
    doc: &mut Document,
    steps: &[Step],
) -> Result<Vec<StepReport>, DomError> {
    let mut reports = Vec::with_capacity(steps.len());

    for step in steps {
        let mut events = Vec::new();
        match step {
            Step::Open(id) => {
                events.extend_from_slice(gallery.session_mut().open_by_id(id).events());
            }
            Step::Click(position) => match snapshot_node(gallery, *position) {
                Some(node) => {
                    if let Activation::Handled(t) = gallery.activate(node) {
                        events.extend_from_slice(t.events());
                    }
                }
                None => tracing::warn!(position, "click: no such node"),
            },
            Step::Next => {
                events.extend_from_slice(gallery.session_mut().navigate(Direction::Next).events());
            }
            Step::Prev => {
                events.extend_from_slice(gallery.session_mut().navigate(Direction::Prev).events());
            }
            Step::Goto(index) => {
                events.extend_from_slice(gallery.session_mut().goto_index(*index).events());
            }
            Step::Wait(ms) => {
                for t in gallery.session_mut().advance(Duration::from_millis(*ms)) {
                    events.extend_from_slice(t.events());
                }
            }
            Step::Close => {
                events.extend_from_slice(gallery.session_mut().close().events());
            }
            Step::Remove(position) => match snapshot_node(gallery, *position) {
                Some(node) => {
                    doc.remove(node)?;
                    let doc: &Document = doc;
                    if let ApplyOutcome::Applied { transition, .. } =
                        gallery.refresh(doc, doc).await
                    {
                        events.extend_from_slice(transition.events());
                    }
                }
                None => tracing::warn!(position, "remove: no such node"),
            },
            Step::Touch => gallery.session_mut().pointer_activity(),
        }

        reports.push(StepReport {
            step: step.clone(),
            events,
            phase: gallery.session().phase(),
        });
    }

    Ok(reports)
}
