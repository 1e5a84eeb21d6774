//! Readiness gate: wait until every discovered node has settled.
//!
//! A catalogue can only be built once the host knows, for each node, whether
//! its media loaded: resolved sources and intrinsic sizes do not exist before
//! that. [`await_ready`] asks a [`LoadProbe`] about every node of a
//! [`Snapshot`] concurrently and resolves when all of them have answered.
//!
//! The gate only aggregates. It never times out a node; a probe that can
//! hang forever makes the gate hang forever.
//!
//! ## Staleness
//!
//! Each [`ReadyReport`] carries the snapshot it was computed for. The page
//! can change while a wait is in flight, so the consumer must compare that
//! snapshot against its latest discovery before acting on the report and
//! drop it if they differ. [`Gallery::apply`](crate::gallery::Gallery::apply)
//! does exactly that.

use crate::dom::{Document, HostDocument, LoadState, NodeId};
use crate::scan::Snapshot;
use futures::future::{self, LocalBoxFuture};
use serde::Serialize;

/// How one node settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    Loaded,
    /// The media errored. Terminal, like `Loaded`, for gating purposes.
    Failed,
    /// The node left the document before it settled.
    Detached,
}

impl LoadOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, LoadOutcome::Detached)
    }
}

/// Host primitive: "tell me when this node has finished loading or failed".
pub trait LoadProbe {
    fn settle(&self, node: NodeId) -> LocalBoxFuture<'_, LoadOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeReadiness {
    pub node: NodeId,
    pub outcome: LoadOutcome,
}

impl NodeReadiness {
    pub fn loaded(&self) -> bool {
        self.outcome == LoadOutcome::Loaded
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyReport {
    /// The discovery snapshot this report answers.
    pub snapshot: Snapshot,
    /// Every node reached a terminal state (loaded or failed).
    pub all_complete: bool,
    /// One entry per snapshot node, in snapshot order.
    pub per_node: Vec<NodeReadiness>,
}

impl ReadyReport {
    pub fn loaded_count(&self) -> usize {
        self.per_node.iter().filter(|r| r.loaded()).count()
    }
}

/// Wait for every node in `snapshot` to settle.
pub async fn await_ready<P: LoadProbe + ?Sized>(probe: &P, snapshot: Snapshot) -> ReadyReport {
    let outcomes = future::join_all(snapshot.nodes.iter().map(|node| probe.settle(*node))).await;

    let per_node: Vec<NodeReadiness> = snapshot
        .nodes
        .iter()
        .zip(outcomes)
        .map(|(node, outcome)| NodeReadiness {
            node: *node,
            outcome,
        })
        .collect();
    let all_complete = per_node.iter().all(|r| r.outcome.is_terminal());

    tracing::debug!(
        nodes = per_node.len(),
        loaded = per_node.iter().filter(|r| r.loaded()).count(),
        all_complete,
        "readiness settled"
    );

    ReadyReport {
        snapshot,
        all_complete,
        per_node,
    }
}

/// A static document cannot make further load progress, so the probe
/// answers immediately from the declared state: a node still `pending`
/// when probed counts as failed.
impl LoadProbe for Document {
    fn settle(&self, node: NodeId) -> LocalBoxFuture<'_, LoadOutcome> {
        let outcome = match self.media_view(node) {
            None => LoadOutcome::Detached,
            Some(view) => match view.load {
                LoadState::Loaded => LoadOutcome::Loaded,
                LoadState::Error | LoadState::Pending => LoadOutcome::Failed,
            },
        };
        Box::pin(future::ready(outcome))
    }
}
