//! # Simple Lightbox
//!
//! The engine behind a gallery overlay: it finds the images and videos on a
//! page, turns them into an ordered catalogue once they have loaded, and runs
//! the lightbox session (open, navigate, autoplay, close) that a renderer
//! draws. Drawing is not done here. A renderer reads [`session::SessionState`]
//! and calls the session's actions; everything on screen is its business.
//!
//! # Architecture: Scan, Wait, Build, Drive
//!
//! ```text
//! 1. Scan      page      →  Snapshot      (which nodes, which category)
//! 2. Wait      Snapshot  →  ReadyReport   (async: every node loaded or failed)
//! 3. Build     report    →  Catalogue     (one entry per loaded node)
//! 4. Drive     Catalogue →  Session       (state machine + callbacks)
//! ```
//!
//! Steps 1 to 3 re-run whenever the page changes. Only step 2 suspends, and
//! the page can change again while it does, so each report carries the
//! snapshot it answers and reports that no longer match the latest scan are
//! dropped. [`gallery::Gallery`] wires the four steps together.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | What the engine needs from a page (`HostDocument`) and an in-memory page loaded from JSON |
//! | [`scan`] | Discovery: plain media vs. marker-tagged anchors |
//! | [`ready`] | Readiness gate: waits for every discovered node to settle |
//! | [`catalogue`] | Catalogue entries and the builder that normalizes nodes into them |
//! | [`settings`] | Typed options, callbacks, override merging, `lightbox.toml` loading |
//! | [`events`] | Transition events and callback dispatch |
//! | [`session`] | The lightbox state machine, autoplay and control-hiding timers |
//! | [`gallery`] | Scan → wait → build → session, click bindings, stale-report policy |
//! | [`script`] | Session replay scripts for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Host Is a Trait
//!
//! The engine never touches a browser. Discovery and building go through
//! [`dom::HostDocument`]; load completion goes through [`ready::LoadProbe`].
//! A browser binding implements both over its own nodes. The CLI and the
//! tests use [`dom::Document`], which also implements both.
//!
//! ## No Executor
//!
//! The readiness gate is a plain `async fn` built on `futures` combinators.
//! Whoever embeds the engine already has an event loop and drives the future
//! on it; the CLI uses `futures::executor::block_on`.
//!
//! ## Virtual Time
//!
//! Autoplay and control hiding do not own timers. The host reports elapsed
//! time with [`session::Session::advance`] and can ask how long until the
//! next autoplay step. Timer behavior is therefore deterministic and tested
//! without sleeping.
//!
//! ## Values, Not Mutation
//!
//! Catalogues and settings are replaced whole, never edited in place. A
//! renderer holding a reference always sees a complete, consistent value.

pub mod catalogue;
pub mod dom;
pub mod events;
pub mod gallery;
pub mod output;
pub mod ready;
pub mod scan;
pub mod script;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_helpers;
