// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) parses flags, builds the configuration and hands the
// clients to the UI loop.
//
// Module responsibilities:
// - `api`: HTTP queries against the photo catalog (rovers, photos).
// - `viewer`: downloads a photo and opens it in the desktop viewer.
// - `session`: the browsing state machine (rover -> date -> pages).
// - `menu`: menu data and the `InteractiveMenu` seam the session uses.
// - `ui`: dialoguer/indicatif implementation of that seam.
// - `page`, `date`: paging window and date filter used by the session.
// - `config`, `cli`, `error`: configuration sources and error types.
// - `mock`: scripted stand-ins for the collaborators, used by tests and
//   only built with the `testing` feature.
pub mod api;
pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod menu;
#[cfg(any(test, feature = "testing"))]
pub mod mock;
pub mod page;
pub mod session;
pub mod ui;
pub mod viewer;
