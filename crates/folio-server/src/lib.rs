//! Live preview server for folio portfolios.
//!
//! Renders the editor session as a live page, pushes reloads and theme
//! updates over a WebSocket, accepts configuration and content edits over a
//! small JSON API, and persists them through a debounced auto-saver.

pub mod autosave;
pub mod server;
pub mod watcher;
pub mod websocket;

pub use autosave::{AutoSaver, SaveRequest};
pub use server::{PreviewConfig, PreviewServer, ServerError, SharedSession};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
