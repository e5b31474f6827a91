//! The ScanFlow application aggregate.
//!
//! [`ScannerApp`] owns the document store, the navigation state machine and
//! the analyzer, and drives the capture -> analyze -> review flow on top of
//! them.

pub mod app;
pub mod export;

pub use app::ScannerApp;
pub use export::{render_printable, PrintablePage};
