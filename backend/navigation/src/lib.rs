//! View/navigation controller.
//!
//! A single-active-view state machine over
//! [`View`](scanflow_core::View): `dashboard`, `capturing`, `review` and
//! `settings`, threading the active document between screens.

pub mod navigator;

pub use navigator::{Navigator, ANALYSIS_FAILED_NOTICE};
