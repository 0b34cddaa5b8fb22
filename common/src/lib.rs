//! Core of the earnings-report calendar: month grid generation, report
//! sources, data-file normalisation and the view state machine.
//!
//! Nothing here depends on a UI framework, so the same code runs in the SSR
//! server and in the hydrated WASM bundle.

pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod model;
pub mod payload;
pub mod source;
pub mod timer;
