// src/display/mod.rs
//! Terminal output: live tracking dashboard, workout summary and route sketch

pub mod map;
pub mod terminal;

pub use map::sketch_route;
pub use terminal::{render_summary, TerminalDisplay, TerminalSummary};
