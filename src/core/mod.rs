//! Core domain models
//!
//! This module defines the build configuration, the steps it plans, and the
//! state and results a run produces.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod step;

pub use error::*;
pub use pipeline::*;
pub use state::*;
pub use step::*;
