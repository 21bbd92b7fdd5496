//! CLI library components for the casewhen runner.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
