//! Foundation module - Core utilities shared by the text pipeline
//!
//! - Logging setup

pub mod logging;
