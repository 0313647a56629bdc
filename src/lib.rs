//! Render helpers for the Supreme bot
//!
//! Two independent one-shot pipelines share this crate:
//! - the animated server banner (`create_banner` binary)
//! - the item price chart with forecast overlay (`chart_generator` binary)

pub mod config;
pub mod models;
pub mod services;
pub mod utils;
