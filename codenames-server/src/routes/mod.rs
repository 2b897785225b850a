//! HTTP route handlers

pub mod game;
pub mod simulate;
pub mod stats;
pub mod status;
