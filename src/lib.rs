//! Multiplayer Headlines: a terminal ticker for a shared headline feed.
//!
//! The binary polls `GET /headline` and scrolls the most recent headlines
//! across the screen, and submits new ones with `PUT /headline`.

pub mod api;
pub mod app;
pub mod config;
pub mod feeds;
pub mod logging;
pub mod state;
pub mod tasks;
pub mod ui;
