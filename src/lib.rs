//! Terminal calendar that lists, creates, edits and deletes events served by
//! a REST backend.

pub mod app;
pub mod calendar;
pub mod components;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod theme;
pub mod tui;
