//! Kikoeru Control — client-side control layer for the Kikoeru media-library
//! manager: task lifecycle tracking, watcher control, and the local
//! folder-open bridge.

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod notify;
pub mod remote_config;
pub mod tasks;
pub mod watcher;
