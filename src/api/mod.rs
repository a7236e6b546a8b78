//! Job-management API client.

pub mod client;

pub use client::{HttpJobApi, JobApi};
