//! Shared utilities.

pub mod links;
