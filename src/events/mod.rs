//! Event handling module.
//!
//! This module contains handlers for different types of events:
//! - Network events: Spotify Web API interactions
//! - Terminal events: key presses and ticks driving the debounce

pub mod network;
pub mod terminal;
