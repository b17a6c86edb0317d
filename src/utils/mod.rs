//! Utility functions and helpers
//!
//! This module contains atomic file writes and timestamp helpers.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write_with, remove_stale_temp, safe_rename, temp_path_for};
pub use time::date_display;
