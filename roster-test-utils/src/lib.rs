// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the Roster workspace.
//!
//! Designed for use in development and testing only, not for production code.
//!
//! - `fixtures`: the four students used throughout the tests
//! - `scripted_provider`: in-memory server double for the fetch loops
//! - `recording_subscriber`: subscriber that logs and awaits callbacks
//! - `helpers`: stream assertion helpers
//!
//! ```rust
//! use roster_test_utils::fixtures::{existing_students, student_ana};
//!
//! assert_eq!(existing_students()[0], student_ana());
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod fixtures;
pub mod helpers;
pub mod recording_subscriber;
pub mod scripted_provider;

// Re-export commonly used test utilities
pub use helpers::{assert_no_element_emitted, expect_next_student, names, take_students};
pub use recording_subscriber::{Event, RecordingSubscriber};
pub use scripted_provider::{Reply, ScriptedProvider};
