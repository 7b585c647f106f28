//! Tally Core Library
//!
//! Core domain logic for the tally grading system.

pub mod config;
pub mod course;
pub mod error;
pub mod id;
pub mod logging;
pub mod rubric;
pub mod store;
