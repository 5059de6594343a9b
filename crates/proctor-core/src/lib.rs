//! proctor-core — Exam session engine, quiz parsing, and scoring.
//!
//! This crate defines the quiz data model, the session state machine that
//! drives a timed exam, and the scoring logic that the rest of the proctor
//! system builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod timefmt;
