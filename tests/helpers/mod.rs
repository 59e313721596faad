//! Shared fixtures and assertions for integration tests

pub mod diagnostic_helpers;
pub mod source_fixtures;
