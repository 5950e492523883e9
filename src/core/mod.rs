// Cerebro - core/mod.rs
//
// Core business logic layer: extraction, matching, query resolution, export.
// Must NOT depend on: app, platform, or any filesystem/network access.

pub mod export;
pub mod extractor;
pub mod matcher;
pub mod model;
pub mod query;
