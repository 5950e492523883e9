// Cerebro - platform/mod.rs
//
// Platform abstraction layer: directories, config file, filesystem helpers.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
