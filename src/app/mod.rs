// Cerebro - app/mod.rs
//
// Application layer: catalog session, persistence, query bridge.
// Dependencies: core layer, platform layer.

pub mod bridge;
pub mod catalog;
pub mod store;
