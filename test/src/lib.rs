//! Test fixtures for slotsync integration tests: an in-memory world with
//! hook recording, and a server/client pair connected over packet channels.

pub mod test_world;

pub use helpers::{init_logging, Shield, Sword, TestPair};
pub use test_world::{HookEvent, TestEntity, TestWorld};
