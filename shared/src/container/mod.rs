pub mod authority;
pub mod container_config;
pub mod container_ref;
pub mod container_state;
pub mod error;
pub mod notifier;
pub mod replication;
pub mod slot_array;
pub mod slot_container;
pub mod slot_diff;
