use std::default::Default;

use slotsync_shared::ContainerConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Used for containers spawned without an explicit config
    pub container: ContainerConfig,
    /// Determines whether a newly connected proxy is immediately sent every
    /// existing container
    pub send_spawns_on_connect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            container: ContainerConfig::default(),
            send_spawns_on_connect: true,
        }
    }
}
