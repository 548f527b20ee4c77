mod server_config;
pub use server_config::ServerConfig;

mod container_server;
pub use container_server::ContainerServer;
