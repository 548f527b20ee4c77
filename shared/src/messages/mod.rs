pub mod container_request;
pub mod replication_message;
