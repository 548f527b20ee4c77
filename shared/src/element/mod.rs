pub mod container_element;
pub mod element_key;
pub mod element_kind;
pub mod world_type;
