//! # Slotsync Shared
//! Slot containers, membership diffing, authority-side validation and the
//! wire codec shared between slotsync-server & slotsync-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

mod container;
mod element;
mod gateway;
mod messages;
mod packet_writer;
pub mod transport;
mod types;

pub use container::{
    authority::{AuthorityMut, SlotAuthority},
    container_config::{ContainerConfig, DEFAULT_SLOT_COUNT},
    container_ref::ContainerRef,
    error::SlotError,
    notifier::{SubscriptionKey, UpdateNotifier},
    replication::{ContainerUpdate, DirtyFlags},
    slot_array::{SlotArray, SlotSnapshot},
    slot_container::SlotContainer,
    slot_diff::SlotDiff,
};
pub use element::{
    container_element::ContainerElement,
    element_key::ElementKey,
    element_kind::ElementKind,
    world_type::{ElementWorldMut, ElementWorldRef},
};
pub use gateway::{PacketGateway, RemoteInvocationGateway};
pub use messages::{
    container_request::{ContainerRequest, ContainerRequestMessage},
    replication_message::ReplicationMessage,
};
pub use packet_writer::PacketWriter;
pub use types::{ContainerKey, ContainerRole, SlotIndex};

pub use naia_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};
