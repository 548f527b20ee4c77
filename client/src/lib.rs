//! # Slotsync Client
//! Holds proxy copies of the containers a slotsync server has in scope.
//! Local mutation requests are forwarded to the server; local copies change
//! only when replicated state arrives.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use slotsync_shared::{
        transport::{PacketReceiver, PacketSender},
        ContainerElement, ContainerKey, ContainerRef, ElementKey, ElementKind, ElementWorldMut,
        ElementWorldRef, SlotContainer, SlotError, SlotIndex,
    };
}

mod client;
mod error;

pub use client::ContainerClient;
pub use error::ClientError;
