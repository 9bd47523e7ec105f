//! # postbot-core
//!
//! Core types and ports for the channel post bot: user profiles, reaction
//! records, the callback action-token grammar, the error taxonomy, and
//! tracing initialization. Transport-agnostic apart from keyboard types;
//! used by storage and the application crate.

pub mod action;
pub mod error;
pub mod logger;
pub mod ports;
pub mod types;

pub use action::CallbackAction;
pub use error::{PostError, Result};
pub use logger::init_tracing;
pub use ports::{AdminRightsOracle, MessagingTransport, ProfileStore, ReactionLedger};
pub use types::{
    ChannelRef, LinkButton, PostKey, ReactionCounts, ReactionKind, StagedMedia, UserProfile,
    MAX_CUSTOM_BUTTONS,
};
