//! Connect Skill - voice control for streaming playback devices
//!
//! This library provides the backend of a voice skill that drives a
//! streaming service's remote playback API:
//! - Device discovery with per-conversation and cross-conversation caching
//! - Lookup of devices by spoken number or fuzzy-matched name
//! - Intent handlers for playback, volume, queueing and device transfer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Voice platform turn                     │
//! │   TurnRequest  │  Session (attributes, token)       │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                    Skill                             │
//! │   Intent handlers  │  DeviceResolver  │  Response   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │            PlayerApi (streaming Web API)             │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod devices;
pub mod error;
pub mod player;
pub mod session;
pub mod skill;

pub use config::Config;
pub use devices::{
    Device, DeviceCache, DeviceResolver, DiscoverySnapshot, NameMatcher, SnapshotCache,
};
pub use error::{Error, Result};
pub use player::{PlayerApi, WebApiClient};
pub use session::{Session, TurnContext};
pub use skill::{Response, Skill, TurnRequest};
