//! Streaming service player API
//!
//! [`PlayerApi`] is the boundary to the remote Web API. Commands resolve to
//! the HTTP status the API answered with; non-success statuses come back as
//! [`Error::Api`](crate::Error::Api).

mod web;

use async_trait::async_trait;
use serde::Deserialize;

pub use web::{DEFAULT_API_BASE_URL, WebApiClient};

use crate::Result;

/// A device as returned by the device listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListedDevice {
    pub id: String,
    pub name: String,
}

/// A track found by search or currently playing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Provider URI, used for queueing
    pub uri: String,
    pub name: String,
    /// First credited artist
    pub artist: Option<String>,
}

/// Current playback state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    pub is_playing: bool,
    /// Track loaded in the player, if the API reported one
    pub item: Option<Track>,
}

/// Remote player operations on behalf of a linked account
#[async_trait]
pub trait PlayerApi: Send + Sync {
    /// List the user's available playback devices in API order
    async fn list_devices(&self, token: &str) -> Result<Vec<ListedDevice>>;

    /// Start or resume playback
    async fn play(&self, token: &str) -> Result<u16>;

    /// Pause playback
    async fn pause(&self, token: &str) -> Result<u16>;

    /// Skip to the next track
    async fn skip_next(&self, token: &str) -> Result<u16>;

    /// Skip to the previous track
    async fn skip_previous(&self, token: &str) -> Result<u16>;

    /// Set volume, 0 to 100 percent
    async fn set_volume(&self, token: &str, percent: u8) -> Result<u16>;

    /// Move playback to a device, optionally forcing it to play
    async fn transfer(&self, token: &str, device_id: &str, play: bool) -> Result<u16>;

    /// First track matching a search query
    async fn search_track(&self, token: &str, query: &str) -> Result<Option<Track>>;

    /// Add a track to the playback queue
    async fn queue(&self, token: &str, uri: &str) -> Result<u16>;

    /// What is loaded in the player right now; `None` when nothing is
    async fn currently_playing(&self, token: &str) -> Result<Option<Playback>>;
}
