//! Web API implementation of [`PlayerApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ListedDevice, Playback, PlayerApi, Track};
use crate::{Error, Result};

/// Production Web API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Response from the device listing endpoint
#[derive(Debug, Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: Vec<Value>,
}

/// Request body for transferring playback
#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    device_ids: [&'a str; 1],
    play: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackObject>,
}

#[derive(Debug, Deserialize)]
struct TrackObject {
    uri: Option<String>,
    name: Option<String>,
    #[serde(default)]
    artists: Vec<ArtistObject>,
}

#[derive(Debug, Deserialize)]
struct ArtistObject {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CurrentlyPlayingResponse {
    #[serde(default)]
    is_playing: bool,
    item: Option<TrackObject>,
}

impl TrackObject {
    fn into_track(self) -> Option<Track> {
        Some(Track {
            uri: self.uri.unwrap_or_default(),
            name: self.name?,
            artist: self.artists.into_iter().next().map(|a| a.name),
        })
    }
}

/// Player API client speaking to the streaming service's Web API
#[derive(Debug, Clone)]
pub struct WebApiClient {
    client: Client,
    base_url: String,
}

impl Default for WebApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, Duration::from_secs(10))
    }
}

impl WebApiClient {
    /// Create a client for the API at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `https://api.spotify.com/v1`
    /// * `timeout` - Per-request timeout
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request, turning non-success statuses into [`Error::Api`]
    async fn send(&self, request: RequestBuilder, token: &str) -> Result<Response> {
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "player api request failed");
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    body
                },
            });
        }

        Ok(response)
    }

    async fn command(&self, request: RequestBuilder, token: &str) -> Result<u16> {
        let response = self.send(request, token).await?;
        Ok(response.status().as_u16())
    }
}

/// Decode device entries one by one, dropping the ones that are malformed
///
/// Restricted devices come back with a `null` id and cannot be targeted.
fn decode_devices(entries: Vec<Value>) -> Vec<ListedDevice> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ListedDevice>(entry) {
            Ok(device) => Some(device),
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed device entry");
                None
            }
        })
        .collect()
}

#[async_trait]
impl PlayerApi for WebApiClient {
    async fn list_devices(&self, token: &str) -> Result<Vec<ListedDevice>> {
        let request = self.client.get(self.url("/me/player/devices"));
        let response = self.send(request, token).await?;

        let body: DevicesResponse = response.json().await?;
        let devices = decode_devices(body.devices);

        tracing::debug!(count = devices.len(), "listed devices");
        Ok(devices)
    }

    async fn play(&self, token: &str) -> Result<u16> {
        let request = self.client.put(self.url("/me/player/play"));
        self.command(request, token).await
    }

    async fn pause(&self, token: &str) -> Result<u16> {
        let request = self.client.put(self.url("/me/player/pause"));
        self.command(request, token).await
    }

    async fn skip_next(&self, token: &str) -> Result<u16> {
        let request = self.client.post(self.url("/me/player/next"));
        self.command(request, token).await
    }

    async fn skip_previous(&self, token: &str) -> Result<u16> {
        let request = self.client.post(self.url("/me/player/previous"));
        self.command(request, token).await
    }

    async fn set_volume(&self, token: &str, percent: u8) -> Result<u16> {
        let request = self
            .client
            .put(self.url("/me/player/volume"))
            .query(&[("volume_percent", percent.min(100))]);
        self.command(request, token).await
    }

    async fn transfer(&self, token: &str, device_id: &str, play: bool) -> Result<u16> {
        let request = self
            .client
            .put(self.url("/me/player"))
            .json(&TransferRequest {
                device_ids: [device_id],
                play,
            });
        self.command(request, token).await
    }

    async fn search_track(&self, token: &str, query: &str) -> Result<Option<Track>> {
        let request = self
            .client
            .get(self.url("/search"))
            .query(&[("q", query), ("type", "track"), ("offset", "0")]);
        let response = self.send(request, token).await?;

        let body: SearchResponse = response.json().await?;
        let track = body
            .tracks
            .and_then(|page| page.items.into_iter().next())
            .and_then(TrackObject::into_track)
            .filter(|track| !track.uri.is_empty());

        Ok(track)
    }

    async fn queue(&self, token: &str, uri: &str) -> Result<u16> {
        let request = self
            .client
            .post(self.url("/me/player/queue"))
            .query(&[("uri", uri)]);
        self.command(request, token).await
    }

    async fn currently_playing(&self, token: &str) -> Result<Option<Playback>> {
        let request = self.client.get(self.url("/me/player/currently-playing"));
        let response = self.send(request, token).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        let current: CurrentlyPlayingResponse = serde_json::from_slice(&body)?;
        Ok(Some(Playback {
            is_playing: current.is_playing,
            item: current.item.and_then(TrackObject::into_track),
        }))
    }
}
