//! Shared test utilities

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use connect_skill::devices::{DeviceCache, DeviceResolver, NameMatcher, SnapshotCache};
use connect_skill::player::{ListedDevice, Playback, PlayerApi, Track};
use connect_skill::{DiscoverySnapshot, Error, Result, Session, Skill};

pub const TOKEN: &str = "test-token";
pub const USER: &str = "amzn1.account.test";

/// A device as the listing endpoint would return it
pub fn listed(id: &str, name: &str) -> ListedDevice {
    ListedDevice {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// In-memory [`PlayerApi`] that records what it was asked to do
#[derive(Default)]
pub struct FakePlayer {
    devices: Mutex<Vec<ListedDevice>>,
    failure: Mutex<Option<u16>>,
    track: Mutex<Option<Track>>,
    playback: Mutex<Option<Playback>>,
    pub list_calls: AtomicUsize,
    pub commands: Mutex<Vec<String>>,
}

impl FakePlayer {
    pub fn with_devices(devices: Vec<ListedDevice>) -> Arc<Self> {
        let player = Self::default();
        *player.devices.lock().unwrap() = devices;
        Arc::new(player)
    }

    /// Answer every call with this HTTP status as an API error
    pub fn fail_with(&self, status: u16) {
        *self.failure.lock().unwrap() = Some(status);
    }

    pub fn set_devices(&self, devices: Vec<ListedDevice>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn set_search_result(&self, track: Option<Track>) {
        *self.track.lock().unwrap() = track;
    }

    pub fn set_playback(&self, playback: Option<Playback>) {
        *self.playback.lock().unwrap() = playback;
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    fn check(&self, token: &str) -> Result<()> {
        assert_eq!(token, TOKEN, "player called with unexpected token");
        match *self.failure.lock().unwrap() {
            Some(status) => Err(Error::Api {
                status,
                message: "fake failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn command(&self, token: &str, name: String) -> Result<u16> {
        self.check(token)?;
        self.commands.lock().unwrap().push(name);
        Ok(204)
    }
}

#[async_trait]
impl PlayerApi for FakePlayer {
    async fn list_devices(&self, token: &str) -> Result<Vec<ListedDevice>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check(token)?;
        Ok(self.devices.lock().unwrap().clone())
    }

    async fn play(&self, token: &str) -> Result<u16> {
        self.command(token, "play".to_string())
    }

    async fn pause(&self, token: &str) -> Result<u16> {
        self.command(token, "pause".to_string())
    }

    async fn skip_next(&self, token: &str) -> Result<u16> {
        self.command(token, "next".to_string())
    }

    async fn skip_previous(&self, token: &str) -> Result<u16> {
        self.command(token, "previous".to_string())
    }

    async fn set_volume(&self, token: &str, percent: u8) -> Result<u16> {
        self.command(token, format!("volume {percent}"))
    }

    async fn transfer(&self, token: &str, device_id: &str, play: bool) -> Result<u16> {
        self.command(token, format!("transfer {device_id} play={play}"))
    }

    async fn search_track(&self, token: &str, _query: &str) -> Result<Option<Track>> {
        self.check(token)?;
        Ok(self.track.lock().unwrap().clone())
    }

    async fn queue(&self, token: &str, uri: &str) -> Result<u16> {
        self.command(token, format!("queue {uri}"))
    }

    async fn currently_playing(&self, token: &str) -> Result<Option<Playback>> {
        self.check(token)?;
        Ok(self.playback.lock().unwrap().clone())
    }
}

/// [`DeviceCache`] wrapper counting reads and writes
pub struct CountingCache {
    inner: SnapshotCache,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

impl CountingCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: SnapshotCache::new(100, Duration::from_secs(3600)),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        })
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl DeviceCache for CountingCache {
    fn get(&self, key: &str) -> Option<DiscoverySnapshot> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key)
    }

    fn set(&self, key: &str, snapshot: DiscoverySnapshot, ttl: Duration) {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, snapshot, ttl);
    }
}

pub fn resolver(player: &Arc<FakePlayer>, cache: &Arc<CountingCache>) -> DeviceResolver {
    DeviceResolver::new(
        player.clone(),
        cache.clone(),
        Duration::from_secs(3600),
        NameMatcher::default(),
    )
}

pub fn skill(player: &Arc<FakePlayer>, cache: &Arc<CountingCache>) -> Skill {
    Skill::new(player.clone(), resolver(player, cache), None)
}

/// A linked first turn
pub fn new_session() -> Session {
    Session::new(USER).with_access_token(TOKEN)
}

/// A linked continuing turn carrying `snapshot`
pub fn session_with(snapshot: &DiscoverySnapshot) -> Session {
    use connect_skill::TurnContext;

    let mut session = Session::resume(USER, serde_json::Map::new()).with_access_token(TOKEN);
    session.store_devices(snapshot);
    session
}
