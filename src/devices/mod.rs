//! Playback device discovery and resolution
//!
//! A [`DiscoverySnapshot`] is the numbered result of one successful device
//! listing. Snapshots are stored on the turn context and in a cross-turn
//! [`DeviceCache`], and the [`DeviceResolver`] resolves spoken references
//! ("device two", "the kitchen speaker") against the most recent one.

mod cache;
mod matcher;
mod resolver;

use serde::{Deserialize, Serialize};

pub use cache::{DeviceCache, SnapshotCache};
pub use matcher::{DEFAULT_MATCH_THRESHOLD, NameMatcher};
pub use resolver::{DeviceResolver, cache_key};

use crate::player::ListedDevice;

/// A playback device as known at discovery time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque provider identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// 1-based position within the snapshot it was discovered in
    pub number: u32,
}

/// A snapshot violated the unique-number invariant
#[derive(Debug, thiserror::Error)]
#[error("device number {0} appears more than once")]
pub struct DuplicateNumber(pub u32);

/// Ordered, numbered result of one device listing
///
/// Device numbers are unique within a snapshot. Snapshots built from a
/// listing number devices `1..=N` in response order; snapshots decoded from
/// stored data are checked for duplicate numbers and rejected if any exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Device>", into = "Vec<Device>")]
pub struct DiscoverySnapshot {
    devices: Vec<Device>,
}

impl DiscoverySnapshot {
    /// Number listed devices in the order the API returned them
    pub fn from_listing(listed: impl IntoIterator<Item = ListedDevice>) -> Self {
        let devices = listed
            .into_iter()
            .zip(1..)
            .map(|(device, number)| Device {
                id: device.id,
                name: device.name,
                number,
            })
            .collect();
        Self { devices }
    }

    /// Devices in discovery order
    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Iterate devices in discovery order
    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up a device by its assigned number
    #[must_use]
    pub fn by_number(&self, number: u32) -> Option<&Device> {
        self.devices.iter().find(|d| d.number == number)
    }
}

impl TryFrom<Vec<Device>> for DiscoverySnapshot {
    type Error = DuplicateNumber;

    fn try_from(devices: Vec<Device>) -> std::result::Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(devices.len());
        for device in &devices {
            if !seen.insert(device.number) {
                return Err(DuplicateNumber(device.number));
            }
        }
        Ok(Self { devices })
    }
}

impl From<DiscoverySnapshot> for Vec<Device> {
    fn from(snapshot: DiscoverySnapshot) -> Self {
        snapshot.devices
    }
}

impl<'a> IntoIterator for &'a DiscoverySnapshot {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}
