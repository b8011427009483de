//! Normalized turn requests and intents

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Slot carrying a 0-10 volume level
pub const VOLUME_LEVEL_SLOT: &str = "VOLUMELEVEL";
/// Slot carrying a 0-100 volume percentage
pub const VOLUME_PERCENT_SLOT: &str = "VOLUMEPERCENT";
/// Slot carrying a spoken device number
pub const DEVICE_NUMBER_SLOT: &str = "DEVICENUMBER";
/// Slot carrying a free-text device name
pub const DEVICE_NAME_SLOT: &str = "DEVICE";
/// Slot carrying a track search phrase
pub const TRACK_NAME_SLOT: &str = "TRACKNAME";

/// What kind of turn the platform delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Skill opened without an intent
    Launch,
    /// A recognized intent with its slot values
    Intent {
        name: String,
        slots: HashMap<String, String>,
    },
    /// Conversation closed by the platform
    SessionEnded,
}

/// One turn, already normalized out of the platform envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    /// Application the request was addressed to
    pub application_id: Option<String>,
    pub kind: RequestKind,
}

impl TurnRequest {
    #[must_use]
    pub const fn launch() -> Self {
        Self {
            application_id: None,
            kind: RequestKind::Launch,
        }
    }

    #[must_use]
    pub fn intent(name: impl Into<String>) -> Self {
        Self {
            application_id: None,
            kind: RequestKind::Intent {
                name: name.into(),
                slots: HashMap::new(),
            },
        }
    }

    #[must_use]
    pub const fn session_ended() -> Self {
        Self {
            application_id: None,
            kind: RequestKind::SessionEnded,
        }
    }

    #[must_use]
    pub fn with_application_id(mut self, id: impl Into<String>) -> Self {
        self.application_id = Some(id.into());
        self
    }

    /// Set a slot value; ignored for non-intent requests
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let RequestKind::Intent { slots, .. } = &mut self.kind {
            slots.insert(name.into(), value.into());
        }
        self
    }

    /// Non-blank slot value
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<&str> {
        match &self.kind {
            RequestKind::Intent { slots, .. } => slots
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty() && *v != "?"),
            _ => None,
        }
    }
}

/// Intents the skill understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Help,
    Stop,
    Cancel,
    Play,
    Pause,
    SkipNext,
    SkipPrevious,
    VolumeLevel,
    VolumePercent,
    GetDevices,
    DevicePlay,
    DeviceTransfer,
    QueueTrack,
    GetTrack,
}

impl Intent {
    /// Every intent, in interaction model order
    pub const ALL: [Self; 14] = [
        Self::Help,
        Self::Stop,
        Self::Cancel,
        Self::Play,
        Self::Pause,
        Self::SkipNext,
        Self::SkipPrevious,
        Self::VolumeLevel,
        Self::VolumePercent,
        Self::GetDevices,
        Self::DevicePlay,
        Self::DeviceTransfer,
        Self::QueueTrack,
        Self::GetTrack,
    ];

    /// Intent name as registered with the platform
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Help => "AMAZON.HelpIntent",
            Self::Stop => "AMAZON.StopIntent",
            Self::Cancel => "AMAZON.CancelIntent",
            Self::Play => "PlayIntent",
            Self::Pause => "PauseIntent",
            Self::SkipNext => "SkipNextIntent",
            Self::SkipPrevious => "SkipPreviousIntent",
            Self::VolumeLevel => "VolumeLevelIntent",
            Self::VolumePercent => "VolumePercentIntent",
            Self::GetDevices => "GetDevicesIntent",
            Self::DevicePlay => "DevicePlayIntent",
            Self::DeviceTransfer => "DeviceTransferIntent",
            Self::QueueTrack => "QueueTrackIntent",
            Self::GetTrack => "GetTrackIntent",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intent {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.name() == s)
            .ok_or_else(|| crate::Error::UnknownIntent(s.to_string()))
    }
}
