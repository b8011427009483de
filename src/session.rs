//! Per-turn conversation context
//!
//! The voice platform hands every turn a session: whether it is the first
//! turn of a conversation, who the user is, the linked account token and a
//! bag of JSON attributes that survive until the conversation ends. The skill
//! only ever touches two attributes, [`DEVICES_KEY`] and [`STATUS_CODE_KEY`].

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};

use crate::devices::DiscoverySnapshot;

/// Session attribute holding the last discovered device snapshot
pub const DEVICES_KEY: &str = "devices";

/// Session attribute holding the last observed HTTP status from the API
pub const STATUS_CODE_KEY: &str = "statusCode";

/// What the device resolver needs from a voice turn
pub trait TurnContext {
    /// Whether this is the first turn of the conversation
    fn is_new(&self) -> bool;

    /// Platform user identifier
    fn user_id(&self) -> &str;

    /// Linked account access token, if the user linked one
    fn access_token(&self) -> Option<&str>;

    /// Read a stored attribute
    fn stored_value(&self, key: &str) -> Option<&Value>;

    /// Write a stored attribute
    fn set_stored_value(&mut self, key: &str, value: Value);

    /// Device snapshot stored by an earlier turn
    ///
    /// An attribute that does not decode into a valid snapshot is treated as
    /// absent.
    fn devices(&self) -> Option<DiscoverySnapshot> {
        let value = self.stored_value(DEVICES_KEY)?;
        match serde_json::from_value(value.clone()) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed devices attribute");
                None
            }
        }
    }

    /// Store a device snapshot for later turns
    fn store_devices(&mut self, snapshot: &DiscoverySnapshot) {
        match serde_json::to_value(snapshot) {
            Ok(value) => self.set_stored_value(DEVICES_KEY, value),
            Err(e) => tracing::warn!(error = %e, "failed to encode devices attribute"),
        }
    }

    /// Last recorded API status code
    fn status_code(&self) -> Option<u16> {
        self.stored_value(STATUS_CODE_KEY)
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    /// Record an API status code; `None` records a failure without a status
    fn record_status(&mut self, status: Option<u16>) {
        self.set_stored_value(STATUS_CODE_KEY, status.map_or(Value::Null, Value::from));
    }
}

/// Voice platform session for one turn
#[derive(Debug)]
pub struct Session {
    new: bool,
    user_id: String,
    access_token: Option<SecretString>,
    attributes: Map<String, Value>,
}

impl Session {
    /// Create the session for the first turn of a conversation
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            new: true,
            user_id: user_id.into(),
            access_token: None,
            attributes: Map::new(),
        }
    }

    /// Resume a conversation with the attributes carried from the last turn
    #[must_use]
    pub fn resume(user_id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            new: false,
            user_id: user_id.into(),
            access_token: None,
            attributes,
        }
    }

    /// Attach the linked account token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token: String = token.into();
        self.access_token = (!token.is_empty()).then(|| SecretString::new(token.into()));
        self
    }

    /// Attributes to hand back to the platform for the next turn
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Consume the session, keeping only its attributes
    #[must_use]
    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }
}

impl TurnContext for Session {
    fn is_new(&self) -> bool {
        self.new
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn access_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|t| t.expose_secret())
    }

    fn stored_value(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn set_stored_value(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }
}
