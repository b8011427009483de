//! Intent dispatch for the voice skill
//!
//! A [`Skill`] takes one normalized [`TurnRequest`] plus the turn's session
//! and produces a [`Response`]. Handlers never fail the turn: anything that
//! escapes them is spoken back as an error message.

mod handlers;
pub mod request;
pub mod response;
pub mod slots;
pub mod speech;

use std::sync::Arc;
use std::time::Duration;

pub use request::{Intent, RequestKind, TurnRequest};
pub use response::{Card, RenderedResponse, Response};

use crate::config::Config;
use crate::devices::{DeviceResolver, NameMatcher, SnapshotCache};
use crate::player::{PlayerApi, WebApiClient};
use crate::session::TurnContext;
use crate::{Error, Result};

/// The voice skill: intent handlers over a player API and device resolver
pub struct Skill {
    api: Arc<dyn PlayerApi>,
    resolver: DeviceResolver,
    application_id: Option<String>,
}

impl Skill {
    /// Create a skill
    ///
    /// # Arguments
    ///
    /// * `api` - Player API shared with the resolver
    /// * `resolver` - Device resolver
    /// * `application_id` - When set, requests for other applications are rejected
    #[must_use]
    pub fn new(
        api: Arc<dyn PlayerApi>,
        resolver: DeviceResolver,
        application_id: Option<String>,
    ) -> Self {
        Self {
            api,
            resolver,
            application_id,
        }
    }

    /// Build a skill talking to the Web API described by `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let api: Arc<dyn PlayerApi> = Arc::new(WebApiClient::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        ));
        let cache_ttl = Duration::from_secs(config.devices.cache_ttl_secs);
        let cache = Arc::new(SnapshotCache::new(config.devices.cache_capacity, cache_ttl));
        let resolver = DeviceResolver::new(
            api.clone(),
            cache,
            cache_ttl,
            NameMatcher::new(config.devices.match_threshold),
        );

        Self::new(api, resolver, config.skill.application_id.clone())
    }

    #[must_use]
    pub const fn resolver(&self) -> &DeviceResolver {
        &self.resolver
    }

    /// Handle one turn
    ///
    /// Errors are turned into spoken responses; this never fails.
    pub async fn handle(&self, request: &TurnRequest, session: &mut dyn TurnContext) -> Response {
        match self.dispatch(request, session).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "turn failed");
                Response::new().say(format!("{}{e}", speech::ERROR_PREFIX))
            }
        }
    }

    async fn dispatch(
        &self,
        request: &TurnRequest,
        session: &mut dyn TurnContext,
    ) -> Result<Response> {
        self.check_application(request)?;

        let name = match &request.kind {
            RequestKind::SessionEnded => return Ok(Response::new()),
            RequestKind::Launch => {
                if session.access_token().is_none() {
                    return Ok(not_linked());
                }
                return Ok(handlers::launch());
            }
            RequestKind::Intent { name, .. } => name,
        };

        let intent: Intent = name.parse()?;
        tracing::debug!(%intent, user_id = session.user_id(), new = session.is_new(), "handling intent");

        if requires_account(intent) && session.access_token().is_none() {
            return Ok(not_linked());
        }

        let response = match intent {
            Intent::Help => handlers::help(),
            Intent::Stop | Intent::Cancel => Response::new(),
            Intent::Play => {
                let result = self.api.play(token(session)?).await;
                handlers::command_outcome(session, result)
            }
            Intent::Pause => {
                let result = self.api.pause(token(session)?).await;
                handlers::command_outcome(session, result)
            }
            Intent::SkipNext => {
                let result = self.api.skip_next(token(session)?).await;
                handlers::command_outcome(session, result)
            }
            Intent::SkipPrevious => {
                let result = self.api.skip_previous(token(session)?).await;
                handlers::command_outcome(session, result)
            }
            Intent::VolumeLevel => {
                self.volume(request, session, slots::VolumeScale::Level)
                    .await?
            }
            Intent::VolumePercent => {
                self.volume(request, session, slots::VolumeScale::Percent)
                    .await?
            }
            Intent::GetDevices => self.list_devices(session).await,
            Intent::DevicePlay => {
                self.device_action(request, session, handlers::DeviceAction::Play)
                    .await?
            }
            Intent::DeviceTransfer => {
                self.device_action(request, session, handlers::DeviceAction::Transfer)
                    .await?
            }
            Intent::QueueTrack => self.queue_track(request, session).await?,
            Intent::GetTrack => self.current_track(session).await?,
        };

        Ok(response)
    }

    fn check_application(&self, request: &TurnRequest) -> Result<()> {
        match (&self.application_id, &request.application_id) {
            (Some(expected), Some(actual)) if expected != actual => {
                Err(Error::InvalidApplication(actual.clone()))
            }
            (Some(_), None) => Err(Error::InvalidApplication(String::new())),
            _ => Ok(()),
        }
    }
}

/// Intents that call the player API
const fn requires_account(intent: Intent) -> bool {
    !matches!(intent, Intent::Help | Intent::Stop | Intent::Cancel)
}

fn token(session: &dyn TurnContext) -> Result<&str> {
    session.access_token().ok_or(Error::AccountNotLinked)
}

fn not_linked() -> Response {
    Response::new().say(speech::NOT_LINKED).link_account()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DiscoverySnapshot;
    use crate::player::ListedDevice;
    use crate::session::Session;

    fn resumed_session() -> Session {
        let snapshot = DiscoverySnapshot::from_listing(vec![ListedDevice {
            id: "0".to_string(),
            name: "My device".to_string(),
        }]);
        let mut session =
            Session::resume("user", serde_json::Map::new()).with_access_token("token");
        session.store_devices(&snapshot);
        session
    }

    #[tokio::test]
    async fn test_from_config_applies_match_threshold() {
        let skill = Skill::from_config(&Config::default());
        let mut session = resumed_session();
        let found = skill.resolver().find_by_name(&mut session, "My devise").await;
        assert_eq!(found.map(|d| d.id).as_deref(), Some("0"));

        let mut strict = Config::default();
        strict.devices.match_threshold = 1.0;
        let skill = Skill::from_config(&strict);
        let mut session = resumed_session();
        assert!(skill.resolver().find_by_name(&mut session, "My devise").await.is_none());
        assert!(skill.resolver().find_by_name(&mut session, "My device").await.is_some());
    }

    #[tokio::test]
    async fn test_from_config_checks_application_id() {
        let mut config = Config::default();
        config.skill.application_id = Some("amzn1.ask.skill.expected".to_string());
        let skill = Skill::from_config(&config);
        let mut session = resumed_session();

        let request = TurnRequest::intent("AMAZON.HelpIntent").with_application_id("other");
        let response = skill.handle(&request, &mut session).await;
        assert!(response.ssml().contains("invalid application id: other"));
    }
}
