//! Intent handlers

use super::request::{
    DEVICE_NAME_SLOT, DEVICE_NUMBER_SLOT, TRACK_NAME_SLOT, VOLUME_LEVEL_SLOT, VOLUME_PERCENT_SLOT,
};
use super::slots::{self, NumberSlot, VolumeScale};
use super::speech;
use super::{Response, Skill, TurnRequest, token};
use crate::devices::Device;
use crate::session::TurnContext;
use crate::{Error, Result};

pub fn launch() -> Response {
    Response::new()
        .say(speech::LAUNCH)
        .reprompt(speech::LAUNCH_REPROMPT)
}

pub fn help() -> Response {
    Response::new()
        .say(speech::HELP)
        .say(speech::HELP_EXAMPLE)
        .reprompt(speech::WHAT_NEXT)
}

/// Record the outcome of a player command and acknowledge it
pub fn command_outcome(session: &mut dyn TurnContext, result: Result<u16>) -> Response {
    match result {
        Ok(status) => {
            session.record_status(Some(status));
            Response::new().audio(speech::SUCCESS_SOUND)
        }
        Err(e) => {
            session.record_status(e.status_code());
            api_failure(&e)
        }
    }
}

/// Explain a failed player call
///
/// 403 means the account cannot be controlled remotely (not premium), 404
/// means there is no active device to act on.
pub fn api_failure(e: &Error) -> Response {
    match e.status_code() {
        Some(403) => Response::new().say(speech::PREMIUM_REQUIRED),
        Some(404) => Response::new()
            .say(speech::NO_DEVICES)
            .card(speech::connect_device_card()),
        _ => {
            tracing::warn!(error = %e, "player request failed");
            Response::new().say(speech::REQUEST_FAILED)
        }
    }
}

/// What to do with a resolved device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    /// Move playback and start playing
    Play,
    /// Move playback, keeping the current play state
    Transfer,
}

/// How the user referred to a device
enum DeviceReference<'a> {
    Number(u32),
    Name(&'a str),
}

impl DeviceAction {
    const fn starts_playback(self) -> bool {
        matches!(self, Self::Play)
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Play => "play on",
            Self::Transfer => "transfer to",
        }
    }

    fn confirmation(self, reference: &DeviceReference<'_>, device: &Device) -> String {
        match (self, reference) {
            (Self::Play, DeviceReference::Number(n)) => {
                format!("Playing on device {n}: {}", device.name)
            }
            (Self::Play, DeviceReference::Name(_)) => format!("Playing on device {}", device.name),
            (Self::Transfer, DeviceReference::Number(n)) => {
                format!("Transferring to device {n}: {}", device.name)
            }
            (Self::Transfer, DeviceReference::Name(_)) => {
                format!("Transferring to {}", device.name)
            }
        }
    }
}

impl Skill {
    pub(super) async fn volume(
        &self,
        request: &TurnRequest,
        session: &mut dyn TurnContext,
        scale: VolumeScale,
    ) -> Result<Response> {
        let slot = match scale {
            VolumeScale::Level => VOLUME_LEVEL_SLOT,
            VolumeScale::Percent => VOLUME_PERCENT_SLOT,
        };

        let percent = match scale.parse(request.slot(slot)) {
            NumberSlot::Valid(percent) => percent,
            NumberSlot::Missing => {
                return Ok(Response::new()
                    .say(speech::NO_VOLUME)
                    .say(scale.try_message())
                    .reprompt(speech::WHAT_NEXT));
            }
            NumberSlot::NotANumber => {
                return Ok(Response::new()
                    .say(scale.try_message())
                    .reprompt(speech::WHAT_NEXT));
            }
            NumberSlot::OutOfRange => {
                return Ok(Response::new()
                    .say(scale.range_message())
                    .should_end_session(false));
            }
        };

        let result = self.api.set_volume(token(session)?, percent).await;
        Ok(command_outcome(session, result))
    }

    pub(super) async fn list_devices(&self, session: &mut dyn TurnContext) -> Response {
        let snapshot = match self.resolver.refresh(session).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                session.record_status(e.status_code());
                return api_failure(&e);
            }
        };

        if snapshot.is_empty() {
            return Response::new()
                .say(speech::NO_DEVICES)
                .card(speech::connect_device_card());
        }

        let names: Vec<String> = snapshot
            .iter()
            .map(|d| format!("{}. {}", d.number, d.name))
            .collect();

        Response::new()
            .say(speech::FOUND_DEVICES)
            .say(format!("{}.", speech::join_list(&names)))
            .say(speech::DEVICES_WHAT_NEXT)
            .reprompt(speech::WHAT_NEXT)
    }

    pub(super) async fn device_action(
        &self,
        request: &TurnRequest,
        session: &mut dyn TurnContext,
        action: DeviceAction,
    ) -> Result<Response> {
        let reference = if request.slot(DEVICE_NUMBER_SLOT).is_some() {
            match slots::parse_device_number(request.slot(DEVICE_NUMBER_SLOT)) {
                NumberSlot::Valid(n) => DeviceReference::Number(n),
                NumberSlot::OutOfRange => {
                    return Ok(Response::new()
                        .say(format!(
                            "I can only find devices numbered up to {}.",
                            slots::MAX_DEVICE_NUMBER
                        ))
                        .say(speech::LIST_DEVICES_FIRST)
                        .should_end_session(false));
                }
                NumberSlot::NotANumber | NumberSlot::Missing => {
                    return Ok(Response::new()
                        .say(format!(
                            "I couldn't work out which device to {}, make sure you refer to the device by number or name.",
                            action.verb()
                        ))
                        .reprompt(speech::WHAT_NEXT));
                }
            }
        } else if let Some(name) = request.slot(DEVICE_NAME_SLOT) {
            DeviceReference::Name(name)
        } else {
            return Ok(Response::new()
                .say(format!("I couldn't work out which device to {}.", action.verb()))
                .say(speech::LIST_DEVICES_FIRST)
                .reprompt(speech::WHAT_NEXT));
        };

        let device = match &reference {
            DeviceReference::Number(n) => self.resolver.find_by_number(session, *n).await,
            DeviceReference::Name(name) => self.resolver.find_by_name(session, name).await,
        };

        let Some(device) = device else {
            let not_found = match &reference {
                DeviceReference::Number(n) => format!("I couldn't find device {n}."),
                DeviceReference::Name(name) => format!("I couldn't find a device named {name}."),
            };
            return Ok(Response::new()
                .say(not_found)
                .say(speech::LIST_DEVICES_FIRST)
                .should_end_session(false));
        };

        let result = self
            .api
            .transfer(token(session)?, &device.id, action.starts_playback())
            .await;

        match result {
            Ok(status) => {
                session.record_status(Some(status));
                Ok(Response::new().say(action.confirmation(&reference, &device)))
            }
            Err(e) => {
                session.record_status(e.status_code());
                Ok(api_failure(&e))
            }
        }
    }

    pub(super) async fn queue_track(
        &self,
        request: &TurnRequest,
        session: &mut dyn TurnContext,
    ) -> Result<Response> {
        let Some(query) = request.slot(TRACK_NAME_SLOT) else {
            return Ok(Response::new()
                .say(speech::QUEUE_NO_TRACK)
                .reprompt(speech::WHAT_NEXT));
        };

        let failed = || {
            Response::new()
                .say(speech::QUEUE_FAILED)
                .reprompt(speech::WHAT_NEXT)
        };

        let track = match self.api.search_track(token(session)?, query).await {
            Ok(Some(track)) => track,
            Ok(None) => {
                tracing::debug!(query, "no track found to queue");
                return Ok(failed());
            }
            Err(e) => {
                tracing::warn!(error = %e, "track search failed");
                session.record_status(e.status_code());
                return Ok(failed());
            }
        };

        match self.api.queue(token(session)?, &track.uri).await {
            Ok(status) => {
                session.record_status(Some(status));
                Ok(Response::new().say(format!("Queued track {}", track.name)))
            }
            Err(e) => {
                tracing::warn!(error = %e, "queueing track failed");
                session.record_status(e.status_code());
                Ok(failed())
            }
        }
    }

    pub(super) async fn current_track(&self, session: &mut dyn TurnContext) -> Result<Response> {
        let playback = match self.api.currently_playing(token(session)?).await {
            Ok(playback) => playback,
            Err(e) => {
                session.record_status(e.status_code());
                return Ok(api_failure(&e));
            }
        };

        let response = match playback {
            Some(playback) => match playback.item {
                Some(track) => {
                    let lead = if playback.is_playing { "This is" } else { "That was" };
                    match track.artist {
                        Some(artist) => {
                            Response::new().say(format!("{lead} {} by {artist}", track.name))
                        }
                        None => Response::new().say(format!("{lead} {}", track.name)),
                    }
                }
                None => Response::new().say(speech::NOTHING_PLAYING),
            },
            None => Response::new().say(speech::NOTHING_PLAYING),
        };

        Ok(response)
    }
}
