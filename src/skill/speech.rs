//! Spoken responses

use super::response::Card;

pub const SUCCESS_SOUND: &str =
    "soundbank://soundlibrary/ui/gameshow/amzn_ui_sfx_gameshow_neutral_response_02";

pub const NOT_LINKED: &str =
    "You have not linked your Spotify account, check your Alexa app to link the account";
pub const ERROR_PREFIX: &str = "An error occured: ";
pub const WHAT_NEXT: &str = "What would you like to do?";

pub const LAUNCH: &str =
    "I can control your Spotify Connect devices, to start, ask me to list your devices";
pub const LAUNCH_REPROMPT: &str = "To start, ask me to list your devices";

pub const HELP: &str = "You can ask me to list your connect devices and then control them. ";
pub const HELP_EXAMPLE: &str =
    "For example, tell me to play on a device by its number or name after listing devices";

pub const PREMIUM_REQUIRED: &str = "Make sure your Spotify account is premium";
pub const NO_DEVICES: &str = "I couldn't find any connect devices, check your Alexa app for information on connecting a device";
pub const REQUEST_FAILED: &str = "Sorry, I couldn't reach Spotify right now";

pub const FOUND_DEVICES: &str = "I found these connect devices: ";
pub const DEVICES_WHAT_NEXT: &str = "What would you like to do with these devices?";
pub const LIST_DEVICES_FIRST: &str = "Try asking me to list devices first";

pub const NO_VOLUME: &str = "I couldn't work out the volume to use.";

pub const QUEUE_NO_TRACK: &str = "I couldn't work out which song you want to queue.";
pub const QUEUE_FAILED: &str = "Sorry, I couldn't queue that song.";

pub const NOTHING_PLAYING: &str = "Nothing is playing";

const CONNECT_CARD_TITLE: &str = "Connecting to a device using Spotify Connect";
const CONNECT_CARD_CONTENT: &str = "To add a device to Spotify Connect, \
    log in to your Spotify account on a supported device such as an Echo, phone, or computer\n\
    https://support.spotify.com/uk/article/spotify-connect/";

/// Card explaining how to make a device show up in the listing
#[must_use]
pub fn connect_device_card() -> Card {
    Card::Simple {
        title: CONNECT_CARD_TITLE.to_string(),
        content: CONNECT_CARD_CONTENT.to_string(),
    }
}

/// "A", "A and B", "A, B, and C"
#[must_use]
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
