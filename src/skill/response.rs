//! Skill responses rendered as SSML

use serde::Serialize;
use serde_json::{Map, Value};

/// Card shown in the companion app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Card {
    /// Plain title and body
    Simple { title: String, content: String },
    /// Prompt the user to link their streaming account
    LinkAccount,
}

/// Response to one turn
///
/// Spoken text is escaped for SSML; audio clips are inserted as `<audio>`
/// elements. Sessions end after the response unless told otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    speech: Vec<String>,
    reprompt: Option<String>,
    card: Option<Card>,
    should_end_session: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            speech: Vec::new(),
            reprompt: None,
            card: None,
            should_end_session: true,
        }
    }

    /// Append spoken text
    #[must_use]
    pub fn say(mut self, text: impl AsRef<str>) -> Self {
        let text = text.as_ref().trim();
        if !text.is_empty() {
            self.speech.push(escape_ssml(text));
        }
        self
    }

    /// Append an audio clip
    #[must_use]
    pub fn audio(mut self, src: &str) -> Self {
        self.speech
            .push(format!("<audio src='{}'/>", escape_ssml(src).replace('\'', "&apos;")));
        self
    }

    /// Text spoken if the user says nothing; keeps the session open
    #[must_use]
    pub fn reprompt(mut self, text: impl AsRef<str>) -> Self {
        self.reprompt = Some(escape_ssml(text.as_ref().trim()));
        self.should_end_session = false;
        self
    }

    #[must_use]
    pub fn card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    /// Ask the platform to show the account linking card
    #[must_use]
    pub fn link_account(self) -> Self {
        self.card(Card::LinkAccount)
    }

    #[must_use]
    pub fn should_end_session(mut self, end: bool) -> Self {
        self.should_end_session = end;
        self
    }

    /// Discard everything said so far
    #[must_use]
    pub fn clear(mut self) -> Self {
        self.speech.clear();
        self.reprompt = None;
        self.card = None;
        self
    }

    /// Output speech as an SSML document
    #[must_use]
    pub fn ssml(&self) -> String {
        format!("<speak>{}</speak>", self.speech.join(" "))
    }

    #[must_use]
    pub fn reprompt_ssml(&self) -> Option<String> {
        self.reprompt.as_ref().map(|r| format!("<speak>{r}</speak>"))
    }

    #[must_use]
    pub const fn card_ref(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    #[must_use]
    pub const fn ends_session(&self) -> bool {
        self.should_end_session
    }

    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.speech.is_empty()
    }

    /// Render the response together with the session attributes to carry
    /// into the next turn
    #[must_use]
    pub fn render(&self, session_attributes: &Map<String, Value>) -> RenderedResponse {
        RenderedResponse {
            session_attributes: session_attributes.clone(),
            response: ResponseBody {
                output_speech: (!self.is_silent()).then(|| OutputSpeech::ssml(self.ssml())),
                reprompt: self.reprompt_ssml().map(|ssml| Reprompt {
                    output_speech: OutputSpeech::ssml(ssml),
                }),
                card: self.card.clone(),
                should_end_session: self.should_end_session,
            },
        }
    }
}

/// Serialized form of a [`Response`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResponse {
    pub session_attributes: Map<String, Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub ssml: String,
}

impl OutputSpeech {
    fn ssml(ssml: String) -> Self {
        Self { kind: "SSML", ssml }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Escape text for inclusion in SSML element content
#[must_use]
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_say_joins_fragments() {
        let response = Response::new().say("Hello.").say("  ").say("Goodbye.");
        assert_eq!(response.ssml(), "<speak>Hello. Goodbye.</speak>");
    }

    #[test]
    fn test_say_escapes_text() {
        let response = Response::new().say("Tom & Jerry's <TV>");
        assert_eq!(
            response.ssml(),
            "<speak>Tom &amp; Jerry's &lt;TV&gt;</speak>"
        );
    }

    #[test]
    fn test_audio_is_not_escaped_as_text() {
        let response = Response::new().audio("soundbank://clip");
        assert_eq!(response.ssml(), "<speak><audio src='soundbank://clip'/></speak>");
    }

    #[test]
    fn test_reprompt_keeps_session_open() {
        let response = Response::new().say("Hi");
        assert!(response.ends_session());

        let response = response.reprompt("Anything else?");
        assert!(!response.ends_session());
        assert_eq!(
            response.reprompt_ssml().as_deref(),
            Some("<speak>Anything else?</speak>")
        );
    }

    #[test]
    fn test_clear() {
        let response = Response::new()
            .say("Hi")
            .reprompt("Again?")
            .link_account()
            .clear();

        assert!(response.is_silent());
        assert!(response.reprompt_ssml().is_none());
        assert!(response.card_ref().is_none());
    }

    #[test]
    fn test_render() {
        let mut attributes = Map::new();
        attributes.insert("statusCode".to_string(), json!(204));

        let rendered = Response::new()
            .say("Done")
            .card(Card::Simple {
                title: "Title".to_string(),
                content: "Body".to_string(),
            })
            .render(&attributes);

        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(
            json,
            json!({
                "sessionAttributes": { "statusCode": 204 },
                "response": {
                    "outputSpeech": { "type": "SSML", "ssml": "<speak>Done</speak>" },
                    "card": { "type": "Simple", "title": "Title", "content": "Body" },
                    "shouldEndSession": true
                }
            })
        );
    }

    #[test]
    fn test_render_silent_response() {
        let rendered = Response::new().render(&Map::new());
        let json = serde_json::to_value(&rendered).unwrap();

        assert!(json["response"].get("outputSpeech").is_none());
        assert_eq!(json["response"]["shouldEndSession"], json!(true));
    }

    #[test]
    fn test_link_account_card() {
        let json = serde_json::to_value(Card::LinkAccount).unwrap();
        assert_eq!(json, json!({ "type": "LinkAccount" }));
    }
}
