//! Outbound response types and the write-once response builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("response already finalized")]
    AlreadyFinalized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Finalized response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

impl Response {
    /// Response carrying no speech; ends the session.
    pub fn silent() -> Self {
        Self {
            output_speech: None,
            card: None,
            reprompt: None,
            should_end_session: true,
        }
    }

    /// Plain spoken response that ends the session.
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            output_speech: Some(OutputSpeech::plain(text)),
            card: None,
            reprompt: None,
            should_end_session: true,
        }
    }

    pub fn speech_text(&self) -> Option<&str> {
        self.output_speech.as_ref().map(OutputSpeech::text)
    }

    pub fn reprompt_text(&self) -> Option<&str> {
        self.reprompt.as_ref().map(|r| r.output_speech.text())
    }
}

/// Full response document returned to the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(default)]
    pub session_attributes: Map<String, Value>,
    pub response: Response,
}

impl ResponseEnvelope {
    pub fn new(response: Response, session_attributes: Map<String, Value>) -> Self {
        Self {
            version: "1.0".to_string(),
            session_attributes,
            response,
        }
    }
}

/// Accumulates one response. The first `tell*`/`ask*` call finalizes it;
/// later calls fail and leave the finalized response untouched.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    finalized: Option<Response>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speak and end the session.
    pub fn tell(&mut self, speech: impl Into<String>) -> Result<(), ResponseError> {
        self.finalize(speech.into(), None, None, true)
    }

    pub fn tell_with_card(
        &mut self,
        speech: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), ResponseError> {
        let card = Card::Simple {
            title: title.into(),
            content: content.into(),
        };
        self.finalize(speech.into(), None, Some(card), true)
    }

    /// Speak and keep the session open, re-prompting if the user stays silent.
    pub fn ask(
        &mut self,
        speech: impl Into<String>,
        reprompt: impl Into<String>,
    ) -> Result<(), ResponseError> {
        self.finalize(speech.into(), Some(reprompt.into()), None, false)
    }

    pub fn ask_with_card(
        &mut self,
        speech: impl Into<String>,
        reprompt: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), ResponseError> {
        let card = Card::Simple {
            title: title.into(),
            content: content.into(),
        };
        self.finalize(speech.into(), Some(reprompt.into()), Some(card), false)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Consume the builder. `None` if no finalizing call was made.
    pub fn finish(self) -> Option<Response> {
        self.finalized
    }

    fn finalize(
        &mut self,
        speech: String,
        reprompt: Option<String>,
        card: Option<Card>,
        should_end_session: bool,
    ) -> Result<(), ResponseError> {
        if self.finalized.is_some() {
            return Err(ResponseError::AlreadyFinalized);
        }
        self.finalized = Some(Response {
            output_speech: Some(OutputSpeech::plain(speech)),
            card,
            reprompt: reprompt.map(|text| Reprompt {
                output_speech: OutputSpeech::plain(text),
            }),
            should_end_session,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tell_ends_session_without_reprompt() {
        let mut builder = ResponseBuilder::new();
        builder.tell("Goodbye").unwrap();
        let response = builder.finish().unwrap();
        assert_eq!(response.speech_text(), Some("Goodbye"));
        assert!(response.reprompt.is_none());
        assert!(response.card.is_none());
        assert!(response.should_end_session);
    }

    #[test]
    fn ask_keeps_session_open() {
        let mut builder = ResponseBuilder::new();
        builder.ask("What now?", "Still there?").unwrap();
        let response = builder.finish().unwrap();
        assert_eq!(response.reprompt_text(), Some("Still there?"));
        assert!(!response.should_end_session);
    }

    #[test]
    fn second_finalize_is_rejected() {
        let mut builder = ResponseBuilder::new();
        builder.tell_with_card("first", "Title", "first").unwrap();
        assert_eq!(builder.ask("second", "again"), Err(ResponseError::AlreadyFinalized));
        assert_eq!(builder.tell("third"), Err(ResponseError::AlreadyFinalized));
        let response = builder.finish().unwrap();
        assert_eq!(response.speech_text(), Some("first"));
        assert!(response.should_end_session);
    }

    #[test]
    fn untouched_builder_finishes_empty() {
        let builder = ResponseBuilder::new();
        assert!(!builder.is_finalized());
        assert!(builder.finish().is_none());
    }

    #[test]
    fn serializes_platform_shape() {
        let mut builder = ResponseBuilder::new();
        builder
            .ask_with_card("Hello", "Anything else?", "Greeting", "Hello")
            .unwrap();
        let json = serde_json::to_value(builder.finish().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outputSpeech": { "type": "PlainText", "text": "Hello" },
                "card": { "type": "Simple", "title": "Greeting", "content": "Hello" },
                "reprompt": { "outputSpeech": { "type": "PlainText", "text": "Anything else?" } },
                "shouldEndSession": false
            })
        );
    }

    #[test]
    fn silent_response_omits_speech() {
        let json = serde_json::to_value(Response::silent()).unwrap();
        assert_eq!(json, serde_json::json!({ "shouldEndSession": true }));
    }
}
