//! Skill lifecycle dispatcher.
//!
//! Maps incoming lifecycle and intent events onto the handlers registered in
//! a [`HandlerTable`]. For any single call the session-started handler (when
//! the session is new) runs strictly before the launch or intent handler.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::SkillConfig;
use crate::metrics::DispatchMetrics;
use crate::request::{
    Event, EventKind, IntentRequest, LaunchRequest, RequestEnvelope, SessionEndedRequest,
    SessionStartedRequest,
};
use crate::response::{Response, ResponseBuilder, ResponseEnvelope, ResponseError};
use crate::session::Session;

/// Failure raised inside a registered handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("missing slot: {0}")]
    MissingSlot(String),
    #[error(transparent)]
    Response(#[from] ResponseError),
    #[error("{0}")]
    Other(String),
}

/// Failure of one dispatch, reported to the transport layer.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request was addressed to a different application. No handler ran.
    #[error("application id mismatch: expected {expected}, got {actual:?}")]
    Authorization {
        expected: String,
        actual: Option<String>,
    },
    #[error("{kind} handler failed: {source}")]
    Handler {
        kind: EventKind,
        #[source]
        source: HandlerError,
    },
}

pub type LifecycleHandler<R> =
    Box<dyn Fn(&R, &mut Session) -> Result<(), HandlerError> + Send + Sync>;
pub type RespondingHandler<R> =
    Box<dyn Fn(&R, &mut Session, &mut ResponseBuilder) -> Result<(), HandlerError> + Send + Sync>;

/// Registered handlers. Immutable once built.
#[derive(Default)]
pub struct HandlerTable {
    on_session_started: Option<LifecycleHandler<SessionStartedRequest>>,
    on_launch: Option<RespondingHandler<LaunchRequest>>,
    on_session_ended: Option<LifecycleHandler<SessionEndedRequest>>,
    intents: HashMap<String, RespondingHandler<IntentRequest>>,
}

impl HandlerTable {
    pub fn builder() -> HandlerTableBuilder {
        HandlerTableBuilder::default()
    }

    pub fn has_intent(&self, name: &str) -> bool {
        self.intents.contains_key(name)
    }

    /// Registered intent names, sorted.
    pub fn intent_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.intents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerTable")
            .field("on_session_started", &self.on_session_started.is_some())
            .field("on_launch", &self.on_launch.is_some())
            .field("on_session_ended", &self.on_session_ended.is_some())
            .field("intents", &self.intent_names())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct HandlerTableBuilder {
    table: HandlerTable,
}

impl HandlerTableBuilder {
    pub fn on_session_started<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SessionStartedRequest, &mut Session) -> Result<(), HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.table.on_session_started = Some(Box::new(handler));
        self
    }

    pub fn on_launch<F>(mut self, handler: F) -> Self
    where
        F: Fn(&LaunchRequest, &mut Session, &mut ResponseBuilder) -> Result<(), HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.table.on_launch = Some(Box::new(handler));
        self
    }

    pub fn on_session_ended<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SessionEndedRequest, &mut Session) -> Result<(), HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.table.on_session_ended = Some(Box::new(handler));
        self
    }

    /// Register a handler for an intent name. Re-registering a name replaces it.
    pub fn intent<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&IntentRequest, &mut Session, &mut ResponseBuilder) -> Result<(), HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.table.intents.insert(name.into(), Box::new(handler));
        self
    }

    pub fn build(self) -> HandlerTable {
        self.table
    }
}

/// Routes events to handlers and produces the outbound response.
#[derive(Debug)]
pub struct Dispatcher {
    config: SkillConfig,
    table: Arc<HandlerTable>,
    metrics: DispatchMetrics,
}

impl Dispatcher {
    pub fn new(config: SkillConfig, table: impl Into<Arc<HandlerTable>>) -> Self {
        Self {
            config,
            table: table.into(),
            metrics: DispatchMetrics::new(),
        }
    }

    pub fn config(&self) -> &SkillConfig {
        &self.config
    }

    pub fn table(&self) -> &Arc<HandlerTable> {
        &self.table
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Handle a full request envelope.
    ///
    /// Events that produce no response (session end, handlers that never
    /// finalize) are answered with [`Response::silent`]. Session attributes
    /// are echoed back so the platform can return them on the next turn.
    pub fn handle(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, DispatchError> {
        let RequestEnvelope {
            mut session,
            request,
            ..
        } = envelope;
        let response = self
            .handle_event(&request, &mut session)?
            .unwrap_or_else(Response::silent);
        Ok(ResponseEnvelope::new(response, session.attributes))
    }

    /// Dispatch one event.
    ///
    /// Returns `Ok(None)` when the event produced no spoken response.
    pub fn handle_event(
        &self,
        event: &Event,
        session: &mut Session,
    ) -> Result<Option<Response>, DispatchError> {
        self.metrics.inc_request();
        self.authorize(session)?;

        let kind = event.kind();
        info!(
            request_id = event.request_id(),
            session_id = %session.session_id,
            kind = %kind,
            "dispatching request"
        );

        match event {
            Event::SessionStarted(request) => {
                self.session_started(request, session)?;
                Ok(None)
            }
            Event::Launch(request) => {
                if let Err(e) = self.start_if_new(event, session) {
                    return self.recover(e);
                }
                self.metrics.inc_kind(kind);
                match &self.table.on_launch {
                    Some(handler) => self.respond(kind, |builder| handler(request, session, builder)),
                    None => {
                        warn!(request_id = %request.request_id, "no launch handler registered");
                        Ok(Some(self.fallback()))
                    }
                }
            }
            Event::Intent(request) => {
                if let Err(e) = self.start_if_new(event, session) {
                    return self.recover(e);
                }
                self.metrics.inc_kind(kind);
                let name = request.intent.name.as_str();
                match self.table.intents.get(name) {
                    Some(handler) => self.respond(kind, |builder| handler(request, session, builder)),
                    None => {
                        self.metrics.inc_unrecognized_intent();
                        warn!(intent = name, request_id = %request.request_id, "unrecognized intent");
                        Ok(Some(self.fallback()))
                    }
                }
            }
            Event::SessionEnded(request) => {
                self.metrics.inc_kind(kind);
                if let Some(handler) = &self.table.on_session_ended {
                    match handler(request, session) {
                        Ok(()) => debug!(
                            session_id = %session.session_id,
                            reason = request.reason.as_deref().unwrap_or("unspecified"),
                            "session ended"
                        ),
                        Err(e) => {
                            self.metrics.inc_handler_failed();
                            error!(session_id = %session.session_id, "session ended handler failed: {}", e);
                        }
                    }
                }
                Ok(None)
            }
        }
    }

    fn authorize(&self, session: &Session) -> Result<(), DispatchError> {
        let Some(expected) = &self.config.application_id else {
            return Ok(());
        };
        let actual = session.application_id();
        if actual == Some(expected.as_str()) {
            return Ok(());
        }

        self.metrics.inc_authorization_rejected();
        error!(
            expected = %expected,
            actual = actual.unwrap_or("<none>"),
            "rejecting request for foreign application"
        );
        Err(DispatchError::Authorization {
            expected: expected.clone(),
            actual: actual.map(str::to_string),
        })
    }

    /// Run the session-started handler ahead of a launch/intent on a new session.
    fn start_if_new(&self, event: &Event, session: &mut Session) -> Result<(), DispatchError> {
        if !session.is_new {
            return Ok(());
        }
        let locale = match event {
            Event::Launch(r) => &r.locale,
            Event::Intent(r) => &r.locale,
            Event::SessionStarted(_) | Event::SessionEnded(_) => return Ok(()),
        };
        let started = SessionStartedRequest {
            request_id: event.request_id().to_string(),
            timestamp: event.timestamp(),
            locale: locale.clone(),
        };
        self.session_started(&started, session)
    }

    fn session_started(
        &self,
        request: &SessionStartedRequest,
        session: &mut Session,
    ) -> Result<(), DispatchError> {
        self.metrics.inc_kind(EventKind::SessionStarted);
        // Started phase is done for this session, whatever the handler does.
        session.is_new = false;
        let Some(handler) = &self.table.on_session_started else {
            return Ok(());
        };
        debug!(session_id = %session.session_id, request_id = %request.request_id, "session started");
        match handler(request, session) {
            Ok(()) => Ok(()),
            Err(source) => {
                self.metrics.inc_handler_failed();
                error!(session_id = %session.session_id, "session started handler failed: {}", source);
                Err(DispatchError::Handler {
                    kind: EventKind::SessionStarted,
                    source,
                })
            }
        }
    }

    /// Run a responding handler against a fresh builder.
    fn respond<F>(&self, kind: EventKind, run: F) -> Result<Option<Response>, DispatchError>
    where
        F: FnOnce(&mut ResponseBuilder) -> Result<(), HandlerError>,
    {
        let mut builder = ResponseBuilder::new();
        match run(&mut builder) {
            Ok(()) => {
                let response = builder.finish();
                if response.is_none() {
                    warn!(kind = %kind, "handler produced no response");
                }
                Ok(response)
            }
            Err(source) => {
                self.metrics.inc_handler_failed();
                error!(kind = %kind, "handler failed: {}", source);
                self.recover(DispatchError::Handler { kind, source })
            }
        }
    }

    /// In hardened mode, answer a handler failure with the configured error speech.
    fn recover(&self, err: DispatchError) -> Result<Option<Response>, DispatchError> {
        match err {
            DispatchError::Handler { .. } if self.config.recover_handler_errors => {
                Ok(Some(Response::plain_text(&self.config.error_speech)))
            }
            err => Err(err),
        }
    }

    fn fallback(&self) -> Response {
        Response::plain_text(&self.config.fallback_speech)
    }
}
