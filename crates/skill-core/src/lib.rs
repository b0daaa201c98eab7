//! skill-core - voice skill request dispatching.
//!
//! Request/response types, the write-once response builder, and the
//! lifecycle dispatcher that routes events to registered handlers.

pub mod config;
pub mod dispatcher;
pub mod metrics;
pub mod request;
pub mod response;
pub mod session;

pub use config::SkillConfig;
pub use dispatcher::{DispatchError, Dispatcher, HandlerError, HandlerTable, HandlerTableBuilder};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use request::{Event, EventKind, Intent, IntentRequest, RequestEnvelope};
pub use response::{Response, ResponseBuilder, ResponseEnvelope, ResponseError};
pub use session::Session;
