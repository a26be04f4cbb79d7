//! ---
//! engage_section: "05-logging"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Structured logging adapters and sinks."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;
pub mod subscriber;

pub use subscriber::{init_tracing, ConsoleTarget, LogFormat, LoggingConfig, LOG_ENV};

#[doc(hidden)]
pub use tracing;

/// Initialize a baseline tracing subscriber suitable for development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Descriptor context attached to events by the `eg_*` macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Catalog type name, e.g. `Group`.
    pub descriptor: Option<&'a str>,
    /// Group id the event concerns.
    pub group: Option<&'a str>,
    /// Wire key of the field involved.
    pub field: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a descriptor type name.
    pub fn with_descriptor(mut self, descriptor: &'a str) -> Self {
        self.descriptor = Some(descriptor);
        self
    }

    /// Attach a group id.
    pub fn with_group(mut self, group: &'a str) -> Self {
        self.group = Some(group);
        self
    }

    /// Attach a field name.
    pub fn with_field(mut self, field: &'a str) -> Self {
        self.field = Some(field);
        self
    }
}

/// Outcome of an operation reported through [`log_operation_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed or was rejected.
    Fault,
}

impl OperationOutcome {
    /// Label written to the `outcome` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationOutcome::Success => "success",
            OperationOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized operation event, INFO on success and ERROR on fault.
pub fn log_operation_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: OperationOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    let label = outcome.as_str();
    match outcome {
        OperationOutcome::Success => crate::eg_event!(
            Level::INFO,
            context = ctx,
            fields(event, outcome = label),
            "{}",
            message
        ),
        OperationOutcome::Fault => crate::eg_event!(
            Level::ERROR,
            context = ctx,
            fields(event, outcome = label),
            "{}",
            message
        ),
    }
}
