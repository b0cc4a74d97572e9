//! Error types for the planning pipeline.
//!
//! Every error carries an [`ErrorContext`] naming the stage that failed and,
//! where one is involved, the topic, so callers can report something
//! actionable without re-running the computation.

use std::fmt;

/// Result type for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;

/// Structured context for planner errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The pipeline stage (e.g., "validate_request", "allocate", "pack")
    pub stage: Option<String>,
    /// The topic being processed, if any
    pub topic: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context for a pipeline stage.
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: Some(stage.into()),
            ..Default::default()
        }
    }

    /// Set the topic.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref stage) = self.stage {
            parts.push(format!("stage={}", stage));
        }
        if let Some(ref topic) = self.topic {
            parts.push(format!("topic={}", topic));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for planner operations
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Request parameters or upstream inputs were rejected.
    #[error("Invalid input: {message} {context}")]
    InvalidInput {
        message: String,
        context: ErrorContext,
    },

    /// A precondition was violated part-way through the pipeline.
    #[error("Computation error: {message} {context}")]
    Computation {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file or environment override could not be used.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// The upstream topic classifier failed.
    #[error("Classification error: {message} {context}")]
    Classification {
        message: String,
        context: ErrorContext,
    },

    /// JSON encoding failed.
    #[error("Serialization error: {message} {context}")]
    Serialization {
        message: String,
        context: ErrorContext,
    },
}

impl PlannerError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Replace the error context.
    pub fn with_context(mut self, ctx: ErrorContext) -> Self {
        *self.context_mut() = ctx;
        self
    }

    /// Add or update the stage in the error context.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.context_mut().stage = Some(stage.into());
        self
    }

    /// Add or update the topic in the error context.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.context_mut().topic = Some(topic.into());
        self
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidInput { context, .. }
            | Self::Computation { context, .. }
            | Self::Configuration { context, .. }
            | Self::Classification { context, .. }
            | Self::Serialization { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidInput { context, .. }
            | Self::Computation { context, .. }
            | Self::Configuration { context, .. }
            | Self::Classification { context, .. }
            | Self::Serialization { context, .. } => context,
        }
    }

    /// Whether the caller supplied bad input (as opposed to an internal fault).
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        PlannerError::serialization(err.to_string())
    }
}
