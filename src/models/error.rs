use thiserror::Error;

/// Reasons an inbound webhook body cannot be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("payload is not a valid event envelope: {0}")]
    Malformed(String),

    #[error("envelope carries no event")]
    MissingEvent,

    #[error("message event is missing `{0}`")]
    MissingField(&'static str),
}
