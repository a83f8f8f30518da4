use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] roster_core::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(
        "No backend endpoint configured. Pass --endpoint or set ROSTER_API_URL."
    )]
    MissingEndpoint,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Invalid trip id: {0}")]
    InvalidTripId(String),
    #[error("No trip {0} on this date")]
    TripNotFound(String),
    #[error("Invalid instant {0:?}: use RFC 3339 or HH:MM")]
    InvalidInstant(String),
    #[error("Unknown delay reason {0:?}: use TRAFFIC, ACCIDENT, BREAKDOWN, or OTHER")]
    UnknownDelayReason(String),
    #[error("Nothing to change: pass at least one substitution or adjustment flag")]
    NothingToChange,
}
