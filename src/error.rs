//! Error types and result alias for the crate.

use thiserror::Error;

use crate::physics::BallId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Board parameters violate a layout invariant. Raised before any body exists.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A ball already attributed to one bin reported a landing in another.
    #[error("ball {ball} already counted in bin {first}, dropped attribution to bin {second}")]
    DuplicateAttribution {
        ball: BallId,
        first: usize,
        second: usize,
    },

    #[error("bin {bin} out of range (board has {bin_count} bins)")]
    UnknownBin { bin: usize, bin_count: usize },

    #[error("physics adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("simulation is not running")]
    NotRunning,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
