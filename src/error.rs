//a Imports
use thiserror::Error;

//a Error
//tp Error
/// The error type returned by every fallible operation in this crate
///
/// Every domain failure mode is a value, never a panic; the catalog
/// loader is the sole exception that tolerates partial failure (it
/// skips malformed lines rather than returning an error for them).
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file could not be opened or read
    #[error("catalog I/O error: {0}")]
    CatalogIoError(#[from] std::io::Error),

    /// A JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A postcard binary (de)serialization failed
    #[cfg(feature = "postcard")]
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),

    /// A CSV record failed to parse
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration value was out of range or internally inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fewer than four viable observed stars were found in a frame
    #[error("insufficient stars in frame: found {found}, need at least {needed}")]
    InsufficientStars {
        /// Number of viable observed stars actually found
        found: usize,
        /// Minimum number required (always 4)
        needed: usize,
    },

    /// Every quadruple was exhausted without a single candidate surviving
    /// pruning for at least one observed star
    #[error("no catalog match found for any candidate quadruple")]
    NoMatch,

    /// Pruning converged but left more than one candidate for some slot
    #[error("ambiguous match: slot {slot} has {candidates} surviving candidates")]
    Ambiguous {
        /// Which observed-star slot (0..3) is ambiguous
        slot: usize,
        /// How many catalog candidates remain for it
        candidates: usize,
    },

    /// The three matched stars used for triangulation are coplanar with
    /// the origin (their unit vectors are linearly dependent)
    #[error("degenerate triangulation: matched stars are coplanar")]
    Degenerate,

    /// A named star could not be found in the catalog
    #[error("could not find star with name")]
    FailedToFindName,

    /// A star id could not be found in the (sorted) catalog
    #[error("could not find star with id {0}")]
    FailedToFindId(usize),
}
