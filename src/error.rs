use thiserror::Error;

/// Errors returned by fallible [`crate::Index`] operations.
///
/// Absent-entry conditions (`remove`/`contains` of an unknown value) are not
/// represented here — they resolve to `false`, not an error. Likewise an
/// empty index never errors on query; see [`crate::Neighbors`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("k must be >= 1, got {0}")]
    InvalidK(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("configuration cannot change after the first insert")]
    ConfigFrozen,
}
