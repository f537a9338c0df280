use thiserror::Error;

/// Misuse of a [Pathfinder](crate::Pathfinder) or [FloodFiller](crate::FloodFiller).
///
/// An unreachable destination is not an error: searches report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A search was started before a collision predicate was bound.
    #[error("no collision flags bound; call set_flags before searching")]
    MissingFlags,

    /// An algorithm name did not match any known algorithm.
    #[error("unknown algorithm: {0:?}")]
    UnknownAlgorithm(String),
}
