
use thiserror::Error;

/// The ways a rack operation can fail. Both are raised where they are
/// detected and never retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RackError {
    /// Adding a tile would push the rack past `RACK_SIZE`.
    #[error("rack is full")]
    Capacity,
    /// The requested letter is not on the rack and no blank is left to
    /// stand in for it.
    #[error("no tile for '{0}' in the rack")]
    NotFound(char),
}
