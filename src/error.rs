use thiserror::Error;

/// Errors returned by fallible [`SkipList`](crate::SkipList) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The destination handed to [`SkipList::copy_to`](crate::SkipList::copy_to)
    /// cannot hold every stored value.
    #[error("destination holds {available} values past the start index, {needed} are required")]
    InsufficientCapacity {
        /// Number of values stored in the list.
        needed: usize,
        /// Slots left in the destination after the start index.
        available: usize,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
