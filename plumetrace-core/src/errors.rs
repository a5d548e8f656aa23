//! Engine error types
//!
//! The classification and backtracking algorithms themselves never fail:
//! missing measurements are skipped, a point outside every polygon is a valid
//! terminal state, and an empty wind sample set leaves the prior estimate in
//! place. What *can* fail is structural misuse of the engine (exhausting a
//! fixed-capacity store, constructing an invalid configuration), and only
//! those surface as `Result`s.
//!
//! Errors are small, `Copy`, and carry `&'static str` context only, so they
//! are safe to return from hot paths on heapless targets.

use thiserror_no_std::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structural errors raised by the engine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A fixed-capacity store is full
    #[error("capacity exceeded for {what}: limit {capacity}")]
    CapacityExceeded {
        /// Which store overflowed
        what: &'static str,
        /// Its compile-time capacity
        capacity: usize,
    },

    /// Configuration value rejected at construction
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// Identifier exceeds the inline storage limit
    #[error("identifier too long: max {max} bytes")]
    IdTooLong {
        /// Maximum identifier length in bytes
        max: usize,
    },
}
