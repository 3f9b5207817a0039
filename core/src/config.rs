//! Parser configuration: frame-stack depth and buffer sizing.
//!
//! This module provides [`ParseConfig`] for controlling the shape of a
//! [`crate::Parser`]'s frame stack before any bytes are dispatched.
//!
//! # Depth
//!
//! `expected_depth` fixes the frame stack's capacity once and for all: there
//! is no growth, no "disable the limit" escape hatch like `serde_json`'s
//! recursion guard offers, because the frame stack *is* the parser's working
//! memory, not a safety net bolted on top of unbounded recursion. Callers
//! parsing torrent metainfo typically
//! know their expected nesting (a `.torrent` file rarely nests more than a
//! handful of levels); set `expected_depth` generously above that and the
//! cost is a handful of lazily-allocated frames, not a real limit.
//!
//! # Example
//!
//! ```
//! use bencode_core::ParseConfig;
//!
//! let config = ParseConfig::new(8);
//! assert_eq!(config.expected_depth, 8);
//! assert_eq!(config.initial_buffer_capacity, 20);
//!
//! let config = ParseConfig::new(8).with_initial_buffer_capacity(256);
//! assert_eq!(config.initial_buffer_capacity, 256);
//! ```

/// Configuration for a [`crate::Parser`]'s frame stack.
///
/// # Default Values
///
/// | Setting | Default | Rationale |
/// |---------|---------|-----------|
/// | `initial_buffer_capacity` | 20 | Matches the reference implementation's lazy allocation size |
///
/// `expected_depth` has no default — it must be supplied explicitly at
/// construction (it is the frame stack's capacity, not a tunable safety
/// margin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Maximum nesting depth the frame stack can hold.
    ///
    /// Pushing past this raises [`crate::Error::DepthExceeded`]; dispatching
    /// at all when depth already equals this value fails immediately.
    pub expected_depth: usize,

    /// Initial capacity, in bytes, lazily allocated for a frame's `strval`
    /// and `key` buffers the first time that depth is used.
    ///
    /// Default: 20.
    pub initial_buffer_capacity: usize,
}

impl ParseConfig {
    /// Creates a configuration with the given depth and the default initial
    /// buffer capacity (20 bytes).
    #[inline]
    pub const fn new(expected_depth: usize) -> Self {
        Self {
            expected_depth,
            initial_buffer_capacity: 20,
        }
    }

    /// Sets the initial per-frame buffer capacity.
    ///
    /// Useful to pre-size for workloads with known-large strings (e.g.
    /// piece hashes or file lists in torrent metainfo) to avoid repeated
    /// reallocation during the first parse at a given depth.
    #[inline]
    pub const fn with_initial_buffer_capacity(mut self, capacity: usize) -> Self {
        self.initial_buffer_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ParseConfig::new(16);
        assert_eq!(config.expected_depth, 16);
        assert_eq!(config.initial_buffer_capacity, 20);
    }

    #[test]
    fn builder() {
        let config = ParseConfig::new(16).with_initial_buffer_capacity(64);
        assert_eq!(config.initial_buffer_capacity, 64);
    }
}
