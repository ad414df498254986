//! Demos of what thread-blocking work does to a cooperative scheduler.
//!
//! Two runnable scenarios, each narrating its timing on stdout:
//!
//! - [`shared_context`]: a fixed-size worker pool serving a cooperative task
//!   gets monopolized by blocking calls submitted to the same pool. The
//!   server stops making progress until the blocking calls drain.
//! - [`timeout`]: three variants of a slow call under a timeout, showing that
//!   a cooperative cancellation signal cannot interrupt blocking work, that a
//!   disposable-worker wrapper at least unblocks the caller, and that
//!   suspension-aware work cancels cleanly.
//!
//! The [`wait`] module holds the primitives the demos are built from. Nothing
//! here is meant as infrastructure; every function is a deliberately minimal
//! reproduction of a known pitfall.

pub mod shared_context;
pub mod timeout;
pub mod wait;
