// faultchain/src/fault/mod.rs

//! # Structured Fault Handling
//!
//! Exception-like control flow for a host without a native exception
//! mechanism in its ancestry: typed fault conditions, nestable scoped
//! guards, re-raising, and a terminal handler whose only outcome is a
//! diagnostic and a halt.
//!
//! A fault is raised with [`raise!`](crate::raise), travels outward as
//! the `Err` payload of [`FaultResult`], and is intercepted by the
//! innermost [`run_guarded`] whose body is still executing — or, if
//! none is, by the terminal handler installed by [`initialize`].
//!
//! The machinery is single-threaded by contract: guards, raises, and
//! the pending record are touched only from the normal execution path.
//! Interrupt service routines must never raise; a non-local exit from
//! interrupt context would abandon partially-updated hardware state.
//! This precondition is documented, not enforced.

mod api;
mod ds;
mod guard;
mod infrastructure;
mod raise;

pub use self::api::*;

// Re-export the data structures users of the API need directly.
pub use self::ds::{Condition, ErrorRecord, Fault, FaultResult, SourceLocation};
pub use self::infrastructure::terminal::{TerminalHandler, TerminalState};
