// faultchain/src/fault/api.rs

//! # Public API for the Fault Runtime
//!
//! Provides the stable surface consumed by drivers, the unit library,
//! the terminal, and the application: initialization, the top-level
//! guarded entry point, and the raise/guard operations re-exported
//! from the inner modules.

use super::ds::FaultResult;
use super::infrastructure::di;
use super::infrastructure::terminal::TerminalState;

pub use super::guard::{run_guarded, run_guarded_capture};
pub use super::infrastructure::di::traits::{DiagnosticSink, FaultIndicator, InterruptGate};
pub use super::raise::{operation_of, raise, raise_with_message, reraise};

/// Initializes the fault runtime: installs the terminal handler in the
/// `Armed` state with the given collaborators.
///
/// Must run exactly once, before any guard or raise is used and before
/// [`run`] is entered. The whole runtime assumes a single logical
/// thread of control; interrupt service routines must never raise or
/// enter guards (see the crate documentation).
///
/// # Panics
/// Panics if called more than once.
pub fn initialize(
    sink: &'static dyn DiagnosticSink,
    indicator: &'static dyn FaultIndicator,
    interrupts: &'static dyn InterruptGate,
) {
    di::install_terminal_handler(sink, indicator, interrupts);
}

/// Whether [`initialize`] has run.
pub fn is_initialized() -> bool {
    di::is_initialized()
}

/// Runs `body` with the terminal handler as the bottom of the guard
/// chain. A fault that no guard intercepts is fatal: the terminal
/// handler trips (interrupts off, indicator latched, diagnostic
/// emitted) and the system halts until external reset.
///
/// # Panics
/// Panics if the runtime is not initialized when a fault must be
/// delivered to the terminal handler.
pub fn run<T>(body: impl FnOnce() -> FaultResult<T>) -> T {
    match body() {
        Ok(value) => value,
        Err(fault) => {
            let record = fault.into_record();
            di::with_terminal_handler(|terminal| terminal.trip(&record));
            crate::platform::halt()
        }
    }
}

/// Current state of the installed terminal handler.
///
/// # Panics
/// Panics if the runtime is not initialized.
pub fn terminal_state() -> TerminalState {
    di::with_terminal_handler(|terminal| terminal.state())
}
