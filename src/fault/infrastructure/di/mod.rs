// faultchain/src/fault/infrastructure/di/mod.rs

//! # Global Handler Slot
//!
//! Holds the process-wide terminal handler installed by
//! [`initialize`](crate::fault::initialize) and provides the accessor
//! the rest of the runtime goes through. The slot is written exactly
//! once per process lifetime; everything else only reads it.

pub mod traits;

use self::traits::{DiagnosticSink, FaultIndicator, InterruptGate};
use super::terminal::TerminalHandler;
use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;

static TERMINAL: Mutex<Option<TerminalHandler<'static>>> = Mutex::new(None);

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Installs the terminal handler, armed.
///
/// # Panics
/// Panics if called more than once.
pub fn install_terminal_handler(
    sink: &'static dyn DiagnosticSink,
    indicator: &'static dyn FaultIndicator,
    interrupts: &'static dyn InterruptGate,
) {
    if INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
        .is_err()
    {
        panic!("fault runtime already initialized");
    }

    *TERMINAL.lock() = Some(TerminalHandler::new(sink, indicator, interrupts));
}

/// Provides access to the installed terminal handler.
///
/// # Panics
/// Panics if the fault runtime has not been initialized.
pub fn with_terminal_handler<F, R>(f: F) -> R
where
    F: FnOnce(&TerminalHandler<'static>) -> R,
{
    let guard = TERMINAL.lock();
    let terminal = guard
        .as_ref()
        .expect("fault runtime not initialized; call fault::initialize first");
    f(terminal)
}

/// Whether [`install_terminal_handler`] has run.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Relaxed)
}
