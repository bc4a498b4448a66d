// faultchain/src/lib.rs

//! # faultchain
//!
//! Support library for the lab board: structured, nestable fault
//! handling on a bare-metal target, with the board's peripheral
//! drivers, SI-unit utilities, and terminal I/O built on top of it.
//!
//! The fault runtime is the heart of the crate: [`fault::initialize`]
//! installs the terminal handler, [`fault::run`] brackets the
//! application, and everything that can go wrong raises a typed
//! condition with [`raise!`] that the innermost [`fault::run_guarded`]
//! intercepts. An uncaught fault is fatal by design; the board reports
//! it and halts until reset.
//!
//! ```ignore
//! fault::initialize(&console::CONSOLE_SINK, &platform::STATUS_LED,
//!                   &platform::MACHINE_INTERRUPTS);
//! uart::init(115_200, uart::Parity::None, uart::StopBits::One)?;
//!
//! fault::run(|| {
//!     fault::run_guarded(
//!         || drivers::ds1307::read_datetime(),
//!         |record| {
//!             println!("clock unreachable: {}", record);
//!             Ok(FALLBACK_DATETIME)
//!         },
//!     )
//!     .map(|_| ())
//! });
//! ```
//!
//! The whole runtime assumes a single logical thread of control.
//! Interrupt handlers may feed driver queues (see
//! [`drivers::uart::handle_rx_interrupt`]) but must never raise or
//! enter guards.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod collections;
pub mod console;
pub mod drivers;
pub mod fault;
pub mod platform;
pub mod terminal;
pub mod units;

// Re-export the fault vocabulary used by practically every caller.
pub use fault::{Condition, ErrorRecord, Fault, FaultResult, SourceLocation};

/// Panic handler for firmware builds. Panics are programming errors,
/// not raised faults, but they end the same way: interrupts off,
/// diagnostic out, halt until reset.
#[cfg(all(not(test), target_os = "none"))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use crate::fault::InterruptGate;

    platform::MACHINE_INTERRUPTS.disable();
    error_print!("PANIC: {}", info);
    error_print!("Reset the board to resume operation.");
    platform::halt()
}
