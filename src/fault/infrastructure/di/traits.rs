// faultchain/src/fault/infrastructure/di/traits.rs

//! # Collaborator Traits
//!
//! Interfaces for the hardware-facing collaborators of the terminal
//! handler. Keeping them behind traits lets the board wiring inject the
//! real console, status LED, and interrupt control, and lets tests
//! inject fakes instead of relying on hidden process-wide state.

/// Byte-stream sink for the terminal handler's fatal diagnostic.
///
/// The fault core decides *which* fields to emit; all rendering beyond
/// that belongs to the sink's owner.
pub trait DiagnosticSink: Send + Sync {
    fn write_str(&self, s: &str);
}

/// Single-bit fault output, set once and irreversibly when the
/// terminal handler halts the system.
pub trait FaultIndicator: Send + Sync {
    fn set_fault(&self);
}

/// Gate for asynchronous interrupt delivery. `disable` is called on
/// the way into the halted state so no interrupt handler runs while
/// the system reports its final diagnostic.
pub trait InterruptGate: Send + Sync {
    fn disable(&self);
}
