// faultchain/src/fault/infrastructure/terminal.rs

//! # Terminal Handler
//!
//! The permanent root of the handler chain. It is installed once, in
//! the `Armed` state, and a fault that no guard intercepts trips it:
//! interrupts are disabled, the fault indicator is latched, a
//! deterministic diagnostic is emitted, and the system stops making
//! progress. `Halted` is terminal for the process lifetime; the only
//! way out is an external reset, which re-initializes everything and
//! re-arms the handler.

use super::di::traits::{DiagnosticSink, FaultIndicator, InterruptGate};
use crate::fault::ds::ErrorRecord;
use core::fmt::{self, Write};
use core::sync::atomic::{AtomicBool, Ordering};

/// State of the terminal handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TerminalState {
    /// Installed and waiting; no uncaught fault has occurred.
    Armed,
    /// An uncaught fault was delivered; no further progress is made.
    Halted,
}

/// The root handler of the chain.
pub struct TerminalHandler<'a> {
    sink: &'a dyn DiagnosticSink,
    indicator: &'a dyn FaultIndicator,
    interrupts: &'a dyn InterruptGate,
    halted: AtomicBool,
}

impl<'a> TerminalHandler<'a> {
    /// Creates the handler in the `Armed` state.
    pub const fn new(
        sink: &'a dyn DiagnosticSink,
        indicator: &'a dyn FaultIndicator,
        interrupts: &'a dyn InterruptGate,
    ) -> Self {
        Self {
            sink,
            indicator,
            interrupts,
            halted: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> TerminalState {
        if self.is_halted() {
            TerminalState::Halted
        } else {
            TerminalState::Armed
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::Relaxed)
    }

    /// Delivers an uncaught fault: performs the `Armed` → `Halted`
    /// transition and emits the diagnostic.
    ///
    /// The transition happens at most once per process lifetime; a
    /// second delivery is a no-op and returns `false`. The caller is
    /// expected to stop all forward progress afterwards (see
    /// [`halt`](crate::platform::halt)); this method is separate from
    /// the forever-loop so the transition itself stays observable.
    pub fn trip(&self, record: &ErrorRecord) -> bool {
        if self
            .halted
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            return false;
        }

        // No interrupt handler may run while the final diagnostic goes
        // out; the indicator is latched before any byte is written so
        // the fault is visible even if the sink is broken.
        self.interrupts.disable();
        self.indicator.set_fault();
        self.emit_diagnostic(record);
        true
    }

    fn emit_diagnostic(&self, record: &ErrorRecord) {
        let mut out = SinkWriter(self.sink);
        let _ = write!(
            out,
            "\r\n\r\nUNCAUGHT FAULT: {} (code {})\r\n",
            record.name,
            record.condition.code()
        );
        match record.message {
            Some(message) => {
                let _ = write!(out, "  message: {}\r\n", message);
            }
            None => {
                let _ = write!(out, "  message: (none)\r\n");
            }
        }
        let _ = write!(
            out,
            "  at {}:{} in {}\r\n",
            record.location.file, record.location.line, record.location.operation
        );
        let _ = write!(
            out,
            "The fault was not caught. Reset the board to resume operation.\r\n"
        );
    }
}

/// `core::fmt` adapter over the injected sink.
struct SinkWriter<'a>(&'a dyn DiagnosticSink);

impl Write for SinkWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::di::traits::{DiagnosticSink, FaultIndicator, InterruptGate};
    use super::{TerminalHandler, TerminalState};
    use crate::fault::ds::{Condition, ErrorRecord, SourceLocation};
    use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::string::String;
    use std::sync::Mutex;

    struct RecordingSink {
        out: Mutex<String>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                out: Mutex::new(String::new()),
            }
        }

        fn contents(&self) -> String {
            self.out.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn write_str(&self, s: &str) {
            self.out.lock().unwrap().push_str(s);
        }
    }

    struct FakeIndicator {
        set: AtomicBool,
    }

    impl FaultIndicator for FakeIndicator {
        fn set_fault(&self) {
            self.set.store(true, Ordering::SeqCst);
        }
    }

    struct FakeGate {
        disables: AtomicUsize,
    }

    impl InterruptGate for FakeGate {
        fn disable(&self) {
            self.disables.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn record(message: Option<&'static str>) -> ErrorRecord {
        ErrorRecord::new(
            Condition::BufferOverflow,
            message,
            SourceLocation {
                file: "src/drivers/uart.rs",
                line: 42,
                operation: "faultchain::drivers::uart::read_byte",
            },
        )
    }

    #[test]
    fn trip_transitions_armed_to_halted_exactly_once() {
        let sink = RecordingSink::new();
        let indicator = FakeIndicator {
            set: AtomicBool::new(false),
        };
        let gate = FakeGate {
            disables: AtomicUsize::new(0),
        };
        let terminal = TerminalHandler::new(&sink, &indicator, &gate);
        assert_eq!(terminal.state(), TerminalState::Armed);

        assert!(terminal.trip(&record(Some("buffer full"))));
        assert_eq!(terminal.state(), TerminalState::Halted);
        assert!(indicator.set.load(Ordering::SeqCst));
        assert_eq!(gate.disables.load(Ordering::SeqCst), 1);

        // A second delivery changes nothing and emits nothing.
        let before = sink.contents();
        assert!(!terminal.trip(&record(None)));
        assert_eq!(sink.contents(), before);
        assert_eq!(gate.disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn diagnostic_names_the_fault_and_its_site() {
        let sink = RecordingSink::new();
        let indicator = FakeIndicator {
            set: AtomicBool::new(false),
        };
        let gate = FakeGate {
            disables: AtomicUsize::new(0),
        };
        let terminal = TerminalHandler::new(&sink, &indicator, &gate);
        terminal.trip(&record(Some("buffer full")));

        let out = sink.contents();
        assert!(out.contains("UNCAUGHT FAULT: BufferOverflow (code 4)"));
        assert!(out.contains("message: buffer full"));
        assert!(out.contains("at src/drivers/uart.rs:42 in faultchain::drivers::uart::read_byte"));
        assert!(out.contains("Reset the board"));
    }

    #[test]
    fn absent_message_is_reported_as_none() {
        let sink = RecordingSink::new();
        let indicator = FakeIndicator {
            set: AtomicBool::new(false),
        };
        let gate = FakeGate {
            disables: AtomicUsize::new(0),
        };
        let terminal = TerminalHandler::new(&sink, &indicator, &gate);
        terminal.trip(&record(None));
        assert!(sink.contents().contains("message: (none)"));
    }
}
