// faultchain/src/console.rs

//! Console output over the board UART.

use crate::drivers::uart;
use crate::fault::DiagnosticSink;
use core::fmt;

/// Formatted output entry point used by the macros.
pub fn print(args: fmt::Arguments) {
    use core::fmt::Write;
    Stdout.write_fmt(args).unwrap();
}

/// Sends a string directly.
pub fn print_str(s: &str) {
    uart::send_str(s);
}

/// Standard output handle implementing `Write` for formatted output.
struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print_str(s);
        Ok(())
    }
}

/// The console as the fault runtime's diagnostic sink.
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn write_str(&self, s: &str) {
        print_str(s);
    }
}

/// Sink instance to hand to [`fault::initialize`](crate::fault::initialize).
pub static CONSOLE_SINK: ConsoleSink = ConsoleSink;

/// print macro - formatted output
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::console::print(format_args!($($arg)*))
    };
}

/// println macro - formatted output plus newline
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\r\n")
    };
    ($($arg:tt)*) => {
        $crate::print!("{}\r\n", format_args!($($arg)*))
    };
}

/// Error output macro - red highlighted
#[macro_export]
macro_rules! error_print {
    ($($arg:tt)*) => {{
        $crate::print!("\x1b[31m[ERROR] ");
        $crate::print!($($arg)*);
        $crate::print!("\x1b[0m\r\n");
    }};
}
