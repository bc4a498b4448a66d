// faultchain/src/terminal.rs

//! # Terminal Emulator Support
//!
//! ANSI styling for the serial terminal plus buffered line input and
//! validated numeric prompts. Output goes through the console macros;
//! input comes from the UART receive queue and is echoed back.

use crate::drivers::uart;
use crate::fault::{Condition, FaultResult};
use crate::{print, raise};
use core::str;

/// The DEL byte terminals send for backspace.
const DEL: u8 = 0x7F;

/// Colors understood by terminal emulators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    Default = 9,
}

/// Styles understood by terminal emulators.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Style {
    Reset = 0,
    Bold = 1,
    Dim = 2,
    Italic = 3,
    Underline = 4,
    Blinking = 5,
    Reverse = 6,
    Hidden = 8,
    Strikethrough = 9,
}

/// Sets the foreground color of the terminal emulator.
pub fn set_foreground(color: Color) {
    print!("\x1b[3{}m", color as u8);
}

/// Sets the background color of the terminal emulator.
pub fn set_background(color: Color) {
    print!("\x1b[4{}m", color as u8);
}

/// Sets both terminal colors.
pub fn set_colors(foreground: Color, background: Color) {
    set_foreground(foreground);
    set_background(background);
}

/// Sets the style of the terminal emulator.
pub fn set_style(style: Style) {
    print!("\x1b[{}m", style as u8);
}

/// Reads one byte and echoes it back.
pub fn read_char() -> u8 {
    let byte = uart::read_byte();
    uart::send_byte(byte);
    byte
}

/// Reads a line into `buf`, echoing as it goes. DEL rubs out the
/// previous character; CR or LF ends the line (neither is stored).
///
/// Raises [`Condition::BufferOverflow`] when the line outgrows `buf`
/// and [`Condition::MalformedInput`] when the received bytes are not
/// valid text.
pub fn read_line(buf: &mut [u8]) -> FaultResult<&str> {
    let mut len = 0;
    loop {
        let byte = uart::read_byte();
        match byte {
            b'\r' | b'\n' => break,
            DEL => {
                // No rubbing out past the start of the line.
                if len > 0 {
                    len -= 1;
                    uart::send_byte(DEL);
                }
            }
            _ => {
                if len >= buf.len() {
                    raise!(
                        Condition::BufferOverflow,
                        "terminal: line exceeds the input buffer"
                    );
                }
                buf[len] = byte;
                len += 1;
                uart::send_byte(byte);
            }
        }
    }
    uart::send_str("\r\n");

    match str::from_utf8(&buf[..len]) {
        Ok(line) => Ok(line),
        Err(_) => raise!(Condition::MalformedInput, "terminal: input is not valid text"),
    }
}

/// Prompts for an unsigned number within `[min, max]`, echoing the
/// range after the label.
///
/// Raises [`Condition::MalformedInput`] when the reply does not parse
/// and [`Condition::OutOfRange`] when it lies outside the bounds.
pub fn prompt_unsigned(label: &str, min: u32, max: u32) -> FaultResult<u32> {
    print!("{} [{}-{}]: ", label, min, max);

    // A decimal u32 is at most 10 digits.
    let mut buf = [0u8; 12];
    let line = read_line(&mut buf)?;
    parse_unsigned(line, min, max)
}

fn parse_unsigned(line: &str, min: u32, max: u32) -> FaultResult<u32> {
    let value: u32 = match line.trim().parse() {
        Ok(value) => value,
        Err(_) => raise!(Condition::MalformedInput, "prompt: not an unsigned number"),
    };
    if value < min || value > max {
        raise!(Condition::OutOfRange, "prompt: value outside the requested range");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::parse_unsigned;
    use crate::fault::Condition;

    #[test]
    fn parses_a_plain_decimal() {
        assert_eq!(parse_unsigned("42", 0, 100).unwrap(), 42);
        assert_eq!(parse_unsigned(" 7 ", 0, 100).unwrap(), 7);
    }

    #[test]
    fn garbage_raises_malformed_input() {
        let record = parse_unsigned("4x2", 0, 100).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::MalformedInput);

        let record = parse_unsigned("", 0, 100).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::MalformedInput);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert_eq!(parse_unsigned("5", 5, 10).unwrap(), 5);
        assert_eq!(parse_unsigned("10", 5, 10).unwrap(), 10);

        let record = parse_unsigned("11", 5, 10).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::OutOfRange);
        let record = parse_unsigned("4", 5, 10).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::OutOfRange);
    }
}
