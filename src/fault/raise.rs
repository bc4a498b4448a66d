// faultchain/src/fault/raise.rs

//! # Raise Operations
//!
//! Constructing a fault and transferring control to the innermost
//! active guard. The transfer is the language's own error propagation:
//! a raise produces a [`Fault`] that the `raise!` macro immediately
//! returns as `Err`, and every frame between the raise site and the
//! intercepting guard forwards it with `?`. No code after a `raise!` on
//! the same control path executes.
//!
//! These operations may only be used from the normal execution path,
//! never from an interrupt service routine.

use super::ds::{Condition, ErrorRecord, Fault, SourceLocation};

/// Captures a record without a message and wraps it as an in-flight fault.
///
/// Prefer the [`raise!`](crate::raise) macro, which also captures the
/// source location and performs the early return.
pub fn raise(condition: Condition, location: SourceLocation) -> Fault {
    Fault::new(ErrorRecord::new(condition, None, location))
}

/// Captures a record with a message and wraps it as an in-flight fault.
pub fn raise_with_message(
    condition: Condition,
    message: &'static str,
    location: SourceLocation,
) -> Fault {
    Fault::new(ErrorRecord::new(condition, Some(message), location))
}

/// Forwards a previously captured record, all fields preserved verbatim.
///
/// This lets a handler inspect a fault and pass it on unchanged to the
/// enclosing scope.
pub fn reraise(record: ErrorRecord) -> Fault {
    Fault::new(record)
}

/// Trims the marker-function suffix (and any closure frames the raise
/// site sits in) off a `type_name_of_val` result, leaving the path of
/// the enclosing operation.
#[doc(hidden)]
pub fn operation_of(marker: &'static str) -> &'static str {
    let mut name = marker.strip_suffix("::__operation").unwrap_or(marker);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}

/// Captures the current source location: file, line, and the path of
/// the enclosing operation.
#[macro_export]
macro_rules! source_location {
    () => {{
        fn __operation() {}
        $crate::fault::SourceLocation {
            file: file!(),
            line: line!(),
            operation: $crate::fault::operation_of(core::any::type_name_of_val(&__operation)),
        }
    }};
}

/// Raises a fault: captures an [`ErrorRecord`](crate::fault::ErrorRecord)
/// at this site and returns it as `Err` from the enclosing function or
/// closure. The enclosing operation must return a
/// [`FaultResult`](crate::fault::FaultResult).
///
/// ```ignore
/// fn check(len: usize) -> FaultResult<()> {
///     if len > LIMIT {
///         raise!(Condition::StringTooLong, "name field too long");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! raise {
    ($condition:expr) => {
        return Err($crate::fault::raise($condition, $crate::source_location!()))
    };
    ($condition:expr, $message:expr) => {
        return Err($crate::fault::raise_with_message(
            $condition,
            $message,
            $crate::source_location!(),
        ))
    };
}

/// Re-raises a previously captured record from inside a handler,
/// forwarding it unchanged to the enclosing guard.
#[macro_export]
macro_rules! reraise {
    ($record:expr) => {
        return Err($crate::fault::reraise($record))
    };
}

#[cfg(test)]
mod tests {
    use super::super::ds::{Condition, FaultResult};
    use super::operation_of;

    #[test]
    fn macro_captures_site_and_operation() {
        fn failing_operation() -> FaultResult<()> {
            raise!(Condition::OutOfRange, "forced");
        }

        let record = failing_operation().unwrap_err().into_record();
        assert_eq!(record.condition, Condition::OutOfRange);
        assert_eq!(record.message, Some("forced"));
        assert!(record.location.file.ends_with("raise.rs"));
        assert!(record.location.operation.ends_with("failing_operation"));
    }

    #[test]
    fn raise_without_message_leaves_message_absent() {
        fn failing_operation() -> FaultResult<()> {
            raise!(Condition::BufferOverflow);
        }

        let record = failing_operation().unwrap_err().into_record();
        assert_eq!(record.message, None);
    }

    #[test]
    fn reraise_preserves_every_field() {
        fn inner() -> FaultResult<()> {
            raise!(Condition::BusTransmission, "no ack");
        }
        fn forward() -> FaultResult<()> {
            match inner() {
                Ok(()) => Ok(()),
                Err(fault) => reraise!(fault.into_record()),
            }
        }

        let original = inner().unwrap_err().into_record();
        let forwarded = forward().unwrap_err().into_record();
        assert_eq!(forwarded, original);
    }

    #[test]
    fn operation_path_trims_closure_frames() {
        assert_eq!(operation_of("a::b::f::__operation"), "a::b::f");
        assert_eq!(
            operation_of("a::b::f::{{closure}}::{{closure}}::__operation"),
            "a::b::f"
        );
    }
}
