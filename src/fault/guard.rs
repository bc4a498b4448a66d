// faultchain/src/fault/guard.rs

//! # Scoped Guards
//!
//! A guard brackets a body closure and intercepts any fault raised in
//! its dynamic extent, however deep the call chain below it. Guards
//! nest freely; a raise always reaches the innermost guard whose body
//! is still executing, and the chain of active guards is exactly the
//! nesting of `run_guarded` frames on the call stack, rooted at the
//! terminal handler installed by [`initialize`](crate::fault::initialize).
//!
//! The ordering invariant: by the time a guard's handler runs, the
//! body frame has already returned, so the guard is retired. A fault
//! raised *inside a handler* therefore escalates to the enclosing
//! guard (or the terminal handler), never back to the guard whose
//! handler is executing. Once the whole construct returns, the chain
//! is exactly what it was before the guard was entered, regardless of
//! nesting depth or how many raises occurred inside.

use super::ds::{ErrorRecord, FaultResult};

/// Runs `body` under a fresh guard; a fault raised in its dynamic
/// extent is delivered to `handler` instead of propagating further.
///
/// The handler itself may raise (or [`reraise!`](crate::reraise)); such
/// a fault is returned as `Err` and belongs to the enclosing scope.
pub fn run_guarded<T>(
    body: impl FnOnce() -> FaultResult<T>,
    handler: impl FnOnce(&ErrorRecord) -> FaultResult<T>,
) -> FaultResult<T> {
    match body() {
        Ok(value) => Ok(value),
        // The body frame has returned: this guard is retired before any
        // handler code runs.
        Err(fault) => handler(fault.record()),
    }
}

/// Like [`run_guarded`], but additionally copies the full record into
/// `slot` before the handler is invoked, for callers that still need
/// the record after the construct returns.
pub fn run_guarded_capture<T>(
    body: impl FnOnce() -> FaultResult<T>,
    slot: &mut Option<ErrorRecord>,
    handler: impl FnOnce(&ErrorRecord) -> FaultResult<T>,
) -> FaultResult<T> {
    match body() {
        Ok(value) => Ok(value),
        Err(fault) => {
            let record = fault.into_record();
            *slot = Some(record);
            handler(&record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ds::{Condition, FaultResult};
    use super::{run_guarded, run_guarded_capture};
    use crate::{raise, reraise};

    #[test]
    fn body_completing_normally_skips_the_handler() {
        let mut handled = false;
        let value = run_guarded(
            || Ok(7),
            |_| {
                handled = true;
                Ok(0)
            },
        );
        assert_eq!(value.unwrap(), 7);
        assert!(!handled);
    }

    #[test]
    fn raise_in_body_runs_handler_once_and_execution_continues() {
        let mut count = 0;
        let outcome = run_guarded(
            || -> FaultResult<()> { raise!(Condition::OutOfRange) },
            |_| {
                count += 1;
                Ok(())
            },
        );
        assert!(outcome.is_ok());
        assert_eq!(count, 1);
    }

    #[test]
    fn raise_is_caught_by_the_innermost_guard() {
        let mut inner_saw = None;
        let mut outer_saw = None;
        let outcome = run_guarded(
            || {
                run_guarded(
                    || -> FaultResult<()> { raise!(Condition::BufferOverflow) },
                    |record| {
                        inner_saw = Some(record.condition);
                        Ok(())
                    },
                )
            },
            |record| {
                outer_saw = Some(record.condition);
                Ok(())
            },
        );
        assert!(outcome.is_ok());
        assert_eq!(inner_saw, Some(Condition::BufferOverflow));
        assert_eq!(outer_saw, None);
    }

    #[test]
    fn raise_in_handler_escalates_to_the_enclosing_guard() {
        // Inner body raises OutOfRange; the inner handler raises
        // BusTransmission, which must surface at the outer guard, not
        // loop back into the inner one.
        let mut captured = None;
        let outcome = run_guarded_capture(
            || {
                run_guarded(
                    || -> FaultResult<()> { raise!(Condition::OutOfRange) },
                    |_| raise!(Condition::BusTransmission),
                )
            },
            &mut captured,
            |_| Ok(()),
        );
        assert!(outcome.is_ok());
        assert_eq!(captured.unwrap().condition, Condition::BusTransmission);
    }

    #[test]
    fn capture_slot_receives_the_full_record_before_the_handler() {
        let mut captured = None;
        let mut handler_saw_captured = false;
        let _ = run_guarded_capture(
            || -> FaultResult<()> { raise!(Condition::MalformedInput, "digit expected") },
            &mut captured,
            |record| {
                // The slot was filled before this handler ran.
                handler_saw_captured = true;
                assert_eq!(record.message, Some("digit expected"));
                Ok(())
            },
        );
        assert!(handler_saw_captured);
        let record = captured.unwrap();
        assert_eq!(record.condition, Condition::MalformedInput);
        assert_eq!(record.message, Some("digit expected"));
        assert!(record.location.file.ends_with("guard.rs"));
    }

    #[test]
    fn reraise_delivers_an_identical_record_to_the_enclosing_guard() {
        let mut inner_record = None;
        let mut outer_record = None;
        let _ = run_guarded_capture(
            || {
                run_guarded_capture(
                    || -> FaultResult<()> { raise!(Condition::BitrateTooLow, "divisor overflow") },
                    &mut inner_record,
                    |record| reraise!(*record),
                )
            },
            &mut outer_record,
            |_| Ok(()),
        );
        assert_eq!(outer_record, inner_record);
    }

    #[test]
    fn control_continues_after_deeply_nested_raises() {
        // Three levels of nesting, every body raising; after the
        // outermost construct returns, normal flow resumes and further
        // guards behave as if nothing had happened.
        let mut handled = 0;
        for _ in 0..2 {
            let outcome = run_guarded(
                || {
                    run_guarded(
                        || {
                            run_guarded(
                                || -> FaultResult<()> { raise!(Condition::OutOfRange) },
                                |_| raise!(Condition::BufferOverflow),
                            )
                        },
                        |_| raise!(Condition::BusTransmission),
                    )
                },
                |record| {
                    assert_eq!(record.condition, Condition::BusTransmission);
                    handled += 1;
                    Ok(())
                },
            );
            assert!(outcome.is_ok());
        }
        assert_eq!(handled, 2);
    }
}
