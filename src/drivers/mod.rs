// faultchain/src/drivers/mod.rs

//! # Peripheral Drivers
//!
//! Register-level drivers for the board peripherals. They are plain
//! consumers of the fault runtime: anything that can go wrong raises a
//! typed condition through [`crate::fault`]; the register sequencing
//! itself is ordinary polled I/O.

pub mod ds1307;
pub mod i2c_master;
pub mod uart;
