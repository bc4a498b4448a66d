// faultchain/src/fault/infrastructure/mod.rs

//! # Fault Runtime Infrastructure

pub mod di;
pub mod terminal;
