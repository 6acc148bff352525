//! Runtime system
//!
//! This module contains the coroutine state machine and the manager that
//! drives coroutines once per host tick.

pub mod coroutine;
pub mod scheduler;
