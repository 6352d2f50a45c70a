//! Shared test utilities for rlog integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. Every harness builds its own [`rlog::Context`] so that
//! scenarios do not leak rules or sinks into each other.

#![allow(dead_code)]

pub mod capture;
pub mod fixtures;

pub use capture::*;
pub use fixtures::*;
