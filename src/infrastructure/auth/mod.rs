//! Authentication infrastructure module
//!
//! This module provides the session-based authorization gate.

mod gate;

pub use gate::AuthorizationGate;
