//! Session
//!
//! Administrator session state for the admin panel, fed by the auth
//! collaborator and consumed by view resolution.

mod gate;

pub use gate::{GateError, InitOutcome, SessionGate, SessionState, INVALID_CREDENTIALS_MESSAGE};
