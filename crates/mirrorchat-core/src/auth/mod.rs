//! Identity token verification abstraction.

pub mod verifier;
