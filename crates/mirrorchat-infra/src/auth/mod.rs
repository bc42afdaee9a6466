//! Identity token verification.

pub mod firebase;

pub use firebase::FirebaseTokenVerifier;
