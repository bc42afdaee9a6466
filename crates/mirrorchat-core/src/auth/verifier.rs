//! TokenVerifier trait definition.

use std::sync::Arc;

use mirrorchat_types::identity::{AuthError, VerifiedIdentity};

/// Validates an opaque identity token and yields a stable user identifier.
///
/// Implementations live in mirrorchat-infra (e.g., `FirebaseTokenVerifier`).
pub trait TokenVerifier: Send + Sync {
    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<VerifiedIdentity, AuthError>> + Send;
}

/// Lets several services share one verifier (and its key cache).
impl<T: TokenVerifier> TokenVerifier for Arc<T> {
    fn verify(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<VerifiedIdentity, AuthError>> + Send {
        (**self).verify(token)
    }
}
