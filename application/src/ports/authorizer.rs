//! Authorizer port for tools that require an identified caller.
//!
//! Authentication and session management live outside this core; the
//! protocol server only needs to know whether a user id resolves to a known
//! principal. Implementations answer that one question.

/// Port for resolving caller identities.
pub trait AuthorizerPort: Send + Sync {
    /// Whether the user id resolves to a known principal.
    fn resolve(&self, user_id: &str) -> bool;
}

/// Default authorizer: any non-empty user id resolves.
///
/// Suitable when an upstream gateway has already authenticated the caller
/// and the id is trusted.
pub struct PresenceAuthorizer;

impl AuthorizerPort for PresenceAuthorizer {
    fn resolve(&self, user_id: &str) -> bool {
        !user_id.trim().is_empty()
    }
}

/// Authorizer that rejects everyone, for tests of the unauthorized path.
pub struct DenyAllAuthorizer;

impl AuthorizerPort for DenyAllAuthorizer {
    fn resolve(&self, _user_id: &str) -> bool {
        false
    }
}
