//! The authenticated caller, as an explicit value.
//!
//! Token verification (OIDC, JWT, whatever the deployment uses) happens
//! outside this codebase. Modules never look at headers or ambient context
//! to find out who is calling — they receive a [`Principal`] and nothing
//! else. The [`PrincipalResolver`] trait is the seam where a deployment
//! plugs in its verifier.

use axum::http::HeaderMap;

use crate::ServiceError;

/// Sentinel used wherever an anonymous caller needs a stable identifier
/// (cache keys, logs).
pub const ANONYMOUS: &str = "anonymous";

/// The caller of an operation: a known account, or nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// An authenticated account id.
    Account(String),
    /// No credentials presented.
    Anonymous,
}

impl Principal {
    /// The account id, if authenticated.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Principal::Account(id) => Some(id.as_str()),
            Principal::Anonymous => None,
        }
    }

    /// The account id, or `UNAUTHENTICATED` for anonymous callers.
    /// Mutating operations call this first.
    pub fn require_account(&self) -> Result<&str, ServiceError> {
        self.account_id()
            .ok_or_else(|| ServiceError::Unauthorized("authentication required".into()))
    }

    /// Stable tag for cache keys: the account id, or the `"anonymous"`
    /// sentinel.
    pub fn cache_tag(&self) -> &str {
        match self {
            Principal::Account(id) => id.as_str(),
            Principal::Anonymous => ANONYMOUS,
        }
    }
}

/// Pluggable principal resolution. Called once per request by the API
/// middleware; the resolved [`Principal`] is attached to the request for
/// handlers to consume.
///
/// Returning `Ok(Principal::Anonymous)` means "no credentials" — individual
/// operations decide whether that is acceptable. Returning `Err` means the
/// presented credentials are malformed or invalid and the request is
/// rejected outright.
pub trait PrincipalResolver: Send + Sync + 'static {
    fn resolve(&self, headers: &HeaderMap) -> Result<Principal, ServiceError>;
}

/// Trusts an `x-account-id` header. Meant for deployments where a verifying
/// gateway sits in front of the server and injects the header after token
/// validation, and for local development.
pub struct HeaderResolver;

impl PrincipalResolver for HeaderResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<Principal, ServiceError> {
        match headers.get("x-account-id") {
            None => Ok(Principal::Anonymous),
            Some(value) => {
                let id = value.to_str().map_err(|_| {
                    ServiceError::Unauthorized("malformed x-account-id header".into())
                })?;
                if id.trim().is_empty() {
                    return Err(ServiceError::Unauthorized("empty x-account-id header".into()));
                }
                Ok(Principal::Account(id.to_string()))
            }
        }
    }
}

/// Always resolves to the same account. Used in tests.
pub struct FixedPrincipal(pub String);

impl PrincipalResolver for FixedPrincipal {
    fn resolve(&self, _headers: &HeaderMap) -> Result<Principal, ServiceError> {
        Ok(Principal::Account(self.0.clone()))
    }
}

/// Always resolves to anonymous. Used in tests.
pub struct AlwaysAnonymous;

impl PrincipalResolver for AlwaysAnonymous {
    fn resolve(&self, _headers: &HeaderMap) -> Result<Principal, ServiceError> {
        Ok(Principal::Anonymous)
    }
}
