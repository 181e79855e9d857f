//! Bearer-token → request context resolution.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use eventhub_core::config::{AuthConfig, TokenGrant};
use eventhub_core::{AppError, AppResult};
use eventhub_entity::user::UserRole;

use crate::context::RequestContext;

/// Resolves opaque bearer tokens into authenticated contexts.
#[async_trait]
pub trait SessionResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Resolve `token`, failing with an authentication error when unknown.
    async fn resolve(&self, token: &str) -> AppResult<RequestContext>;
}

/// Resolver backed by a fixed token table.
///
/// Seeded from [`AuthConfig`]; grants can be added or revoked at runtime.
#[derive(Debug, Default)]
pub struct StaticSessionResolver {
    grants: DashMap<String, (String, UserRole)>,
}

impl StaticSessionResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a resolver from configured grants.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let resolver = Self::new();
        for (token, TokenGrant { user_id, role }) in &config.tokens {
            let role: UserRole = role.parse().map_err(|e: AppError| {
                AppError::configuration(format!("auth.tokens grant for '{user_id}': {}", e.message))
            })?;
            resolver.grant(token.clone(), user_id.clone(), role);
        }
        Ok(resolver)
    }

    /// Registers or replaces a token.
    pub fn grant(&self, token: impl Into<String>, user_id: impl Into<String>, role: UserRole) {
        self.grants.insert(token.into(), (user_id.into(), role));
    }

    /// Revokes a token. Returns `true` if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.grants.remove(token).is_some()
    }
}

#[async_trait]
impl SessionResolver for StaticSessionResolver {
    async fn resolve(&self, token: &str) -> AppResult<RequestContext> {
        let Some(grant) = self.grants.get(token) else {
            debug!("Rejected unknown bearer token");
            return Err(AppError::authentication("Invalid or expired session"));
        };
        let (user_id, role) = grant.value();
        Ok(RequestContext::new(user_id.clone(), *role))
    }
}
