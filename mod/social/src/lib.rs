//! Social module — accounts, directed relationships, and the privacy
//! guardian that gates every read of account-owned data.
//!
//! # Resources
//!
//! - **Account** — identity with a PUBLIC/PRIVATE visibility mode
//! - **Relationship** — directed edge (follow / request / block / mute)
//!   between two accounts
//! - **Stats** — relationship counts and viewer-relative flags
//!
//! # Usage
//!
//! ```ignore
//! use social::{SocialModule, service::SocialConfig};
//!
//! let module = SocialModule::new(sql, kv, resolver, SocialConfig::default())?;
//! let router = module.routes(); // Mount under /social
//! ```

pub mod model;
pub mod service;
pub mod api;

use std::sync::Arc;

use axum::Router;

use burrow_core::{Module, PrincipalResolver};

use crate::service::{SocialConfig, SocialService};

/// Social module implementing the Module trait.
///
/// Holds the SocialService and provides HTTP routes for all social
/// endpoints.
pub struct SocialModule {
    service: Arc<SocialService>,
    resolver: Arc<dyn PrincipalResolver>,
}

impl SocialModule {
    /// Create a new SocialModule.
    pub fn new(
        sql: Arc<dyn burrow_sql::SQLStore>,
        kv: Arc<dyn burrow_kv::KVStore>,
        resolver: Arc<dyn PrincipalResolver>,
        config: SocialConfig,
    ) -> Result<Self, burrow_core::ServiceError> {
        let service = SocialService::new(sql, kv, config)
            .map_err(burrow_core::ServiceError::from)?;
        Ok(Self { service, resolver })
    }

    /// Get a reference to the underlying SocialService.
    pub fn service(&self) -> &Arc<SocialService> {
        &self.service
    }
}

impl Module for SocialModule {
    fn name(&self) -> &str {
        "social"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone(), self.resolver.clone())
    }
}
