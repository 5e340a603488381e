pub mod config;
pub mod error;
pub mod module;
pub mod principal;
pub mod types;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use module::Module;
pub use principal::{AlwaysAnonymous, FixedPrincipal, HeaderResolver, Principal, PrincipalResolver};
pub use types::{ListParams, ListResult, merge_patch, new_id, now_rfc3339};
