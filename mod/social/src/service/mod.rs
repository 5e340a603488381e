pub mod account;
pub mod guardian;
pub mod relationship;
pub mod schema;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use burrow_kv::KVStore;
use burrow_sql::{SQLStore, Value};

use crate::model::{RelationshipKind, RelationshipOp};

/// Social service error type.
///
/// Relationship-rule violations carry stable machine-readable codes (see
/// [`SocialError::code`]); clients match on the code, never the message.
/// Infrastructure failures (`Storage`/`Cache`/`Internal`) are deliberately
/// separate — they surface as 500s and are never folded into a domain code
/// or into an access decision.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("cannot {} yourself", .0.verb())]
    SelfAction(RelationshipOp),

    #[error("account '{0}' not found")]
    UserNotFound(String),

    #[error("{}", already_message(.0))]
    AlreadyRelated(RelationshipKind),

    #[error("{}", missing_message(.0))]
    NotRelated(RelationshipKind),

    #[error("handle '{0}' is already taken")]
    HandleTaken(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("cache: {0}")]
    Cache(String),

    #[error("internal: {0}")]
    Internal(String),
}

fn already_message(kind: &RelationshipKind) -> &'static str {
    match kind {
        // A pending request counts as "already followed".
        RelationshipKind::Follow | RelationshipKind::Request => "already following this account",
        RelationshipKind::Block => "already blocking this account",
        RelationshipKind::Mute => "already muting this account",
    }
}

fn missing_message(kind: &RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Follow => "not following this account",
        RelationshipKind::Request => "no pending follow request from this account",
        RelationshipKind::Block => "not blocking this account",
        RelationshipKind::Mute => "not muting this account",
    }
}

impl SocialError {
    /// Stable, machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            SocialError::SelfAction(op) => match op {
                RelationshipOp::Follow => "CANNOT_FOLLOW_SELF",
                RelationshipOp::Unfollow => "CANNOT_UNFOLLOW_SELF",
                RelationshipOp::Block => "CANNOT_BLOCK_SELF",
                RelationshipOp::Unblock => "CANNOT_UNBLOCK_SELF",
                RelationshipOp::Mute => "CANNOT_MUTE_SELF",
                RelationshipOp::Unmute => "CANNOT_UNMUTE_SELF",
                RelationshipOp::AcceptFollowRequest => "CANNOT_ACCEPT_OWN_FOLLOW_REQUEST",
                RelationshipOp::DenyFollowRequest => "CANNOT_DENY_OWN_FOLLOW_REQUEST",
            },
            SocialError::UserNotFound(_) => "USER_NOT_FOUND",
            SocialError::AlreadyRelated(kind) => match kind {
                RelationshipKind::Follow | RelationshipKind::Request => "USER_ALREADY_FOLLOWED",
                RelationshipKind::Block => "USER_ALREADY_BLOCKED",
                RelationshipKind::Mute => "USER_ALREADY_MUTED",
            },
            SocialError::NotRelated(kind) => match kind {
                RelationshipKind::Follow => "USER_NOT_UNFOLLOWED",
                RelationshipKind::Request => "FOLLOW_REQUEST_NOT_FOUND",
                RelationshipKind::Block => "USER_NOT_UNBLOCKED",
                RelationshipKind::Mute => "USER_NOT_UNMUTED",
            },
            SocialError::HandleTaken(_) => "HANDLE_TAKEN",
            SocialError::NotFound(_) => "NOT_FOUND",
            SocialError::Conflict(_) => "ALREADY_EXISTS",
            SocialError::Validation(_) => "VALIDATION_FAILED",
            SocialError::Storage(_) => "STORAGE_ERROR",
            SocialError::Cache(_) => "STORAGE_ERROR",
            SocialError::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SocialError::SelfAction(_) | SocialError::Validation(_) => StatusCode::BAD_REQUEST,
            SocialError::UserNotFound(_) | SocialError::NotFound(_) => StatusCode::NOT_FOUND,
            SocialError::NotRelated(RelationshipKind::Request) => StatusCode::NOT_FOUND,
            SocialError::AlreadyRelated(_)
            | SocialError::NotRelated(_)
            | SocialError::HandleTaken(_)
            | SocialError::Conflict(_) => StatusCode::CONFLICT,
            SocialError::Storage(_) | SocialError::Cache(_) | SocialError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SocialError> for burrow_core::ServiceError {
    fn from(e: SocialError) -> Self {
        match e {
            SocialError::Storage(m) | SocialError::Cache(m) => {
                burrow_core::ServiceError::Storage(m)
            }
            SocialError::Internal(m) => burrow_core::ServiceError::Internal(m),
            other => burrow_core::ServiceError::Domain {
                code: other.code(),
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

/// Configuration for the social service.
#[derive(Debug, Clone)]
pub struct SocialConfig {
    /// Guardian decision cache TTL in seconds (default: 5).
    ///
    /// Decisions are never explicitly invalidated; a viewer blocked after
    /// being cached as allowed keeps access for at most this window.
    pub guardian_cache_ttl: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            guardian_cache_ttl: 5,
        }
    }
}

/// The Social service. Holds storage backends and configuration.
pub struct SocialService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) config: SocialConfig,
}

impl SocialService {
    /// Create a new SocialService, initializing the DB schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        config: SocialConfig,
    ) -> Result<Arc<Self>, SocialError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, kv, config }))
    }

    // ── Generic CRUD helpers ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), SocialError> {
        let json = serde_json::to_string(record)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 3;
            cols.push(col);
            placeholders.push(format!("?{}", idx));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql.exec(&sql, &params).map_err(|e| {
            if e.is_unique_violation() {
                SocialError::Conflict(e.to_string())
            } else {
                SocialError::Storage(e.to_string())
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, SocialError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self.sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| SocialError::NotFound(format!("{}/{}", table, id)))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| SocialError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| SocialError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), SocialError> {
        let json = serde_json::to_string(record)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            let idx = i + 2;
            sets.push(format!("{} = ?{}", col, idx));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            id_idx,
        );

        let affected = self.sql.exec(&sql, &params).map_err(|e| {
            if e.is_unique_violation() {
                SocialError::Conflict(e.to_string())
            } else {
                SocialError::Storage(e.to_string())
            }
        })?;

        if affected == 0 {
            return Err(SocialError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }

    /// Delete a record by id.
    pub(crate) fn delete_record(&self, table: &str, id: &str) -> Result<(), SocialError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self.sql
            .exec(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(SocialError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }

    /// List records with pagination, newest first.
    pub(crate) fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<T>, usize), SocialError> {
        let count_sql = format!("SELECT COUNT(*) AS n FROM {}", table);
        let rows = self.sql
            .query(&count_sql, &[])
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let total = rows
            .first()
            .and_then(|r| r.get_i64("n"))
            .unwrap_or(0) as usize;

        let sql = format!(
            "SELECT data FROM {} ORDER BY created_at DESC LIMIT ?1 OFFSET ?2",
            table,
        );
        let rows = self.sql
            .query(
                &sql,
                &[Value::Integer(limit as i64), Value::Integer(offset as i64)],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let data = row
                .get_str("data")
                .ok_or_else(|| SocialError::Internal("missing data column".into()))?;
            items.push(
                serde_json::from_str(data).map_err(|e| SocialError::Internal(e.to_string()))?,
            );
        }
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RelationshipKind, RelationshipOp};

    #[test]
    fn domain_codes_are_stable() {
        assert_eq!(
            SocialError::SelfAction(RelationshipOp::Follow).code(),
            "CANNOT_FOLLOW_SELF"
        );
        assert_eq!(SocialError::UserNotFound("x".into()).code(), "USER_NOT_FOUND");
        assert_eq!(
            SocialError::AlreadyRelated(RelationshipKind::Follow).code(),
            "USER_ALREADY_FOLLOWED"
        );
        assert_eq!(
            SocialError::AlreadyRelated(RelationshipKind::Request).code(),
            "USER_ALREADY_FOLLOWED"
        );
        assert_eq!(
            SocialError::NotRelated(RelationshipKind::Block).code(),
            "USER_NOT_UNBLOCKED"
        );
        assert_eq!(
            SocialError::NotRelated(RelationshipKind::Request).code(),
            "FOLLOW_REQUEST_NOT_FOUND"
        );
    }

    #[test]
    fn infrastructure_errors_keep_their_class() {
        let err: burrow_core::ServiceError = SocialError::Storage("down".into()).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");

        let err: burrow_core::ServiceError =
            SocialError::AlreadyRelated(RelationshipKind::Mute).into();
        assert_eq!(err.error_code(), "USER_ALREADY_MUTED");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
