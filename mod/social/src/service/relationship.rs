use burrow_core::{new_id, now_rfc3339, ListParams, ListResult};
use burrow_sql::Value;

use crate::model::{Account, Relationship, RelationshipKind, RelationshipOp, Visibility};
use crate::service::{SocialError, SocialService};

impl SocialService {
    // ── Mutations ──

    /// Follow an account. Private targets get a pending REQUEST edge
    /// instead; it becomes a FOLLOW when the target accepts.
    pub fn follow(
        &self,
        actor_id: &str,
        target_id: &str,
        reason: Option<String>,
    ) -> Result<Relationship, SocialError> {
        let target = self.assert_pair(RelationshipOp::Follow, actor_id, target_id)?;

        if self.follow_or_request_exists(actor_id, target_id)? {
            return Err(SocialError::AlreadyRelated(RelationshipKind::Follow));
        }

        let kind = match target.visibility {
            Visibility::Private => RelationshipKind::Request,
            Visibility::Public => RelationshipKind::Follow,
        };
        self.insert_edge(actor_id, target_id, kind, reason)
    }

    /// Block an account. Clears any follow/request state between the pair
    /// in both directions and inserts the block, all in one transaction.
    pub fn block(
        &self,
        actor_id: &str,
        target_id: &str,
        reason: Option<String>,
    ) -> Result<Relationship, SocialError> {
        self.assert_pair(RelationshipOp::Block, actor_id, target_id)?;

        if self.edge_exists(actor_id, target_id, RelationshipKind::Block)? {
            return Err(SocialError::AlreadyRelated(RelationshipKind::Block));
        }

        let now = now_rfc3339();
        let edge = Relationship {
            id: new_id(),
            from_id: actor_id.to_string(),
            to_id: target_id.to_string(),
            kind: RelationshipKind::Block,
            reason,
            created_at: now.clone(),
            updated_at: now.clone(),
        };
        let json = serde_json::to_string(&edge)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        let clear_params = [
            Value::Text(actor_id.to_string()),
            Value::Text(target_id.to_string()),
        ];
        let insert_params = [
            Value::Text(edge.id.clone()),
            Value::Text(json),
            Value::Text(edge.from_id.clone()),
            Value::Text(edge.to_id.clone()),
            Value::Text(edge.kind.as_str().to_string()),
            Value::Text(now.clone()),
            Value::Text(now),
        ];
        // One transaction: no window where the follow edges are gone but
        // the block is not yet in place (or the reverse, on crash).
        let stmts: [(&str, &[Value]); 2] = [
            (
                "DELETE FROM relationships
                 WHERE kind IN ('follow', 'request')
                   AND ((from_id = ?1 AND to_id = ?2) OR (from_id = ?2 AND to_id = ?1))",
                &clear_params,
            ),
            (
                "INSERT INTO relationships (id, data, from_id, to_id, kind, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                &insert_params,
            ),
        ];

        self.sql.exec_batch(&stmts).map_err(|e| {
            if e.is_unique_violation() {
                SocialError::AlreadyRelated(RelationshipKind::Block)
            } else {
                SocialError::Storage(e.to_string())
            }
        })?;

        Ok(edge)
    }

    /// Mute an account. No side effects on other edge kinds.
    pub fn mute(
        &self,
        actor_id: &str,
        target_id: &str,
        reason: Option<String>,
    ) -> Result<Relationship, SocialError> {
        self.assert_pair(RelationshipOp::Mute, actor_id, target_id)?;

        if self.edge_exists(actor_id, target_id, RelationshipKind::Mute)? {
            return Err(SocialError::AlreadyRelated(RelationshipKind::Mute));
        }
        self.insert_edge(actor_id, target_id, RelationshipKind::Mute, reason)
    }

    /// Unfollow an account. A pending follow request counts: cancelling it
    /// is the same operation from the actor's point of view.
    pub fn unfollow(&self, actor_id: &str, target_id: &str) -> Result<Relationship, SocialError> {
        self.remove_edge(RelationshipOp::Unfollow, actor_id, target_id)
    }

    /// Unblock an account.
    pub fn unblock(&self, actor_id: &str, target_id: &str) -> Result<Relationship, SocialError> {
        self.remove_edge(RelationshipOp::Unblock, actor_id, target_id)
    }

    /// Unmute an account.
    pub fn unmute(&self, actor_id: &str, target_id: &str) -> Result<Relationship, SocialError> {
        self.remove_edge(RelationshipOp::Unmute, actor_id, target_id)
    }

    /// Accept a pending follow request: the REQUEST edge requester→actor is
    /// promoted to FOLLOW in place, keeping its identity.
    pub fn accept_follow_request(
        &self,
        actor_id: &str,
        requester_id: &str,
    ) -> Result<Relationship, SocialError> {
        self.assert_pair(RelationshipOp::AcceptFollowRequest, actor_id, requester_id)?;

        let Some(mut edge) =
            self.find_edge(requester_id, actor_id, RelationshipKind::Request)?
        else {
            return Err(SocialError::NotRelated(RelationshipKind::Request));
        };

        edge.kind = RelationshipKind::Follow;
        edge.updated_at = now_rfc3339();
        let json = serde_json::to_string(&edge)
            .map_err(|e| SocialError::Internal(e.to_string()))?;

        let affected = self.sql
            .exec(
                "UPDATE relationships SET kind = ?1, data = ?2, updated_at = ?3
                 WHERE from_id = ?4 AND to_id = ?5 AND kind = ?6",
                &[
                    Value::Text(RelationshipKind::Follow.as_str().to_string()),
                    Value::Text(json),
                    Value::Text(edge.updated_at.clone()),
                    Value::Text(requester_id.to_string()),
                    Value::Text(actor_id.to_string()),
                    Value::Text(RelationshipKind::Request.as_str().to_string()),
                ],
            )
            .map_err(|e| {
                if e.is_unique_violation() {
                    SocialError::AlreadyRelated(RelationshipKind::Follow)
                } else {
                    SocialError::Storage(e.to_string())
                }
            })?;

        // A concurrent deny/unfollow may have removed the request between
        // the read and the update.
        if affected == 0 {
            return Err(SocialError::NotRelated(RelationshipKind::Request));
        }

        Ok(edge)
    }

    /// Deny a pending follow request: the REQUEST edge is deleted.
    pub fn deny_follow_request(
        &self,
        actor_id: &str,
        requester_id: &str,
    ) -> Result<bool, SocialError> {
        self.assert_pair(RelationshipOp::DenyFollowRequest, actor_id, requester_id)?;

        let affected = self.sql
            .exec(
                "DELETE FROM relationships WHERE from_id = ?1 AND to_id = ?2 AND kind = ?3",
                &[
                    Value::Text(requester_id.to_string()),
                    Value::Text(actor_id.to_string()),
                    Value::Text(RelationshipKind::Request.as_str().to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(SocialError::NotRelated(RelationshipKind::Request));
        }
        Ok(true)
    }

    // ── Listings ──

    /// Accounts following the subject (FOLLOW edges pointing at it).
    pub fn list_followers(
        &self,
        subject_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Account>, SocialError> {
        self.list_related_accounts(subject_id, RelationshipKind::Follow, Direction::Incoming, params)
    }

    /// Accounts the subject follows (FOLLOW edges it initiated).
    pub fn list_following(
        &self,
        subject_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Account>, SocialError> {
        self.list_related_accounts(subject_id, RelationshipKind::Follow, Direction::Outgoing, params)
    }

    /// Accounts with a pending follow request against the subject.
    pub fn list_pending_requests(
        &self,
        subject_id: &str,
        params: &ListParams,
    ) -> Result<ListResult<Account>, SocialError> {
        self.list_related_accounts(subject_id, RelationshipKind::Request, Direction::Incoming, params)
    }

    // ── Edge primitives ──

    pub(crate) fn find_edge(
        &self,
        from_id: &str,
        to_id: &str,
        kind: RelationshipKind,
    ) -> Result<Option<Relationship>, SocialError> {
        let rows = self.sql
            .query(
                "SELECT data FROM relationships WHERE from_id = ?1 AND to_id = ?2 AND kind = ?3",
                &[
                    Value::Text(from_id.to_string()),
                    Value::Text(to_id.to_string()),
                    Value::Text(kind.as_str().to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        match rows.first() {
            None => Ok(None),
            Some(row) => {
                let data = row
                    .get_str("data")
                    .ok_or_else(|| SocialError::Internal("missing data column".into()))?;
                let edge = serde_json::from_str(data)
                    .map_err(|e| SocialError::Internal(e.to_string()))?;
                Ok(Some(edge))
            }
        }
    }

    pub(crate) fn edge_exists(
        &self,
        from_id: &str,
        to_id: &str,
        kind: RelationshipKind,
    ) -> Result<bool, SocialError> {
        let rows = self.sql
            .query(
                "SELECT 1 AS one FROM relationships
                 WHERE from_id = ?1 AND to_id = ?2 AND kind = ?3 LIMIT 1",
                &[
                    Value::Text(from_id.to_string()),
                    Value::Text(to_id.to_string()),
                    Value::Text(kind.as_str().to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    fn follow_or_request_exists(&self, from_id: &str, to_id: &str) -> Result<bool, SocialError> {
        let rows = self.sql
            .query(
                "SELECT 1 AS one FROM relationships
                 WHERE from_id = ?1 AND to_id = ?2 AND kind IN ('follow', 'request') LIMIT 1",
                &[
                    Value::Text(from_id.to_string()),
                    Value::Text(to_id.to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    /// Shared preconditions for every mutation: no self-edges, and the
    /// target must resolve to an existing account.
    fn assert_pair(
        &self,
        op: RelationshipOp,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Account, SocialError> {
        if actor_id == target_id {
            return Err(SocialError::SelfAction(op));
        }
        match self.get_record::<Account>("accounts", target_id) {
            Ok(account) => Ok(account),
            Err(SocialError::NotFound(_)) => {
                Err(SocialError::UserNotFound(target_id.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    fn insert_edge(
        &self,
        from_id: &str,
        to_id: &str,
        kind: RelationshipKind,
        reason: Option<String>,
    ) -> Result<Relationship, SocialError> {
        let now = now_rfc3339();
        let edge = Relationship {
            id: new_id(),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            kind,
            reason,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let indexes: Vec<(&str, Value)> = vec![
            ("from_id", Value::Text(edge.from_id.clone())),
            ("to_id", Value::Text(edge.to_id.clone())),
            ("kind", Value::Text(kind.as_str().to_string())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ];

        // The precondition check and this insert are not atomic; a
        // concurrent duplicate loses here, on the (from, to, kind)
        // uniqueness constraint.
        self.insert_record("relationships", &edge.id, &edge, &indexes)
            .map_err(|e| match e {
                SocialError::Conflict(_) => SocialError::AlreadyRelated(kind),
                other => other,
            })?;

        Ok(edge)
    }

    /// Shared negative transition: delete the actor→target edge of the
    /// operation's kind and return it. Only unfollow falls back to a
    /// pending REQUEST — follow is the only operation with a pending
    /// intermediate state.
    fn remove_edge(
        &self,
        op: RelationshipOp,
        actor_id: &str,
        target_id: &str,
    ) -> Result<Relationship, SocialError> {
        self.assert_pair(op, actor_id, target_id)?;
        let kind = op.kind();

        if let Some(edge) = self.find_edge(actor_id, target_id, kind)? {
            return self.delete_edge(edge, kind);
        }

        if op == RelationshipOp::Unfollow {
            if let Some(request) =
                self.find_edge(actor_id, target_id, RelationshipKind::Request)?
            {
                return self.delete_edge(request, kind);
            }
        }

        Err(SocialError::NotRelated(kind))
    }

    fn delete_edge(
        &self,
        edge: Relationship,
        err_kind: RelationshipKind,
    ) -> Result<Relationship, SocialError> {
        let affected = self.sql
            .exec(
                "DELETE FROM relationships WHERE id = ?1",
                &[Value::Text(edge.id.clone())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        // Raced away by a concurrent delete.
        if affected == 0 {
            return Err(SocialError::NotRelated(err_kind));
        }
        Ok(edge)
    }

    fn list_related_accounts(
        &self,
        subject_id: &str,
        kind: RelationshipKind,
        direction: Direction,
        params: &ListParams,
    ) -> Result<ListResult<Account>, SocialError> {
        // Validate subject exists
        let _: Account = self.get_record("accounts", subject_id)?;

        let (edge_col, account_col) = match direction {
            Direction::Incoming => ("to_id", "from_id"),
            Direction::Outgoing => ("from_id", "to_id"),
        };

        let count_sql = format!(
            "SELECT COUNT(*) AS n FROM relationships WHERE {} = ?1 AND kind = ?2",
            edge_col,
        );
        let rows = self.sql
            .query(
                &count_sql,
                &[
                    Value::Text(subject_id.to_string()),
                    Value::Text(kind.as_str().to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        let total = rows.first().and_then(|r| r.get_i64("n")).unwrap_or(0) as usize;

        let sql = format!(
            "SELECT a.data AS data FROM relationships r
             JOIN accounts a ON a.id = r.{}
             WHERE r.{} = ?1 AND r.kind = ?2
             ORDER BY r.created_at DESC LIMIT ?3 OFFSET ?4",
            account_col, edge_col,
        );
        let rows = self.sql
            .query(
                &sql,
                &[
                    Value::Text(subject_id.to_string()),
                    Value::Text(kind.as_str().to_string()),
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
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
        Ok(ListResult { items, total })
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Incoming,
    Outgoing,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use burrow_kv::MemoryStore;
    use burrow_sql::SqliteStore;

    use super::*;
    use crate::model::CreateAccount;
    use crate::service::SocialConfig;

    fn test_service() -> Arc<SocialService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(MemoryStore::new());
        SocialService::new(sql, kv, SocialConfig::default()).unwrap()
    }

    fn account(svc: &SocialService, name: &str, visibility: Visibility) -> Account {
        svc.create_account(CreateAccount {
            name: name.to_string(),
            handle: None,
            bio: None,
            visibility,
        })
        .unwrap()
    }

    fn edges_between(svc: &SocialService, a: &str, b: &str) -> Vec<(String, String, String)> {
        svc.sql
            .query(
                "SELECT from_id, to_id, kind FROM relationships
                 WHERE (from_id = ?1 AND to_id = ?2) OR (from_id = ?2 AND to_id = ?1)
                 ORDER BY kind",
                &[Value::Text(a.to_string()), Value::Text(b.to_string())],
            )
            .unwrap()
            .iter()
            .map(|r| {
                (
                    r.get_str("from_id").unwrap().to_string(),
                    r.get_str("to_id").unwrap().to_string(),
                    r.get_str("kind").unwrap().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn test_follow_public_creates_follow_edge() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        let edge = svc.follow(&a.id, &b.id, None).unwrap();
        assert_eq!(edge.kind, RelationshipKind::Follow);
        assert_eq!(edge.from_id, a.id);
        assert_eq!(edge.to_id, b.id);
    }

    #[test]
    fn test_follow_private_creates_request_edge() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        let edge = svc.follow(&b.id, &a.id, None).unwrap();
        assert_eq!(edge.kind, RelationshipKind::Request);
    }

    #[test]
    fn test_double_follow_is_rejected() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&a.id, &b.id, None).unwrap();
        let err = svc.follow(&a.id, &b.id, None).unwrap_err();
        assert_eq!(err.code(), "USER_ALREADY_FOLLOWED");
    }

    #[test]
    fn test_follow_with_pending_request_is_rejected() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&b.id, &a.id, None).unwrap();
        let err = svc.follow(&b.id, &a.id, None).unwrap_err();
        assert_eq!(err.code(), "USER_ALREADY_FOLLOWED");
    }

    #[test]
    fn test_self_and_unknown_target_preconditions() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);

        let err = svc.follow(&a.id, &a.id, None).unwrap_err();
        assert_eq!(err.code(), "CANNOT_FOLLOW_SELF");

        let err = svc.block(&a.id, &a.id, None).unwrap_err();
        assert_eq!(err.code(), "CANNOT_BLOCK_SELF");

        let err = svc.follow(&a.id, "missing", None).unwrap_err();
        assert_eq!(err.code(), "USER_NOT_FOUND");
    }

    #[test]
    fn test_follow_then_unfollow_leaves_no_edge() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&a.id, &b.id, None).unwrap();
        let removed = svc.unfollow(&a.id, &b.id).unwrap();
        assert_eq!(removed.kind, RelationshipKind::Follow);
        assert!(edges_between(&svc, &a.id, &b.id).is_empty());
    }

    #[test]
    fn test_unfollow_cancels_pending_request() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&b.id, &a.id, None).unwrap();
        let removed = svc.unfollow(&b.id, &a.id).unwrap();
        assert_eq!(removed.kind, RelationshipKind::Request);
        assert!(edges_between(&svc, &a.id, &b.id).is_empty());
    }

    #[test]
    fn test_negative_transitions_without_edge() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        assert_eq!(svc.unfollow(&a.id, &b.id).unwrap_err().code(), "USER_NOT_UNFOLLOWED");
        assert_eq!(svc.unblock(&a.id, &b.id).unwrap_err().code(), "USER_NOT_UNBLOCKED");
        assert_eq!(svc.unmute(&a.id, &b.id).unwrap_err().code(), "USER_NOT_UNMUTED");
    }

    #[test]
    fn test_unblock_does_not_fall_back_to_request() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        // A pending request exists, but unblock must not touch it.
        svc.follow(&b.id, &a.id, None).unwrap();
        assert_eq!(svc.unblock(&b.id, &a.id).unwrap_err().code(), "USER_NOT_UNBLOCKED");
        assert_eq!(edges_between(&svc, &a.id, &b.id).len(), 1);
    }

    #[test]
    fn test_block_clears_follow_state_both_directions() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Private);

        svc.follow(&b.id, &a.id, None).unwrap(); // B follows A
        svc.follow(&a.id, &b.id, None).unwrap(); // A requests B (private)

        svc.block(&a.id, &b.id, Some("spam".into())).unwrap();

        let edges = edges_between(&svc, &a.id, &b.id);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0], (a.id.clone(), b.id.clone(), "block".to_string()));
    }

    #[test]
    fn test_double_block_is_rejected() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        svc.block(&a.id, &b.id, None).unwrap();
        let err = svc.block(&a.id, &b.id, None).unwrap_err();
        assert_eq!(err.code(), "USER_ALREADY_BLOCKED");
    }

    #[test]
    fn test_block_is_directional() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        svc.block(&a.id, &b.id, None).unwrap();
        // The reverse direction is independent.
        svc.block(&b.id, &a.id, None).unwrap();
        assert_eq!(edges_between(&svc, &a.id, &b.id).len(), 2);
    }

    #[test]
    fn test_mute_roundtrip() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&a.id, &b.id, None).unwrap();
        svc.mute(&a.id, &b.id, None).unwrap();
        assert_eq!(svc.mute(&a.id, &b.id, None).unwrap_err().code(), "USER_ALREADY_MUTED");

        // Muting leaves the follow edge alone.
        assert_eq!(edges_between(&svc, &a.id, &b.id).len(), 2);

        svc.unmute(&a.id, &b.id).unwrap();
        assert_eq!(edges_between(&svc, &a.id, &b.id).len(), 1);
    }

    #[test]
    fn test_accept_promotes_request_in_place() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        let request = svc.follow(&b.id, &a.id, Some("hi".into())).unwrap();
        assert_eq!(request.kind, RelationshipKind::Request);

        let follow = svc.accept_follow_request(&a.id, &b.id).unwrap();
        assert_eq!(follow.kind, RelationshipKind::Follow);
        // Same edge identity: id, endpoints and reason survive promotion.
        assert_eq!(follow.id, request.id);
        assert_eq!(follow.from_id, b.id);
        assert_eq!(follow.to_id, a.id);
        assert_eq!(follow.reason.as_deref(), Some("hi"));
        assert_eq!(follow.created_at, request.created_at);

        let stored = svc
            .find_edge(&b.id, &a.id, RelationshipKind::Follow)
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, request.id);
        assert_eq!(stored.kind, RelationshipKind::Follow);
    }

    #[test]
    fn test_accept_without_request() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        let err = svc.accept_follow_request(&a.id, &b.id).unwrap_err();
        assert_eq!(err.code(), "FOLLOW_REQUEST_NOT_FOUND");
    }

    #[test]
    fn test_deny_deletes_request() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        svc.follow(&b.id, &a.id, None).unwrap();
        assert!(svc.deny_follow_request(&a.id, &b.id).unwrap());
        assert!(edges_between(&svc, &a.id, &b.id).is_empty());

        let err = svc.deny_follow_request(&a.id, &b.id).unwrap_err();
        assert_eq!(err.code(), "FOLLOW_REQUEST_NOT_FOUND");
    }

    #[test]
    fn test_listings() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);
        let c = account(&svc, "C", Visibility::Public);

        svc.follow(&b.id, &c.id, None).unwrap();
        svc.follow(&b.id, &a.id, None).unwrap(); // pending request

        let followers = svc.list_followers(&c.id, &ListParams::default()).unwrap();
        assert_eq!(followers.total, 1);
        assert_eq!(followers.items[0].id, b.id);

        let following = svc.list_following(&b.id, &ListParams::default()).unwrap();
        assert_eq!(following.total, 1);
        assert_eq!(following.items[0].id, c.id);

        let pending = svc.list_pending_requests(&a.id, &ListParams::default()).unwrap();
        assert_eq!(pending.total, 1);
        assert_eq!(pending.items[0].id, b.id);
    }
}
