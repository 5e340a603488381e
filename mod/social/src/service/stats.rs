use std::collections::HashSet;

use burrow_core::Principal;
use burrow_sql::Value;

use crate::model::{
    Account, RelationshipKind, RelationshipStats, StatsCounts, StatsFlags,
};
use crate::service::{SocialError, SocialService};

impl SocialService {
    /// Relationship counts for an account, plus flags relative to the
    /// viewer (all false when anonymous).
    ///
    /// The counts are independent read-only queries; the flags come from
    /// exactly two direction-scoped queries turned into kind-sets, not one
    /// query per flag.
    pub fn relationship_stats(
        &self,
        subject_id: &str,
        viewer: &Principal,
    ) -> Result<RelationshipStats, SocialError> {
        // Validate subject exists
        let _: Account = self.get_record("accounts", subject_id)?;

        let counts = StatsCounts {
            followers: self.count_edges("to_id", subject_id, RelationshipKind::Follow)?,
            following: self.count_edges("from_id", subject_id, RelationshipKind::Follow)?,
            blocked: self.count_edges("from_id", subject_id, RelationshipKind::Block)?,
            blockers: self.count_edges("to_id", subject_id, RelationshipKind::Block)?,
            muting: self.count_edges("from_id", subject_id, RelationshipKind::Mute)?,
            muters: self.count_edges("to_id", subject_id, RelationshipKind::Mute)?,
            requests: self.count_edges("to_id", subject_id, RelationshipKind::Request)?,
            mutuals: self.count_mutuals(subject_id)?,
        };

        let flags = match viewer.account_id() {
            None => StatsFlags::default(),
            Some(viewer_id) => {
                let outgoing = self.outgoing_kinds(viewer_id, subject_id)?;
                let incoming = self.outgoing_kinds(subject_id, viewer_id)?;
                StatsFlags {
                    is_following: outgoing.contains(&RelationshipKind::Follow),
                    is_follower: incoming.contains(&RelationshipKind::Follow),
                    is_blocking: outgoing.contains(&RelationshipKind::Block),
                    is_blocked: incoming.contains(&RelationshipKind::Block),
                    is_muting: outgoing.contains(&RelationshipKind::Mute),
                    is_requesting: outgoing.contains(&RelationshipKind::Request),
                    is_requested: incoming.contains(&RelationshipKind::Request),
                }
            }
        };

        Ok(RelationshipStats { counts, flags })
    }

    fn count_edges(
        &self,
        column: &str,
        account_id: &str,
        kind: RelationshipKind,
    ) -> Result<u64, SocialError> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM relationships WHERE {} = ?1 AND kind = ?2",
            column,
        );
        let rows = self.sql
            .query(
                &sql,
                &[
                    Value::Text(account_id.to_string()),
                    Value::Text(kind.as_str().to_string()),
                ],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("n")).unwrap_or(0) as u64)
    }

    /// Accounts followed in both directions: a self-join matching each
    /// outgoing FOLLOW edge with its reverse.
    fn count_mutuals(&self, account_id: &str) -> Result<u64, SocialError> {
        let rows = self.sql
            .query(
                "SELECT COUNT(*) AS n FROM relationships a
                 JOIN relationships b
                   ON b.from_id = a.to_id AND b.to_id = a.from_id
                 WHERE a.from_id = ?1 AND a.kind = 'follow' AND b.kind = 'follow'",
                &[Value::Text(account_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("n")).unwrap_or(0) as u64)
    }

    /// The set of edge kinds from one account to another.
    fn outgoing_kinds(
        &self,
        from_id: &str,
        to_id: &str,
    ) -> Result<HashSet<RelationshipKind>, SocialError> {
        let rows = self.sql
            .query(
                "SELECT kind FROM relationships WHERE from_id = ?1 AND to_id = ?2",
                &[Value::Text(from_id.to_string()), Value::Text(to_id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        let mut kinds = HashSet::new();
        for row in &rows {
            let raw = row
                .get_str("kind")
                .ok_or_else(|| SocialError::Internal("missing kind column".into()))?;
            let kind = RelationshipKind::parse(raw)
                .ok_or_else(|| SocialError::Internal(format!("unknown edge kind '{}'", raw)))?;
            kinds.insert(kind);
        }
        Ok(kinds)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use burrow_kv::MemoryStore;
    use burrow_sql::SqliteStore;

    use super::*;
    use crate::model::{CreateAccount, Visibility};
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

    #[test]
    fn test_counts() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);
        let c = account(&svc, "C", Visibility::Public);
        let d = account(&svc, "D", Visibility::Private);

        svc.follow(&a.id, &b.id, None).unwrap(); // A → B
        svc.follow(&b.id, &a.id, None).unwrap(); // B → A (mutual)
        svc.follow(&c.id, &a.id, None).unwrap(); // C → A
        svc.follow(&a.id, &d.id, None).unwrap(); // A → D pending request
        svc.mute(&a.id, &c.id, None).unwrap();
        svc.block(&c.id, &a.id, None).unwrap(); // clears C → A follow

        let stats = svc.relationship_stats(&a.id, &Principal::Anonymous).unwrap();
        assert_eq!(stats.counts.followers, 1); // B
        assert_eq!(stats.counts.following, 1); // B (request to D not a follow)
        assert_eq!(stats.counts.mutuals, 1); // B
        assert_eq!(stats.counts.muting, 1); // C
        assert_eq!(stats.counts.blockers, 1); // C
        assert_eq!(stats.counts.blocked, 0);
        assert_eq!(stats.counts.requests, 0);

        let d_stats = svc.relationship_stats(&d.id, &Principal::Anonymous).unwrap();
        assert_eq!(d_stats.counts.requests, 1); // A's pending request

        // Anonymous viewer: all flags false.
        assert!(!stats.flags.is_following);
        assert!(!stats.flags.is_follower);
    }

    #[test]
    fn test_flags_relative_to_viewer() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Private);

        svc.follow(&a.id, &b.id, None).unwrap(); // A → B pending request
        svc.mute(&a.id, &b.id, None).unwrap();
        svc.block(&b.id, &a.id, None).unwrap(); // clears the request

        let viewer = Principal::Account(a.id.clone());
        let stats = svc.relationship_stats(&b.id, &viewer).unwrap();
        assert!(!stats.flags.is_following);
        assert!(!stats.flags.is_requesting); // block cleared the request
        assert!(stats.flags.is_muting);
        assert!(stats.flags.is_blocked); // subject blocks the viewer
        assert!(!stats.flags.is_blocking);
    }

    #[test]
    fn test_block_during_pending_request_scenario() {
        let svc = test_service();
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        // B has a pending follow request against A, then A blocks B.
        svc.follow(&b.id, &a.id, None).unwrap();
        svc.block(&a.id, &b.id, None).unwrap();

        let b_view = svc
            .relationship_stats(&a.id, &Principal::Account(b.id.clone()))
            .unwrap();
        assert!(!b_view.flags.is_following);
        assert!(!b_view.flags.is_requesting);
        assert!(b_view.flags.is_blocked);

        let a_view = svc
            .relationship_stats(&b.id, &Principal::Account(a.id.clone()))
            .unwrap();
        assert!(a_view.flags.is_blocking);
    }

    #[test]
    fn test_stats_for_unknown_subject() {
        let svc = test_service();
        assert!(matches!(
            svc.relationship_stats("missing", &Principal::Anonymous),
            Err(SocialError::NotFound(_))
        ));
    }
}
