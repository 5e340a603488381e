use std::time::Duration;

use burrow_core::Principal;

use crate::model::{Account, RelationshipKind, Visibility};
use crate::service::{SocialError, SocialService};

/// Cache key for a (subject, viewer) decision. The viewer part is the
/// account id or the "anonymous" sentinel.
fn decision_key(subject_id: &str, viewer: &Principal) -> String {
    format!("guardian:{}:{}", subject_id, viewer.cache_tag())
}

impl SocialService {
    /// Decide whether `viewer` may see data owned by the subject account.
    ///
    /// Rules, in order:
    /// 1. blank/unknown subject → deny (fail closed)
    /// 2. the subject themselves → allow, cache not consulted
    /// 3. cached decision → returned as-is
    /// 4. PRIVATE subject → requires a viewer→subject FOLLOW edge
    ///    (a pending REQUEST does not count; anonymous viewers are denied)
    /// 5. PUBLIC subject → allowed unless a subject→viewer BLOCK edge
    ///    exists (the reverse direction never denies)
    ///
    /// The decision is cached for `guardian_cache_ttl` seconds and never
    /// explicitly invalidated — relationship changes take effect on the
    /// next cache miss.
    ///
    /// Pass `known_visibility` when the caller already holds the account
    /// record; otherwise it is resolved here. Storage or cache failures
    /// propagate as errors — they are never converted into a deny.
    pub fn can_view(
        &self,
        subject_id: &str,
        known_visibility: Option<Visibility>,
        viewer: &Principal,
    ) -> Result<bool, SocialError> {
        if subject_id.trim().is_empty() {
            return Ok(false);
        }

        // Self-access short-circuits before the cache on purpose: an
        // account's own view must never be hostage to a stale entry.
        if viewer.account_id() == Some(subject_id) {
            return Ok(true);
        }

        let key = decision_key(subject_id, viewer);
        if let Some(cached) = self.kv
            .get(&key)
            .map_err(|e| SocialError::Cache(e.to_string()))?
        {
            return Ok(cached.as_slice() == b"1");
        }

        let visibility = match known_visibility {
            Some(v) => v,
            None => match self.get_record::<Account>("accounts", subject_id) {
                Ok(account) => account.visibility,
                Err(SocialError::NotFound(_)) => return Ok(false),
                Err(e) => return Err(e),
            },
        };

        let allowed = match visibility {
            Visibility::Private => match viewer.account_id() {
                Some(viewer_id) => {
                    self.edge_exists(viewer_id, subject_id, RelationshipKind::Follow)?
                }
                None => false,
            },
            Visibility::Public => match viewer.account_id() {
                Some(viewer_id) => {
                    !self.edge_exists(subject_id, viewer_id, RelationshipKind::Block)?
                }
                None => true,
            },
        };

        self.kv
            .set(
                &key,
                if allowed { b"1" } else { b"0" },
                Some(Duration::from_secs(self.config.guardian_cache_ttl)),
            )
            .map_err(|e| SocialError::Cache(e.to_string()))?;

        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use burrow_kv::{KVStore, MemoryStore, RedbStore};
    use burrow_sql::SqliteStore;

    use super::*;
    use crate::model::CreateAccount;
    use crate::service::SocialConfig;

    /// Guardian tests disable the decision cache (TTL 0) except where the
    /// cache behavior itself is under test.
    fn test_service_with_ttl(ttl: u64) -> Arc<SocialService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(MemoryStore::new());
        SocialService::new(sql, kv, SocialConfig { guardian_cache_ttl: ttl }).unwrap()
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

    fn viewer(account: &Account) -> Principal {
        Principal::Account(account.id.clone())
    }

    #[test]
    fn test_private_requires_follow() {
        let svc = test_service_with_ttl(0);
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);

        assert!(!svc.can_view(&a.id, None, &viewer(&b)).unwrap());

        // A pending request is not enough.
        svc.follow(&b.id, &a.id, None).unwrap();
        assert!(!svc.can_view(&a.id, None, &viewer(&b)).unwrap());

        svc.accept_follow_request(&a.id, &b.id).unwrap();
        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
    }

    #[test]
    fn test_private_denies_anonymous() {
        let svc = test_service_with_ttl(0);
        let a = account(&svc, "A", Visibility::Private);
        assert!(!svc.can_view(&a.id, None, &Principal::Anonymous).unwrap());
    }

    #[test]
    fn test_public_allows_unless_blocked() {
        let svc = test_service_with_ttl(0);
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
        assert!(svc.can_view(&a.id, None, &Principal::Anonymous).unwrap());

        svc.block(&a.id, &b.id, None).unwrap();
        assert!(!svc.can_view(&a.id, None, &viewer(&b)).unwrap());
    }

    #[test]
    fn test_viewer_blocking_subject_does_not_deny() {
        let svc = test_service_with_ttl(0);
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        // B blocks A; B can still view A's public profile.
        svc.block(&b.id, &a.id, None).unwrap();
        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
    }

    #[test]
    fn test_self_access_always_allowed() {
        let svc = test_service_with_ttl(3600);
        let a = account(&svc, "A", Visibility::Private);
        assert!(svc.can_view(&a.id, None, &viewer(&a)).unwrap());
    }

    #[test]
    fn test_blank_or_unknown_subject_denied() {
        let svc = test_service_with_ttl(0);
        let b = account(&svc, "B", Visibility::Public);

        assert!(!svc.can_view("", None, &viewer(&b)).unwrap());
        assert!(!svc.can_view("missing", None, &viewer(&b)).unwrap());
    }

    #[test]
    fn test_known_visibility_skips_account_load() {
        let svc = test_service_with_ttl(0);
        let b = account(&svc, "B", Visibility::Public);

        // The subject row does not exist; the caller-supplied visibility
        // is trusted.
        assert!(svc.can_view("ghost", Some(Visibility::Public), &viewer(&b)).unwrap());
        assert!(!svc.can_view("ghost", Some(Visibility::Private), &viewer(&b)).unwrap());
    }

    #[test]
    fn test_cached_decision_is_returned_within_ttl() {
        let svc = test_service_with_ttl(3600);
        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        // Prime the cache with an allow.
        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());

        // Blocking does not invalidate: the stale allow survives until the
        // TTL runs out (accepted bounded staleness).
        svc.block(&a.id, &b.id, None).unwrap();
        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());

        // Dropping the cached entry restores the live decision.
        svc.kv.delete(&format!("guardian:{}:{}", a.id, b.id)).unwrap();
        assert!(!svc.can_view(&a.id, None, &viewer(&b)).unwrap());
    }

    #[test]
    fn test_decisions_cached_per_viewer() {
        let svc = test_service_with_ttl(3600);
        let a = account(&svc, "A", Visibility::Private);
        let b = account(&svc, "B", Visibility::Public);
        let c = account(&svc, "C", Visibility::Public);

        svc.follow(&b.id, &a.id, None).unwrap();
        svc.accept_follow_request(&a.id, &b.id).unwrap();

        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
        assert!(!svc.can_view(&a.id, None, &viewer(&c)).unwrap());
        assert!(!svc.can_view(&a.id, None, &Principal::Anonymous).unwrap());
    }

    #[test]
    fn test_guardian_over_redb_cache() {
        // Same flow against the persistent cache backend.
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(RedbStore::open(tmp.path()).unwrap());
        let svc =
            SocialService::new(sql, kv, SocialConfig { guardian_cache_ttl: 3600 }).unwrap();

        let a = account(&svc, "A", Visibility::Public);
        let b = account(&svc, "B", Visibility::Public);

        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
        svc.block(&a.id, &b.id, None).unwrap();
        // Cached allow, then live deny once the entry is dropped.
        assert!(svc.can_view(&a.id, None, &viewer(&b)).unwrap());
        svc.kv.delete(&format!("guardian:{}:{}", a.id, b.id)).unwrap();
        assert!(!svc.can_view(&a.id, None, &viewer(&b)).unwrap());
    }
}
