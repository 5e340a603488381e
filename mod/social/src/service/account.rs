use burrow_core::{merge_patch, new_id, now_rfc3339, ListParams, ListResult};
use burrow_sql::Value;

use crate::model::{Account, CreateAccount};
use crate::service::{SocialError, SocialService};

impl SocialService {
    /// Create a new account.
    pub fn create_account(&self, input: CreateAccount) -> Result<Account, SocialError> {
        if input.name.trim().is_empty() {
            return Err(SocialError::Validation("account name cannot be empty".into()));
        }

        let now = now_rfc3339();
        let account = Account {
            id: new_id(),
            name: input.name,
            handle: input.handle,
            bio: input.bio,
            visibility: input.visibility,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let mut indexes: Vec<(&str, Value)> = vec![
            ("name", Value::Text(account.name.clone())),
            ("visibility", Value::Text(account.visibility.as_str().to_string())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ];
        if let Some(ref handle) = account.handle {
            indexes.push(("handle", Value::Text(handle.clone())));
        }

        self.insert_record("accounts", &account.id, &account, &indexes)
            .map_err(|e| match e {
                SocialError::Conflict(_) => {
                    SocialError::HandleTaken(account.handle.clone().unwrap_or_default())
                }
                other => other,
            })?;
        Ok(account)
    }

    /// Get an account by id.
    pub fn get_account(&self, id: &str) -> Result<Account, SocialError> {
        self.get_record("accounts", id)
    }

    /// List accounts with pagination.
    pub fn list_accounts(&self, params: &ListParams) -> Result<ListResult<Account>, SocialError> {
        let (items, total) = self.list_records("accounts", params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    /// Update an account with JSON merge-patch semantics.
    ///
    /// Visibility may be switched here; existing guardian cache entries for
    /// the account simply age out within the TTL.
    pub fn update_account(&self, id: &str, patch: serde_json::Value) -> Result<Account, SocialError> {
        let current: Account = self.get_record("accounts", id)?;
        let now = now_rfc3339();

        let mut base = serde_json::to_value(&current)
            .map_err(|e| SocialError::Internal(e.to_string()))?;
        merge_patch(&mut base, &patch);
        // Force updated_at and preserve id/created_at
        base["updated_at"] = serde_json::json!(now);
        base["id"] = serde_json::json!(current.id);
        base["created_at"] = serde_json::json!(current.created_at);

        let updated: Account = serde_json::from_value(base)
            .map_err(|e| SocialError::Validation(e.to_string()))?;

        let mut indexes: Vec<(&str, Value)> = vec![
            ("name", Value::Text(updated.name.clone())),
            ("visibility", Value::Text(updated.visibility.as_str().to_string())),
            ("updated_at", Value::Text(now)),
        ];
        match updated.handle {
            Some(ref handle) => indexes.push(("handle", Value::Text(handle.clone()))),
            None => indexes.push(("handle", Value::Null)),
        }

        self.update_record("accounts", id, &updated, &indexes)
            .map_err(|e| match e {
                SocialError::Conflict(_) => {
                    SocialError::HandleTaken(updated.handle.clone().unwrap_or_default())
                }
                other => other,
            })?;
        Ok(updated)
    }

    /// Delete an account and every relationship edge touching it.
    pub fn delete_account(&self, id: &str) -> Result<(), SocialError> {
        // Edges cascade via the schema's foreign keys, but clear them
        // explicitly as well so stores without cascade support stay clean.
        self.sql
            .exec(
                "DELETE FROM relationships WHERE from_id = ?1 OR to_id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| SocialError::Storage(e.to_string()))?;

        self.delete_record("accounts", id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use burrow_kv::MemoryStore;
    use burrow_sql::SqliteStore;

    use super::*;
    use crate::model::Visibility;
    use crate::service::SocialConfig;

    fn test_service() -> Arc<SocialService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        let kv = Arc::new(MemoryStore::new());
        SocialService::new(sql, kv, SocialConfig::default()).unwrap()
    }

    fn create(svc: &SocialService, name: &str, visibility: Visibility) -> Account {
        svc.create_account(CreateAccount {
            name: name.to_string(),
            handle: Some(name.to_lowercase()),
            bio: None,
            visibility,
        })
        .unwrap()
    }

    #[test]
    fn test_account_crud() {
        let svc = test_service();

        let account = create(&svc, "Mole", Visibility::Public);
        assert_eq!(account.visibility, Visibility::Public);

        let fetched = svc.get_account(&account.id).unwrap();
        assert_eq!(fetched.name, "Mole");

        let list = svc.list_accounts(&ListParams::default()).unwrap();
        assert_eq!(list.total, 1);

        // Merge-patch: flip visibility, keep everything else.
        let updated = svc
            .update_account(&account.id, serde_json::json!({"visibility": "private"}))
            .unwrap();
        assert_eq!(updated.visibility, Visibility::Private);
        assert_eq!(updated.name, "Mole");
        assert_eq!(updated.created_at, account.created_at);

        svc.delete_account(&account.id).unwrap();
        assert!(matches!(
            svc.get_account(&account.id),
            Err(SocialError::NotFound(_))
        ));
    }

    #[test]
    fn test_handle_uniqueness() {
        let svc = test_service();
        create(&svc, "Mole", Visibility::Public);

        let err = svc
            .create_account(CreateAccount {
                name: "Imposter".to_string(),
                handle: Some("mole".to_string()),
                bio: None,
                visibility: Visibility::Public,
            })
            .unwrap_err();
        assert_eq!(err.code(), "HANDLE_TAKEN");
    }

    #[test]
    fn test_delete_account_clears_edges() {
        let svc = test_service();
        let a = create(&svc, "A", Visibility::Public);
        let b = create(&svc, "B", Visibility::Public);

        svc.follow(&a.id, &b.id, None).unwrap();
        svc.follow(&b.id, &a.id, None).unwrap();

        svc.delete_account(&b.id).unwrap();

        let rows = svc
            .sql
            .query("SELECT id FROM relationships", &[])
            .unwrap();
        assert!(rows.is_empty());
    }
}
