use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::users::repo::UserStore;
use crate::users::repo_types::{Assignment, NewUser, User};

#[derive(Default)]
struct Table {
    rows: BTreeMap<i64, User>,
    last_id: i64,
}

/// Process-local `UserStore`. Ids come from a sequence that never rewinds,
/// and a duplicate email fails the insert like a unique constraint would.
#[derive(Default)]
pub struct InMemoryUserStore {
    table: RwLock<Table>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn query_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn query_by_id(&self, user_id: i64) -> anyhow::Result<Vec<User>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .get(&user_id)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn query_by_email(&self, email: &str) -> anyhow::Result<Vec<User>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<u64> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == user.email) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }
        table.last_id += 1;
        let user_id = table.last_id;
        table.rows.insert(user_id, user.clone().into_user(user_id));
        Ok(1)
    }

    async fn update(&self, email: &str, assignments: &[Assignment]) -> anyhow::Result<u64> {
        if assignments.is_empty() {
            anyhow::bail!("update of {email} carries no assignments");
        }
        let mut table = self.table.write().await;
        let mut affected = 0;
        for user in table.rows.values_mut().filter(|u| u.email == email) {
            for assignment in assignments {
                assignment.apply(user);
            }
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, user_id: i64) -> anyhow::Result<u64> {
        let removed = self.table.write().await.rows.remove(&user_id);
        Ok(u64::from(removed.is_some()))
    }
}
