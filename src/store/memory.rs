//! In-process storage backend
//!
//! Keeps every table in a `HashMap` behind a single `tokio::sync::RwLock`.
//! User insertion order is tracked explicitly so list pagination is stable
//! across calls.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Swipe, Uni, User};
use crate::store::{Store, StoreResult};

#[derive(Default)]
struct Tables {
    users: HashMap<Uni, User>,
    user_order: Vec<Uni>,
    swipes: HashMap<i64, Swipe>,
    swipe_ledger: HashMap<Uni, i64>,
    donor_points: HashMap<Uni, i64>,
}

/// Map-backed [`Store`] with no durability across restarts
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, uni: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(uni).cloned())
    }

    async fn put_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.uni) {
            tables.user_order.push(user.uni.clone());
        }
        tables.users.insert(user.uni.clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, uni: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.users.remove(uni).is_some();
        if existed {
            tables.user_order.retain(|entry| entry != uni);
        }
        Ok(existed)
    }

    async fn list_users(&self, offset: u64, limit: u64) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        let users = tables
            .user_order
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .filter_map(|uni| tables.users.get(uni).cloned())
            .collect();
        Ok(users)
    }

    async fn get_swipe(&self, swipe_id: i64) -> StoreResult<Option<Swipe>> {
        let tables = self.tables.read().await;
        Ok(tables.swipes.get(&swipe_id).cloned())
    }

    async fn put_swipe(&self, swipe: &Swipe) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.swipes.insert(swipe.swipe_id, swipe.clone());
        Ok(())
    }

    async fn swipe_balance(&self, uni: &str) -> StoreResult<Option<i64>> {
        let tables = self.tables.read().await;
        Ok(tables.swipe_ledger.get(uni).copied())
    }

    async fn adjust_swipe_balance(&self, uni: &str, delta: i64) -> StoreResult<i64> {
        let mut tables = self.tables.write().await;
        let balance = tables.swipe_ledger.entry(uni.to_string()).or_insert(0);
        *balance += delta;
        Ok(*balance)
    }

    async fn points(&self, uni: &str) -> StoreResult<Option<i64>> {
        let tables = self.tables.read().await;
        Ok(tables.donor_points.get(uni).copied())
    }

    async fn set_points(&self, uni: &str, points: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.donor_points.insert(uni.to_string(), points);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uni: &str) -> User {
        User::new(uni.to_string(), format!("hash-{uni}"))
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put_user(&user("abc1")).await.unwrap();

        let fetched = store.get_user("abc1").await.unwrap();
        assert_eq!(fetched, Some(user("abc1")));
        assert_eq!(store.get_user("zzz9").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_without_duplicating_order() {
        let store = MemoryStore::new();
        store.put_user(&user("abc1")).await.unwrap();

        let mut updated = user("abc1");
        updated.num_of_swipes_given = 3;
        store.put_user(&updated).await.unwrap();

        let listed = store.list_users(0, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].num_of_swipes_given, 3);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = MemoryStore::new();
        store.put_user(&user("abc1")).await.unwrap();

        assert!(store.delete_user("abc1").await.unwrap());
        assert!(!store.delete_user("abc1").await.unwrap());
        assert!(store.list_users(0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_slices_in_insertion_order() {
        let store = MemoryStore::new();
        for i in 0..15 {
            store.put_user(&user(&format!("uni{i:02}"))).await.unwrap();
        }

        let page = store.list_users(10, 10).await.unwrap();
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].uni, "uni10");
        assert_eq!(page[4].uni, "uni14");

        assert!(store.list_users(20, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ledger_starts_at_zero_and_may_go_negative() {
        let store = MemoryStore::new();
        assert_eq!(store.swipe_balance("aaa1").await.unwrap(), None);

        assert_eq!(store.adjust_swipe_balance("aaa1", -1).await.unwrap(), -1);
        assert_eq!(store.adjust_swipe_balance("aaa1", -1).await.unwrap(), -2);
        assert_eq!(store.swipe_balance("aaa1").await.unwrap(), Some(-2));
    }

    #[tokio::test]
    async fn points_entries_are_explicit() {
        let store = MemoryStore::new();
        assert_eq!(store.points("aaa1").await.unwrap(), None);

        store.set_points("aaa1", 40).await.unwrap();
        assert_eq!(store.points("aaa1").await.unwrap(), Some(40));
    }
}
