//! In-memory `UserStore` used by unit tests.

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{repo::UserStore, repo_types::User};

#[derive(Default)]
pub struct FakeUserStore {
    rows: Mutex<Rows>,
    table_exists: AtomicBool,
    schema_failures_left: AtomicU32,
    schema_calls: AtomicU32,
    tables_created: AtomicU32,
    queries_fail: AtomicBool,
}

struct Rows {
    users: Vec<User>,
    next_id: i32,
}

impl Default for Rows {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }
}

impl FakeUserStore {
    /// Store whose `users` table already exists.
    pub fn ready() -> Self {
        let store = Self::default();
        store.table_exists.store(true, Ordering::SeqCst);
        store
    }

    /// The next `n` schema operations fail as if the database were down.
    pub fn failing_schema_calls(n: u32) -> Self {
        let store = Self::default();
        store.schema_failures_left.store(n, Ordering::SeqCst);
        store
    }

    pub fn fail_queries(&self, fail: bool) {
        self.queries_fail.store(fail, Ordering::SeqCst);
    }

    pub fn table_exists(&self) -> bool {
        self.table_exists.load(Ordering::SeqCst)
    }

    pub fn schema_calls(&self) -> u32 {
        self.schema_calls.load(Ordering::SeqCst)
    }

    pub fn tables_created(&self) -> u32 {
        self.tables_created.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<User> {
        self.rows.lock().unwrap().users.clone()
    }

    fn schema_call(&self) -> anyhow::Result<()> {
        self.schema_calls.fetch_add(1, Ordering::SeqCst);
        let left = self.schema_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.schema_failures_left.store(left - 1, Ordering::SeqCst);
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    fn query_call(&self) -> anyhow::Result<()> {
        if self.queries_fail.load(Ordering::SeqCst) {
            anyhow::bail!("connection reset by peer");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn users_table_exists(&self) -> anyhow::Result<bool> {
        self.schema_call()?;
        Ok(self.table_exists())
    }

    async fn create_users_table(&self) -> anyhow::Result<()> {
        self.schema_call()?;
        self.table_exists.store(true, Ordering::SeqCst);
        self.tables_created.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        self.query_call()?;
        Ok(self.rows())
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<User>> {
        self.query_call()?;
        Ok(self.rows().into_iter().find(|u| u.id == id))
    }

    async fn create(&self, name: Option<&str>, email: Option<&str>) -> anyhow::Result<User> {
        self.query_call()?;
        let mut rows = self.rows.lock().unwrap();
        let user = User {
            id: rows.next_id,
            name: name.map(str::to_owned),
            email: email.map(str::to_owned),
        };
        rows.next_id += 1;
        rows.users.push(user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        self.query_call()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.users.iter_mut().find(|u| u.id == id).map(|u| {
            u.name = name.map(str::to_owned);
            u.email = email.map(str::to_owned);
            u.clone()
        }))
    }

    async fn delete(&self, id: i32) -> anyhow::Result<Option<User>> {
        self.query_call()?;
        let mut rows = self.rows.lock().unwrap();
        let pos = rows.users.iter().position(|u| u.id == id);
        Ok(pos.map(|i| rows.users.remove(i)))
    }

    async fn delete_all(&self) -> anyhow::Result<()> {
        self.query_call()?;
        *self.rows.lock().unwrap() = Rows::default();
        Ok(())
    }

    async fn close(&self) {}
}
