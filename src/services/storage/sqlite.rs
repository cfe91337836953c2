use std::sync::Mutex;

use rusqlite::Connection;

use super::KeyValueStore;
use crate::db::{self, queries};

/// Draft persistence for native clients, one row per key.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        Ok(Self {
            conn: Mutex::new(db::init_db(path)?),
        })
    }

    fn conn(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("sqlite store lock poisoned"))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let conn = self.conn()?;
        queries::get_value(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let conn = self.conn()?;
        queries::set_value(&conn, key, value)
    }

    fn clear(&self, key: &str) -> anyhow::Result<()> {
        let conn = self.conn()?;
        queries::delete_value(&conn, key)?;
        Ok(())
    }
}
