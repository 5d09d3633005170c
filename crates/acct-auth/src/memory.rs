use super::*;
use acct_core::ID;
use acct_core::Unique;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;

/// In-process store with the same semantics as the PostgreSQL one:
/// unique emails, one token row per user, cascade on user delete.
#[derive(Debug, Default)]
pub struct Memory {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    serial: i64,
    users: BTreeMap<ID<User>, (User, String)>,
    tokens: BTreeMap<ID<User>, Vec<u8>>,
}

impl Memory {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
    pub fn count(&self) -> usize {
        self.tables().users.len()
    }
    /// Token rows held for one user.
    pub fn records(&self, user: ID<User>) -> usize {
        self.tables().tokens.contains_key(&user) as usize
    }
}

impl UserRepository for Memory {
    async fn exists(&self, email: &str) -> Result<bool, Error> {
        Ok(self.tables().users.values().any(|(u, _)| u.email() == email))
    }

    async fn create(&self, name: &str, email: &str, hashword: &str) -> Result<ID<User>, Error> {
        let mut tables = self.tables();
        if tables.users.values().any(|(u, _)| u.email() == email) {
            return Err(Error::DuplicateUser);
        }
        tables.serial += 1;
        let id = ID::from(tables.serial);
        let now = SystemTime::now();
        let user = User::new(id, name.to_string(), email.to_string(), now, now);
        tables.users.insert(id, (user, hashword.to_string()));
        Ok(id)
    }

    async fn credentials(&self, email: &str) -> Result<Option<(ID<User>, String)>, Error> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|(u, _)| u.email() == email)
            .map(|(u, hashword)| (u.id(), hashword.clone())))
    }

    async fn user(&self, id: ID<User>) -> Result<Option<User>, Error> {
        Ok(self.tables().users.get(&id).map(|(u, _)| u.clone()))
    }

    async fn users(&self) -> Result<Vec<User>, Error> {
        Ok(self.tables().users.values().map(|(u, _)| u.clone()).collect())
    }

    async fn update(&self, id: ID<User>, name: &str, hashword: &str) -> Result<u64, Error> {
        let mut tables = self.tables();
        match tables.users.get_mut(&id) {
            None => Ok(0),
            Some((user, stored)) => {
                *user = User::new(
                    id,
                    name.to_string(),
                    user.email().to_string(),
                    user.created_at(),
                    SystemTime::now(),
                );
                *stored = hashword.to_string();
                Ok(1)
            }
        }
    }

    async fn delete(&self, id: ID<User>) -> Result<u64, Error> {
        let mut tables = self.tables();
        tables.tokens.remove(&id);
        Ok(tables.users.remove(&id).map_or(0, |_| 1))
    }
}

impl TokenRegistry for Memory {
    async fn upsert(&self, record: &TokenRecord) -> Result<u64, Error> {
        let mut tables = self.tables();
        if !tables.users.contains_key(&record.user()) {
            return Ok(0);
        }
        tables.tokens.insert(record.user(), record.hash().to_vec());
        Ok(1)
    }

    async fn find(&self, hash: &[u8]) -> Result<Option<TokenRecord>, Error> {
        Ok(self
            .tables()
            .tokens
            .iter()
            .find(|(_, stored)| stored.as_slice() == hash)
            .map(|(user, stored)| TokenRecord::new(*user, stored.clone())))
    }

    async fn swap(&self, old: &[u8], new: &[u8]) -> Result<u64, Error> {
        let mut tables = self.tables();
        match tables.tokens.values_mut().find(|stored| stored.as_slice() == old) {
            None => Ok(0),
            Some(stored) => {
                *stored = new.to_vec();
                Ok(1)
            }
        }
    }
}
