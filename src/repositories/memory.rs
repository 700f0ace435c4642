//! Process-local account store.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountLookup, NewAccount};
use crate::services::ports::AccountStore;

const ENTITY: &str = "accounts";

/// Accounts keyed by id, with unique indexes on username and email.
///
/// A username is reserved before its email; if the email turns out to be
/// taken the reservation is released, so two concurrent creates can never
/// both claim the same key.
#[derive(Debug)]
pub struct MemoryAccountStore {
    accounts: DashMap<i32, Account>,
    by_username: DashMap<String, i32>,
    by_email: DashMap<String, i32>,
    next_id: AtomicI32,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            by_username: DashMap::new(),
            by_email: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn duplicate(field: &str, value: &str) -> AppError {
        AppError::Duplicate {
            entity: ENTITY.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_one(&self, lookup: &AccountLookup) -> AppResult<Option<Account>> {
        let index = match lookup {
            AccountLookup::Username(_) => &self.by_username,
            AccountLookup::Email(_) => &self.by_email,
        };

        let Some(id) = index.get(lookup.value()).map(|entry| *entry.value()) else {
            return Ok(None);
        };

        Ok(self
            .accounts
            .get(&id)
            .map(|entry| entry.value().clone())
            .filter(|account| lookup.matches(account)))
    }

    async fn create(&self, new_account: NewAccount) -> AppResult<Account> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        match self.by_username.entry(new_account.username.clone()) {
            Entry::Occupied(_) => return Err(Self::duplicate("username", &new_account.username)),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        match self.by_email.entry(new_account.email.clone()) {
            Entry::Occupied(_) => {
                self.by_username.remove(&new_account.username);
                return Err(Self::duplicate("email", &new_account.email));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let account = Account {
            id,
            first_name: new_account.first_name,
            last_name: new_account.last_name,
            username: new_account.username,
            email: new_account.email,
            password_hash: new_account.password,
            created_at: jiff::Timestamp::now(),
        };
        self.accounts.insert(id, account.clone());

        Ok(account)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
