use diesel::prelude::*;
use serde::Serialize;

/// Row read from the `accounts` table
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountRow {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: jiff_diesel::Timestamp,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            email: row.email,
            password_hash: row.password,
            created_at: row.created_at.to_jiff(),
        }
    }
}

/// A stored account.
///
/// `password_hash` is a PHC string and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: jiff::Timestamp,
}

/// Values for a new `accounts` row; `password` already holds the hash
#[derive(Debug, Insertable, Clone, PartialEq, Eq)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Unique key an account can be looked up by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountLookup {
    Username(String),
    Email(String),
}

impl AccountLookup {
    /// Name of the field this lookup matches on, as clients send it
    pub fn field(&self) -> &'static str {
        match self {
            AccountLookup::Username(_) => "username",
            AccountLookup::Email(_) => "email",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            AccountLookup::Username(value) | AccountLookup::Email(value) => value,
        }
    }

    pub fn matches(&self, account: &Account) -> bool {
        match self {
            AccountLookup::Username(username) => account.username == *username,
            AccountLookup::Email(email) => account.email == *email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: 7,
            first_name: "alice".to_string(),
            last_name: "smith".to_string(),
            username: "alices".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$v=19$...".to_string(),
            created_at: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_lookup_matches() {
        let account = account();
        assert!(AccountLookup::Username("alices".to_string()).matches(&account));
        assert!(AccountLookup::Email("alice@example.com".to_string()).matches(&account));
        assert!(!AccountLookup::Username("alice@example.com".to_string()).matches(&account));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let value = serde_json::to_value(account()).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["firstName"], "alice");
    }
}
