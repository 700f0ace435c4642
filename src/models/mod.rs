mod account;

pub use account::{Account, AccountLookup, AccountRow, NewAccount};
