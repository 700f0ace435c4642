//! Account stores.
//!
//! Both implement [`AccountStore`](crate::services::ports::AccountStore);
//! which one the server uses is chosen by `store.backend`.

mod account_repo;
mod memory;

pub use account_repo::AccountRepository;
pub use memory::MemoryAccountStore;
