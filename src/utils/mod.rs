pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtIssuer};
pub use password::{Argon2Hasher, hash_password, verify_password};
