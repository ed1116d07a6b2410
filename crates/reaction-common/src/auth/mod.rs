//! Authentication utilities

mod jwt;

pub use jwt::{Claims, JwtService, REMEMBER_ME_SCOPE};
