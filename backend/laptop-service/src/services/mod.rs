pub mod auth;
pub mod seed;

pub use auth::TokenIssuer;
pub use seed::{parse_seed_users, seed_users, SeedUser};
