// Authentication module
// Caches the platform access token and refreshes it on demand

mod manager;
mod refresh;
mod types;

pub use manager::{TokenManager, TOKEN_LIFETIME_DAYS};
pub use types::Credential;
