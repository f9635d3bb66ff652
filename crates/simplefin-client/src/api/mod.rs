//! API endpoint implementations.

mod accounts;
mod auth;

pub use accounts::{AccountsApi, AccountsQuery, build_accounts_url};
pub use auth::{AuthApi, decode_setup_token};
