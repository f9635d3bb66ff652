//! Async client SDK for the SimpleFIN bridge protocol.
//!
//! SimpleFIN has two calls: redeem a one-time setup token for a
//! credential-bearing access URL, then fetch accounts with that URL's
//! credentials.
//!
//! # Example
//!
//! ```no_run
//! use chrono::{Duration, Utc};
//! use simplefin_client::{AccountsQuery, Result, SimplefinClient};
//!
//! # async fn example(setup_token: &str) -> Result<()> {
//! let client = SimplefinClient::new()?;
//!
//! // One-time exchange. Store the result; the token cannot be reused.
//! let access = client.auth().exchange(setup_token).await?;
//!
//! let query = AccountsQuery::new()
//!     .start_date(Utc::now() - Duration::days(30))
//!     .pending(true);
//! let set = client.accounts().fetch(&access, &query).await?;
//!
//! for account in &set.accounts {
//!     println!("{}: {} {}", account.name, account.balance, account.currency);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every operation returns [`Result`], whose [`Error`] is a closed enum:
//! invalid access URLs, used setup tokens, unexpected statuses, decoding
//! failures and transport failures are distinct variants.

pub mod access_url;
pub mod api;
pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use access_url::{AccessUrl, BRIDGE_HOST};
pub use api::{AccountsQuery, build_accounts_url, decode_setup_token};
pub use client::{ClientBuilder, SimplefinClient};
pub use error::{DecodeError, Error, InvalidAccessUrl, Result};
pub use retry::RetryConfig;
pub use types::*;
