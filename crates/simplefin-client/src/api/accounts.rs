//! Accounts API.

use chrono::{DateTime, Utc};
use url::Url;

use crate::access_url::AccessUrl;
use crate::client::{SimplefinClient, body_if_ok};
use crate::error::{DecodeError, Result};
use crate::types::AccountSet;

const ENDPOINT: &str = "fetch accounts";

/// Query parameters for the accounts endpoint.
///
/// Every field is optional. Flags that are `false` are omitted from the
/// request entirely rather than sent as `0`. Date ranges are passed through
/// as given, inverted or not; the bridge decides what they mean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountsQuery {
    /// Only transactions on or after this instant.
    pub start_date: Option<DateTime<Utc>>,
    /// Only transactions before this instant.
    pub end_date: Option<DateTime<Utc>>,
    /// Include pending transactions.
    pub pending: bool,
    /// Restrict to these account IDs, in order.
    pub account_ids: Vec<String>,
    /// Skip transactions and holdings.
    pub balances_only: bool,
}

impl AccountsQuery {
    /// An empty query: all accounts, default transaction window.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Add one account ID to the filter.
    pub fn account(mut self, id: impl Into<String>) -> Self {
        self.account_ids.push(id.into());
        self
    }

    /// Add several account IDs to the filter.
    pub fn accounts<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.account_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn balances_only(mut self, balances_only: bool) -> Self {
        self.balances_only = balances_only;
        self
    }

    /// Query pairs in wire order: `start-date`, `end-date`, `pending`,
    /// one `account` per ID, `balances-only`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start_date {
            pairs.push(("start-date", start.timestamp().to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("end-date", end.timestamp().to_string()));
        }
        if self.pending {
            pairs.push(("pending", "1".to_string()));
        }
        for id in &self.account_ids {
            pairs.push(("account", id.clone()));
        }
        if self.balances_only {
            pairs.push(("balances-only", "1".to_string()));
        }
        pairs
    }
}

/// The full accounts request URL for `access` and `query`.
pub fn build_accounts_url(access: &AccessUrl, query: &AccountsQuery) -> Url {
    let mut url = access.accounts_url();
    let pairs = query.to_pairs();
    // An empty `query_pairs_mut` would still leave a dangling `?`.
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    url
}

/// Accounts API client.
pub struct AccountsApi {
    client: SimplefinClient,
}

impl AccountsApi {
    pub(crate) fn new(client: SimplefinClient) -> Self {
        Self { client }
    }

    /// Fetch accounts with the bridge's default window.
    pub async fn fetch_all(&self, access: &AccessUrl) -> Result<AccountSet> {
        self.fetch(access, &AccountsQuery::default()).await
    }

    /// Fetch accounts, transactions and holdings.
    ///
    /// A non-200 status is an [`Error::Api`](crate::Error::Api) carrying the
    /// body; a 200 whose body does not decode is an
    /// [`Error::Decode`](crate::Error::Decode).
    pub async fn fetch(&self, access: &AccessUrl, query: &AccountsQuery) -> Result<AccountSet> {
        let url = build_accounts_url(access, query);
        let response = self.client.get_json_authed(url, access).await?;
        let body = body_if_ok(response, ENDPOINT).await?;

        let set: AccountSet = serde_json::from_str(&body).map_err(DecodeError::from)?;
        tracing::debug!(
            accounts = set.accounts.len(),
            errors = set.errors.len(),
            "Fetched accounts"
        );
        Ok(set)
    }
}
