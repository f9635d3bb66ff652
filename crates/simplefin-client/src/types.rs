//! Response types for the SimpleFIN protocol.
//!
//! These types mirror the bridge's JSON wire format. Monetary amounts stay
//! decimal strings exactly as sent; timestamps stay Unix epoch seconds, with
//! `chrono` accessors for convenience. Unknown fields are ignored so newer
//! bridges keep decoding.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Accounts
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level response of the accounts endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSet {
    /// Protocol-level errors reported by the bridge.
    pub errors: Vec<String>,
    /// Accounts visible to the access URL.
    pub accounts: Vec<Account>,
    /// Informational messages from the bridge.
    #[serde(
        rename = "x-api-message",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub x_api_message: Option<Vec<String>>,
}

impl AccountSet {
    /// Look up an account by its ID.
    pub fn find_account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Whether the bridge reported any protocol-level errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A single account at a financial institution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Institution holding the account.
    pub org: Organization,
    /// Account ID, unique within the bridge.
    pub id: String,
    pub name: String,
    /// ISO 4217 code or a custom currency URL.
    pub currency: String,
    /// Decimal string.
    pub balance: String,
    /// Decimal string.
    #[serde(
        rename = "available-balance",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub available_balance: Option<String>,
    /// When `balance` was last known to be correct (epoch seconds).
    #[serde(rename = "balance-date")]
    pub balance_date: i64,
    /// Absent when the request asked for balances only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Transaction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<Holding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, String>>,
}

impl Account {
    /// `balance_date` as a UTC timestamp.
    pub fn balance_date_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.balance_date, 0)
    }

    /// Transactions, or an empty slice when none were returned.
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.as_deref().unwrap_or_default()
    }

    /// Holdings, or an empty slice when none were returned.
    pub fn holdings(&self) -> &[Holding] {
        self.holdings.as_deref().unwrap_or_default()
    }
}

/// Institution metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Root URL of the institution's SimpleFIN server.
    #[serde(rename = "sfin-url")]
    pub sfin_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A posted or pending transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Posting time (epoch seconds). `0` for pending transactions.
    pub posted: i64,
    /// Decimal string, negative for debits.
    pub amount: String,
    pub description: String,
    pub payee: String,
    pub memo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transacted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, String>>,
}

impl Transaction {
    /// `posted` as a UTC timestamp.
    pub fn posted_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.posted, 0)
    }

    /// `transacted_at` as a UTC timestamp, when present.
    pub fn transacted_at_utc(&self) -> Option<DateTime<Utc>> {
        self.transacted_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Whether the bridge flagged this transaction as pending.
    pub fn is_pending(&self) -> bool {
        self.pending.unwrap_or(false)
    }
}

/// An investment position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    /// Epoch seconds.
    pub created: i64,
    pub cost_basis: String,
    pub currency: String,
    pub description: String,
    pub market_value: String,
    pub purchase_price: String,
    pub shares: String,
    pub symbol: String,
}

impl Holding {
    /// `created` as a UTC timestamp.
    pub fn created_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "errors": [],
        "accounts": [
            {
                "org": {"sfin-url": "https://example.com"},
                "id": "acc1",
                "name": "Test Account",
                "currency": "USD",
                "balance": "100.00",
                "balance-date": 1700000000
            }
        ]
    }"#;

    const FULL: &str = r#"{
        "errors": ["Connection to Bank of Nowhere may need attention"],
        "x-api-message": ["demo mode"],
        "accounts": [
            {
                "org": {
                    "domain": "mybank.com",
                    "sfin-url": "https://sfin.mybank.com",
                    "name": "My Bank",
                    "url": "https://mybank.com",
                    "id": "org-1"
                },
                "id": "acc1",
                "name": "Checking",
                "currency": "USD",
                "balance": "-1234.56",
                "available-balance": "100.01",
                "balance-date": 1700000000,
                "transactions": [
                    {
                        "id": "tx1",
                        "posted": 1699990000,
                        "amount": "-33.20",
                        "description": "Café \"Zürich\" & Co",
                        "payee": "Café",
                        "memo": "",
                        "transacted_at": 1699980000,
                        "pending": true,
                        "extra": {"category": "food"}
                    }
                ],
                "holdings": [
                    {
                        "id": "h1",
                        "created": 1690000000,
                        "cost_basis": "1000.00",
                        "currency": "USD",
                        "description": "Index fund",
                        "market_value": "1200.50",
                        "purchase_price": "100.00",
                        "shares": "10.5",
                        "symbol": "VTI"
                    }
                ],
                "extra": {"nickname": "main"}
            }
        ]
    }"#;

    #[test]
    fn test_minimal_response() {
        let set: AccountSet = serde_json::from_str(MINIMAL).unwrap();

        assert!(set.errors.is_empty());
        assert!(set.x_api_message.is_none());
        assert_eq!(set.accounts.len(), 1);

        let account = &set.accounts[0];
        assert_eq!(account.id, "acc1");
        assert_eq!(account.org.sfin_url, "https://example.com");
        assert!(account.org.name.is_none());
        assert!(account.available_balance.is_none());
        assert!(account.transactions.is_none());
        assert!(account.holdings.is_none());
        assert!(account.extra.is_none());
        assert!(account.transactions().is_empty());
        assert!(account.holdings().is_empty());
    }

    #[test]
    fn test_full_response() {
        let set: AccountSet = serde_json::from_str(FULL).unwrap();

        assert!(set.has_errors());
        assert_eq!(set.x_api_message.as_deref(), Some(&["demo mode".to_string()][..]));

        let account = set.find_account("acc1").unwrap();
        assert_eq!(account.balance, "-1234.56");
        assert_eq!(account.available_balance.as_deref(), Some("100.01"));
        assert_eq!(account.org.domain.as_deref(), Some("mybank.com"));
        assert_eq!(account.extra.as_ref().unwrap()["nickname"], "main");

        let tx = &account.transactions()[0];
        assert_eq!(tx.amount, "-33.20");
        assert_eq!(tx.description, "Café \"Zürich\" & Co");
        assert_eq!(tx.transacted_at, Some(1699980000));
        assert!(tx.is_pending());

        let holding = &account.holdings()[0];
        assert_eq!(holding.symbol, "VTI");
        assert_eq!(holding.shares, "10.5");

        assert!(set.find_account("missing").is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "errors": [],
            "accounts": [],
            "something-new": {"nested": true}
        }"#;
        let set: AccountSet = serde_json::from_str(json).unwrap();
        assert!(set.accounts.is_empty());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let json = r#"{"errors": [], "accounts": [{"id": "acc1"}]}"#;
        assert!(serde_json::from_str::<AccountSet>(json).is_err());
    }

    #[test]
    fn test_reencode_is_lossless() {
        for raw in [MINIMAL, FULL] {
            let set: AccountSet = serde_json::from_str(raw).unwrap();
            let encoded = serde_json::to_string(&set).unwrap();
            let decoded: AccountSet = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, set);
        }
    }

    #[test]
    fn test_absent_optionals_are_not_emitted() {
        let set: AccountSet = serde_json::from_str(MINIMAL).unwrap();
        let value = serde_json::to_value(&set).unwrap();

        assert!(value.get("x-api-message").is_none());
        let account = &value["accounts"][0];
        assert!(account.get("available-balance").is_none());
        assert!(account.get("transactions").is_none());
        assert_eq!(account["balance-date"], 1700000000);
    }

    #[test]
    fn test_timestamp_helpers() {
        let set: AccountSet = serde_json::from_str(FULL).unwrap();
        let account = &set.accounts[0];

        assert_eq!(account.balance_date_utc().unwrap().timestamp(), 1700000000);
        let tx = &account.transactions()[0];
        assert_eq!(tx.posted_utc().unwrap().timestamp(), 1699990000);
        assert_eq!(tx.transacted_at_utc().unwrap().timestamp(), 1699980000);
        assert_eq!(account.holdings()[0].created_utc().unwrap().timestamp(), 1690000000);
    }
}
