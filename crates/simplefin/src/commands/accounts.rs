//! Accounts command - fetch balances and transactions.

use anyhow::{Context as _, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use console::{Style, style};
use simplefin_client::{Account, AccountSet, AccountsQuery};

use super::Context;

/// Arguments for the accounts command.
#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Use the public demo account
    #[arg(long)]
    pub demo: bool,

    /// Transactions from the last N days
    #[arg(long, conflicts_with = "start_date")]
    pub days: Option<u32>,

    /// Transactions on or after this date (YYYY-MM-DD, UTC)
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<DateTime<Utc>>,

    /// Transactions before this date (YYYY-MM-DD, UTC)
    #[arg(long, value_parser = parse_date)]
    pub end_date: Option<DateTime<Utc>>,

    /// Include pending transactions
    #[arg(long)]
    pub pending: bool,

    /// Only this account ID (repeatable)
    #[arg(long = "account", value_name = "ID")]
    pub accounts: Vec<String>,

    /// Skip transactions and holdings
    #[arg(long)]
    pub balances_only: bool,
}

impl AccountsArgs {
    /// Translate flags into a query, resolving `--days` against `now`.
    fn to_query(&self, now: DateTime<Utc>) -> Result<AccountsQuery> {
        let mut query = AccountsQuery::new()
            .pending(self.pending)
            .accounts(self.accounts.iter().cloned())
            .balances_only(self.balances_only);

        if let Some(days) = self.days {
            let start = Duration::try_days(i64::from(days))
                .and_then(|span| now.checked_sub_signed(span))
                .with_context(|| format!("--days {days} reaches past the earliest supported date"))?;
            query = query.start_date(start);
        }
        if let Some(start) = self.start_date {
            query = query.start_date(start);
        }
        if let Some(end) = self.end_date {
            query = query.end_date(end);
        }
        Ok(query)
    }
}

fn parse_date(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Run the accounts command.
pub async fn run(args: AccountsArgs, ctx: &Context) -> Result<()> {
    let access = ctx.resolve_access_url(args.demo)?;
    let client = ctx.client()?;
    let query = args.to_query(Utc::now())?;

    if ctx.verbose {
        let dim = Style::new().dim();
        eprintln!(
            "{}",
            dim.apply_to(format!(
                "Fetching {}",
                simplefin_client::build_accounts_url(&access, &query)
            ))
        );
    }

    let set = client
        .accounts()
        .fetch(&access, &query)
        .await
        .context("Failed to fetch accounts")?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&set)?);
    } else {
        print_summary(&set);
    }

    Ok(())
}

fn print_summary(set: &AccountSet) {
    let dim = Style::new().dim();

    println!("{}", style("Accounts").bold());
    println!("{}", dim.apply_to("─".repeat(72)));

    if set.accounts.is_empty() {
        println!("{}", dim.apply_to("No accounts"));
    }
    for account in &set.accounts {
        print_account(account);
    }

    for message in set.x_api_message.iter().flatten() {
        println!("{}", dim.apply_to(message));
    }
    if set.has_errors() {
        println!();
        let red = Style::new().red();
        for error in &set.errors {
            println!("{} {}", red.apply_to("!"), error);
        }
    }
}

fn print_account(account: &Account) {
    let dim = Style::new().dim();
    let org = account
        .org
        .name
        .as_deref()
        .or(account.org.domain.as_deref())
        .unwrap_or(&account.org.sfin_url);

    println!(
        "{:<32} {:>14} {}",
        truncate(&account.name, 32),
        style(&account.balance).cyan(),
        account.currency
    );

    let mut detail = format!("  {} · {}", org, account.id);
    if let Some(available) = &account.available_balance {
        detail.push_str(&format!(" · available {available}"));
    }
    if let Some(transactions) = &account.transactions {
        let pending = transactions.iter().filter(|tx| tx.is_pending()).count();
        detail.push_str(&format!(" · {} transactions", transactions.len()));
        if pending > 0 {
            detail.push_str(&format!(" ({pending} pending)"));
        }
    }
    if !account.holdings().is_empty() {
        detail.push_str(&format!(" · {} holdings", account.holdings().len()));
    }
    println!("{}", dim.apply_to(detail));
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
