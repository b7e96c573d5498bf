//! Account store - the authoritative list of accounts

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{derive_username, Account};

/// Ordered, exclusively owned collection of accounts
///
/// Usernames are derived for every account when the store is built. If two
/// owners share initials the later account gets a numeric suffix
/// (`am`, `am2`, `am3`, ...), so lookups are never ambiguous.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    /// Build a store, validating every account and deriving usernames
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Result<Self> {
        let mut store = Self::default();
        for mut account in accounts {
            account
                .validate()
                .map_err(|e| Error::rejected(format!("{}: {}", account.owner, e)))?;
            account.currency = Account::normalize_currency(&account.currency);
            account.username = store.unique_username(&account.owner);
            store.accounts.push(account);
        }
        Ok(store)
    }

    fn unique_username(&self, owner: &str) -> String {
        let base = derive_username(owner);
        if self.find_by_username(&base).is_none() {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.find_by_username(&candidate).is_none() {
                debug!(base = %base, username = %candidate, "username collision resolved with suffix");
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn find_by_username_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.username == username)
    }

    /// Remove exactly one account, keeping the order of the rest
    pub fn remove_by_username(&mut self, username: &str) -> Result<Account> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.username == username)
            .ok_or_else(|| Error::not_found(format!("account {username}")))?;
        Ok(self.accounts.remove(index))
    }

    /// Mutable access to two distinct accounts at once
    ///
    /// Returns `None` if either is missing or both names are the same.
    pub fn pair_mut(&mut self, first: &str, second: &str) -> Option<(&mut Account, &mut Account)> {
        if first == second {
            return None;
        }
        let i = self.accounts.iter().position(|a| a.username == first)?;
        let j = self.accounts.iter().position(|a| a.username == second)?;
        if i < j {
            let (head, tail) = self.accounts.split_at_mut(j);
            Some((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.accounts.split_at_mut(i);
            Some((&mut tail[0], &mut head[j]))
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
