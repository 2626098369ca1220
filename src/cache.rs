use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::config::Config;

const CACHE_TTL_SECS: u64 = 3600; // 1 hour

/// Current-user account ids, keyed by site URL.
#[derive(Serialize, Deserialize, Default)]
pub struct Cache {
    accounts: HashMap<String, CachedAccount>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct CachedAccount {
    pub account_id: String,
    pub display_name: String,
    timestamp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

impl Cache {
    pub fn load() -> Self {
        match Self::cache_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str(&contents) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable cache");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::cache_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let contents = match serde_json::to_string_pretty(self) {
            Ok(c) => c,
            Err(_) => return,
        };

        if let Err(e) = std::fs::write(path, contents) {
            tracing::debug!(error = %e, "failed to write cache");
        }
    }

    fn cache_path() -> Option<PathBuf> {
        Config::config_path()
            .ok()
            .map(|p| p.with_file_name("cache.json"))
    }

    /// Cached account for a site, if it has not expired.
    pub fn account(&self, site: &str) -> Option<&CachedAccount> {
        self.account_at(site, now_secs())
    }

    fn account_at(&self, site: &str, now: u64) -> Option<&CachedAccount> {
        self.accounts
            .get(site)
            .filter(|account| now.saturating_sub(account.timestamp) <= CACHE_TTL_SECS)
    }

    pub fn set_account(&mut self, site: &str, account_id: String, display_name: String) {
        self.accounts.insert(
            site.to_string(),
            CachedAccount {
                account_id,
                display_name,
                timestamp: now_secs(),
            },
        );
    }
}
