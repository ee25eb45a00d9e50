use std::{env, path::PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use url::Url;

use crate::{
    dates::parse_date,
    error::{Error, Result},
};

const DEFAULT_BASE_URL: &str = "https://www.homechef.com";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_EARLIEST_DATE: &str = "17-mar-2014";
const DEFAULT_LOOKAHEAD_DAYS: i64 = 14;

const LEDGER_FILE: &str = "pdf_data.json";
const DOCUMENTS_DIR: &str = "pdfs";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    base_url: Url,
    data_dir: PathBuf,
    earliest_date: NaiveDate,
    lookahead: Duration,
    credentials: Option<Credentials>,
}

impl Config {
    /// Every setting falls back to a fixed default when its variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("HOMECHEF_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| Error::config_error(format!("HOMECHEF_URL `{base_url}` is invalid: {e}")))?;

        let data_dir = lookup("DATA_DIR").map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        let earliest_date = parse_date(
            lookup("EARLIEST_DATE")
                .as_deref()
                .unwrap_or(DEFAULT_EARLIEST_DATE),
        )?;

        let lookahead = match lookup("LOOKAHEAD_DAYS") {
            Some(days) => days.trim().parse::<i64>().map_err(|e| {
                Error::config_error(format!("LOOKAHEAD_DAYS `{days}` is not a number: {e}"))
            })?,
            None => DEFAULT_LOOKAHEAD_DAYS,
        };
        let lookahead = Duration::try_days(lookahead).ok_or_else(|| {
            Error::config_error(format!("LOOKAHEAD_DAYS `{lookahead}` is out of range"))
        })?;

        let credentials = match (lookup("HOMECHEF_USERNAME"), lookup("HOMECHEF_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => {
                log::warn!("HOMECHEF_USERNAME/HOMECHEF_PASSWORD not set, requesting menus without login.");
                None
            }
        };

        Ok(Self {
            base_url,
            data_dir,
            earliest_date,
            lookahead,
            credentials,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub const fn earliest_date(&self) -> NaiveDate {
        self.earliest_date
    }

    #[cfg(test)]
    pub const fn lookahead(&self) -> Duration {
        self.lookahead
    }

    /// When crawling stops: `now` plus the lookahead.
    pub fn deadline(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        now.checked_add_signed(self.lookahead).ok_or_else(|| {
            Error::config_error(format!(
                "LOOKAHEAD_DAYS of {} days from {now} is past the last representable date",
                self.lookahead.num_days()
            ))
        })
    }

    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir.join(DOCUMENTS_DIR)
    }
}
