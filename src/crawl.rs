use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use url::Url;

use crate::{
    dates::{crawl_dates, format_menu_date},
    error::Result,
    fetch::Fetch,
    ledger::{Ledger, LedgerEntry},
    parse::{extract_links, DOCUMENT_LINK, MEAL_LINK},
};

/// Walks weekly menu pages and the meal pages they link to.
#[derive(Debug)]
pub struct MenuCrawler<'a, F> {
    fetcher: &'a F,
    base_url: &'a Url,
}

impl<'a, F: Fetch> MenuCrawler<'a, F> {
    pub const fn new(fetcher: &'a F, base_url: &'a Url) -> Self {
        Self { fetcher, base_url }
    }

    fn menu_url(&self, date: NaiveDate) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("menus/{}", format_menu_date(date)))?)
    }

    /// Links on `url` containing `needle`. Unreachable or failing pages have no links.
    async fn links_on(&self, url: &Url, needle: &str) -> Option<BTreeSet<String>> {
        match self.fetcher.get(url).await {
            Ok(page) if page.is_success() => Some(extract_links(&page.text(), needle)),
            Ok(page) => {
                warn!("{url} answered {}, no links taken from it", page.status);
                Some(BTreeSet::new())
            }
            Err(e) => {
                warn!("Failed to fetch {url}: {e}");
                None
            }
        }
    }

    /// New entries for the meal pages on `date`'s menu that are not in `already_seen`.
    pub async fn crawl(
        &self,
        date: NaiveDate,
        already_seen: &HashSet<String>,
    ) -> Result<Vec<LedgerEntry>> {
        let formatted = format_menu_date(date);
        let menu_url = self.menu_url(date)?;
        info!("[PERFORMING REQUEST] For current date: {formatted}...");
        let endpoints = self
            .links_on(&menu_url, MEAL_LINK)
            .await
            .unwrap_or_default();

        let mut entries = Vec::new();
        for endpoint in endpoints {
            if already_seen.contains(&endpoint) {
                info!("[WARNING] Endpoint {endpoint} found. Skipping...");
                continue;
            }
            let url = match self.base_url.join(&endpoint) {
                Ok(url) => url,
                Err(e) => {
                    warn!("Skipping endpoint `{endpoint}`, not a valid url: {e}");
                    continue;
                }
            };
            // an unreachable meal page is left out of the ledger so the next run retries it
            let Some(documents) = self.links_on(&url, DOCUMENT_LINK).await else {
                continue;
            };
            entries.push(LedgerEntry::new(formatted.as_str(), endpoint, documents));
        }
        Ok(entries)
    }

    /// Crawls every week from where the ledger left off until `deadline`, returning how many weeks were visited.
    pub async fn crawl_range(
        &self,
        ledger: &mut Ledger,
        earliest: NaiveDate,
        deadline: NaiveDateTime,
    ) -> Result<usize> {
        let start = ledger.latest_date()?.map_or(earliest, |latest| latest.max(earliest));
        let mut seen = ledger.seen_endpoints();
        let mut visited = 0;
        for date in crawl_dates(start, deadline) {
            for entry in self.crawl(date, &seen).await? {
                info!("[NEW] {} as {}", entry.endpoint(), entry.id());
                seen.insert(entry.endpoint().to_owned());
                ledger.append(entry);
            }
            visited += 1;
        }
        Ok(visited)
    }
}
