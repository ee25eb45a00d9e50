#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod crawl;
mod dates;
mod error;
mod fetch;
mod ledger;
mod mirror;
mod parse;
#[cfg(test)]
mod test_log;

use chrono::Local;

use crate::{
    config::Config,
    crawl::MenuCrawler,
    fetch::HttpFetcher,
    ledger::FileStore,
    mirror::Mirror,
};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();
    let config = Config::from_env()?;
    log::debug!("{config:?}");

    let store = FileStore::open(config.ledger_path());
    let mut ledger = store.load().await?;
    if ledger.is_empty() {
        log::info!("No previous crawl, starting from {}", config.earliest_date());
    }
    let known = ledger.len();

    let fetcher = HttpFetcher::new(config.credentials().cloned());
    let crawler = MenuCrawler::new(&fetcher, config.base_url());
    let deadline = config.deadline(Local::now().naive_local())?;
    let weeks = crawler
        .crawl_range(&mut ledger, config.earliest_date(), deadline)
        .await?;
    log::info!(
        "Crawled {weeks} weeks, {} new meal pages",
        ledger.len() - known
    );
    store.save(&ledger).await?;

    log::info!("[GATHERING] List of saved documents...");
    let documents = ledger.documents_by_date();
    let mirror = Mirror::new(&fetcher, config.base_url(), config.documents_dir());
    let stats = mirror.sync(&documents).await?;

    println!(
        "{} new meal pages, {} documents downloaded, {} already present, {} failed",
        ledger.len() - known,
        stats.downloaded,
        stats.skipped,
        stats.failed,
    );
    Ok(())
}
