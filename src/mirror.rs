use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use log::{info, warn};
use tokio::fs;
use url::Url;

use crate::{
    dates::{format_dir_date, parse_date},
    error::Result,
    fetch::Fetch,
};

/// Flat directory holding a copy of every downloaded document.
pub const ALL_DOCUMENTS_DIR: &str = "all_pdfs";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Last non-empty path segment of `url`.
fn file_name(url: &Url) -> Option<&str> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
}

/// Mirrors recipe cards into `<root>/<YYYYMMDD>/` and `<root>/all_pdfs/`.
#[derive(Debug)]
pub struct Mirror<'a, F> {
    fetcher: &'a F,
    base_url: &'a Url,
    root: PathBuf,
}

impl<'a, F: Fetch> Mirror<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &'a Url, root: impl AsRef<Path>) -> Self {
        Self {
            fetcher,
            base_url,
            root: root.as_ref().to_owned(),
        }
    }

    /// Downloads every document not already present in its date directory.
    /// A failed download is logged and counted, the rest carry on.
    pub async fn sync(&self, documents_by_date: &BTreeMap<String, Vec<String>>) -> Result<MirrorStats> {
        info!("[DOWNLOADING] List of files...");
        let mut stats = MirrorStats::default();
        let flat_dir = self.root.join(ALL_DOCUMENTS_DIR);

        for (date, urls) in documents_by_date {
            let date_dir = self.root.join(format_dir_date(parse_date(date)?));
            fs::create_dir_all(&date_dir).await?;

            for raw in urls {
                let url = match self.base_url.join(raw) {
                    Ok(url) => url,
                    Err(e) => {
                        warn!("Skipping document `{raw}`, not a valid url: {e}");
                        stats.failed += 1;
                        continue;
                    }
                };
                let Some(name) = file_name(&url) else {
                    warn!("Skipping document {url}, it has no file name");
                    stats.failed += 1;
                    continue;
                };
                let dest = date_dir.join(name);
                if fs::try_exists(&dest).await? {
                    info!("[WARNING] {} exists. Skipping...", dest.display());
                    stats.skipped += 1;
                    continue;
                }

                info!("[DOWNLOADING] {url} to {}...", dest.display());
                if let Err(e) = self.fetcher.download(&url, &dest).await {
                    warn!("Failed to download {url}: {e}");
                    // leave no partial file behind, or the next run would skip it
                    if fs::try_exists(&dest).await.unwrap_or(false) {
                        if let Err(e) = fs::remove_file(&dest).await {
                            warn!("Failed to remove partial file {}: {e}", dest.display());
                        }
                    }
                    stats.failed += 1;
                    continue;
                }

                fs::create_dir_all(&flat_dir).await?;
                let flat = flat_dir.join(name);
                info!("[COPYING] {name} to {}...", flat.display());
                fs::copy(&dest, &flat).await?;
                stats.downloaded += 1;
            }
        }
        Ok(stats)
    }
}
