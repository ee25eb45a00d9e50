use std::{cell::RefCell, collections::HashMap, io, path::Path};

use reqwest::StatusCode;
use url::Url;

use super::{Fetch, Page};
use crate::error::{Error, Result};

/// In-memory site. Unknown pages answer 404, unknown documents fail to download.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, (StatusCode, String)>,
    unreachable: Vec<String>,
    documents: HashMap<String, Vec<u8>>,
    interrupted: RefCell<HashMap<String, Vec<u8>>>,
    pub requests: RefCell<Vec<String>>,
    pub downloads: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), (StatusCode::OK, html.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: StatusCode) -> Self {
        self.pages.insert(url.to_string(), (status, String::new()));
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }

    pub fn document(mut self, url: &str, bytes: &[u8]) -> Self {
        self.documents.insert(url.to_string(), bytes.to_vec());
        self
    }

    /// The next download of `url` writes `partial` and then fails.
    pub fn interrupted_once(self, url: &str, partial: &[u8]) -> Self {
        self.interrupted
            .borrow_mut()
            .insert(url.to_string(), partial.to_vec());
        self
    }

    pub fn requested(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|x| *x == url).count()
    }
}

impl Fetch for MockFetcher {
    async fn get(&self, url: &Url) -> Result<Page> {
        self.requests.borrow_mut().push(url.to_string());
        if self.unreachable.iter().any(|x| x == url.as_str()) {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }
        Ok(match self.pages.get(url.as_str()) {
            Some((status, html)) => Page {
                status: *status,
                body: html.as_bytes().to_vec(),
            },
            None => Page {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            },
        })
    }

    async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        self.downloads.borrow_mut().push(url.to_string());
        let partial = self.interrupted.borrow_mut().remove(url.as_str());
        if let Some(partial) = partial {
            tokio::fs::write(dest, partial).await?;
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset mid-download",
            )));
        }
        let bytes = self.documents.get(url.as_str()).ok_or_else(|| {
            Error::Io(io::Error::new(io::ErrorKind::NotFound, "no such document"))
        })?;
        tokio::fs::write(dest, bytes).await?;
        Ok(bytes.len() as u64)
    }
}
