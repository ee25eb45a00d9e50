#[cfg(test)]
pub mod mock;

use std::path::Path;

use reqwest::{Client, Request, StatusCode};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{instrument, Level};
use url::Url;

use crate::{config::Credentials, error::Result};

/// A fetched page. Non-success statuses are returned here rather than as errors.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Page {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub trait Fetch {
    /// `Err` only for transport failures.
    async fn get(&self, url: &Url) -> Result<Page>;

    /// Streams `url` into `dest`, returning the number of bytes written.
    async fn download(&self, url: &Url, dest: &Path) -> Result<u64>;
}

pub fn make_client() -> Client {
    Client::builder()
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    credentials: Option<Credentials>,
}

impl HttpFetcher {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            client: make_client(),
            credentials,
        }
    }

    /// Menu and meal pages carry the login when one is configured.
    fn page_request(&self, url: &Url) -> Result<Request> {
        let mut request = self.client.get(url.clone());
        if let Some(Credentials { username, password }) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }
        Ok(request.build()?)
    }

    /// Documents are public and may live on another host, so no login goes with them.
    fn document_request(&self, url: &Url) -> Result<Request> {
        Ok(self.client.get(url.clone()).build()?)
    }

    #[instrument(skip(self, url), fields(url = %url), level = Level::TRACE)]
    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        let response = self.client.execute(self.page_request(url)?).await?;
        let status = response.status();
        let start = std::time::Instant::now();
        let body = response.bytes().await?.to_vec();
        log::trace!("Got body of {url} in \t {:?}", start.elapsed());
        Ok(Page { status, body })
    }

    #[instrument(skip(self, url, dest), fields(url = %url), level = Level::TRACE)]
    async fn stream_to_file(&self, url: &Url, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .execute(self.document_request(url)?)
            .await?
            .error_for_status()?;
        let mut file = fs::File::create(dest).await?;
        let mut written = 0;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &Url) -> Result<Page> {
        self.fetch_page(url).await
    }

    async fn download(&self, url: &Url, dest: &Path) -> Result<u64> {
        self.stream_to_file(url, dest).await
    }
}
