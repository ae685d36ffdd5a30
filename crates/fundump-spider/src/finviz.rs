use crate::config::SpiderConfig;
use crate::extract::Document;
use crate::http::*;
use crate::instrument::Instrument;
use crate::{Result, SpiderError};
use std::time::Duration;
use tracing::{debug, error, trace};

/// Fetches Finviz quote pages, one instrument at a time.
pub struct Fetcher {
    client: HttpClient,
    host: String,
    delay: Duration,
}

impl Fetcher {
    pub fn new(config: &SpiderConfig) -> Result<Self> {
        let client = build_client(&config.user_agent)?;
        Ok(Self {
            client,
            host: config.source_host.trim_end_matches('/').to_string(),
            delay: config.request_delay,
        })
    }

    pub fn quote_url(&self, symbol: &str) -> String {
        format!("{}/quote.ashx?t={symbol}", self.host)
    }

    /// GET the quote page of `instrument` and parse it.
    ///
    /// Sleeps for the configured delay after the request, whether it succeeded or not.
    /// An unknown symbol (404, or a page without snapshot cells) is [SpiderError::NotFound].
    pub async fn fetch(&self, instrument: &Instrument) -> Result<Document> {
        let symbol = instrument.symbol();
        let time = std::time::Instant::now();

        let body = self.get_body(symbol).await;
        trace!("waiting {:?} before the next request", self.delay);
        tokio::time::sleep(self.delay).await;
        let body = body?;

        let document = Document::parse(&body);
        if !document.has_snapshot() {
            return Err(SpiderError::not_found(format!("quote page for {symbol}")));
        }

        debug!("quote page for {symbol} fetched. {}", crate::time_elapsed(time));
        Ok(document)
    }

    async fn get_body(&self, symbol: &str) -> Result<String> {
        let url = self.quote_url(symbol);
        trace!("fetching {url}");

        let response = self.client.get(&url).send().await.map_err(|err| {
            error!("failed to fetch quote page for {symbol}, error({err})");
            err
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SpiderError::not_found(format!("quote page for {symbol}")));
        }

        let body = response
            .error_for_status()
            .map_err(|err| {
                error!("quote page request for {symbol} failed, error({err})");
                err
            })?
            .text()
            .await?;

        Ok(body)
    }
}

fn build_client(user_agent: &str) -> Result<HttpClient> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .build()
        .map_err(|err| {
            error!("failed to build reqwest client, error({err})");
            err
        })?;
    Ok(client)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
