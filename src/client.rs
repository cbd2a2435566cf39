/// Blocking OpenAQ fetcher: HTTP transport, retry policy, and the
/// parameter-catalog cache.
///
/// This is the production `LocationSource`. The aggregation pipeline never
/// sees transport details — every call here either returns parsed data or
/// a final error with retries already exhausted.

use crate::aggregate::LocationSource;
use crate::config::ApiConfig;
use crate::ingest::openaq::{
    self, AqParameter, LocationsPage,
};
use crate::model::{AqError, LocationQuery};
use std::sync::{Arc, RwLock};
use std::time::Duration;

pub struct OpenAqClient {
    http: reqwest::blocking::Client,
    base_url: String,
    page_size: u32,
    retry_attempts: u32,
    retry_backoff: Duration,
    /// Immutable snapshot of the parameter catalog, swapped atomically on
    /// publish. Readers clone the `Arc` under a read lock; two racing
    /// fetches both publish a full snapshot and the later write wins, so
    /// a partially written catalog can never be observed.
    catalog_cache: RwLock<Option<Arc<Vec<AqParameter>>>>,
}

impl OpenAqClient {
    pub fn new(config: &ApiConfig) -> Self {
        OpenAqClient {
            http: reqwest::blocking::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            catalog_cache: RwLock::new(None),
        }
    }

    /// GETs a URL with bounded retries and a fixed backoff between
    /// attempts. Non-2xx statuses and transport failures are both
    /// retried; whichever error the final attempt produced is returned.
    fn get_with_retry(&self, url: &str) -> Result<String, AqError> {
        let mut last_error = AqError::Transport("no attempt made".to_string());

        for attempt in 1..=self.retry_attempts {
            if attempt > 1 {
                std::thread::sleep(self.retry_backoff);
            }

            match self.http.get(url).header("Accept", "application/json").send() {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        last_error = AqError::HttpStatus(status.as_u16());
                        continue;
                    }
                    match response.text() {
                        Ok(body) => return Ok(body),
                        Err(e) => {
                            last_error = AqError::Transport(format!("body read failed: {}", e));
                        }
                    }
                }
                Err(e) => {
                    last_error = AqError::Transport(e.to_string());
                }
            }
        }

        Err(last_error)
    }

    fn fetch_catalog_uncached(&self) -> Result<Arc<Vec<AqParameter>>, AqError> {
        let url = openaq::build_parameters_url(&self.base_url);
        let body = self.get_with_retry(&url)?;
        Ok(Arc::new(openaq::parse_parameters_response(&body)?))
    }
}

impl LocationSource for OpenAqClient {
    fn fetch_locations(&self, query: &LocationQuery, page: u32) -> Result<LocationsPage, AqError> {
        let url = openaq::build_locations_url(&self.base_url, query, self.page_size, page);
        let body = self.get_with_retry(&url)?;
        openaq::parse_locations_response(&body)
    }

    fn fetch_parameter_catalog(&self) -> Result<Arc<Vec<AqParameter>>, AqError> {
        if let Some(snapshot) = self.catalog_cache.read().unwrap().as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        // Fetch without holding the lock; requests on other workers may
        // race here and that is fine.
        let snapshot = self.fetch_catalog_uncached()?;
        *self.catalog_cache.write().unwrap() = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
