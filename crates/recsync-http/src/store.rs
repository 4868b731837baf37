//! REST-backed record store.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use recsync_core::Result;
use recsync_core::record::{
    ListFilter, MetaSchema, PendingEdit, Record, RecordListPage, SearchQuery,
};
use recsync_core::traits::RecordStore;
use recsync_core::types::{ApiUrl, RecordId};

use crate::client::RestClient;
use crate::endpoints::*;

/// Settings for an [`HttpRecordStore`].
#[derive(Debug, Clone)]
pub struct HttpStoreConfig {
    /// API base URL.
    pub base: ApiUrl,
    /// Transport-level timeout for each request.
    pub timeout: Option<Duration>,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl HttpStoreConfig {
    /// Default `User-Agent`.
    pub const DEFAULT_USER_AGENT: &'static str = concat!("recsync/", env!("CARGO_PKG_VERSION"));

    /// Config with no timeout and the default user agent.
    pub fn new(base: ApiUrl) -> Self {
        Self {
            base,
            timeout: None,
            user_agent: Self::DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A [`RecordStore`] talking REST/JSON to a record API.
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: RestClient,
}

impl HttpRecordStore {
    /// Create a store from settings.
    pub fn new(config: HttpStoreConfig) -> Result<Self> {
        let client = RestClient::new(config.base, config.timeout, &config.user_agent)?;
        Ok(Self { client })
    }

    /// Create a store with default settings.
    pub fn with_base(base: ApiUrl) -> Result<Self> {
        Self::new(HttpStoreConfig::new(base))
    }

    /// Returns the API base URL.
    pub fn base(&self) -> &ApiUrl {
        self.client.base()
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    #[instrument(skip(self))]
    async fn allocate_id(&self) -> Result<RecordId> {
        let response: NewIdResponse = self
            .client
            .get(self.client.url(&[NEW_ID]), &(), None)
            .await?;
        debug!(id = %response.id, "Allocated id");
        Ok(response.id)
    }

    #[instrument(skip(self))]
    async fn list(&self, page: u32, filter: &ListFilter) -> Result<RecordListPage> {
        let response: ListResponse = self
            .client
            .get(
                self.client.url(&[RECORDS]),
                &QueryParams::list(page, filter),
                None,
            )
            .await?;

        let total_pages = response.pages.unwrap_or(if response.records.is_empty() {
            0
        } else {
            page
        });

        Ok(RecordListPage {
            records: response.records,
            page,
            total_pages,
        })
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &SearchQuery, filter: &ListFilter) -> Result<Vec<Record>> {
        self.client
            .get(
                self.client.url(&[RECORDS, SEARCH]),
                &QueryParams::search(query.as_param(), filter),
                None,
            )
            .await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &RecordId) -> Result<Record> {
        self.client
            .get(self.client.url(&[RECORDS, id.as_str()]), &(), Some(id))
            .await
    }

    #[instrument(skip(self, edit), fields(id = %edit.id()))]
    async fn create(&self, edit: &PendingEdit) -> Result<Record> {
        self.client.post(self.client.url(&[RECORDS]), edit).await
    }

    #[instrument(skip(self, edit), fields(id = %edit.id()))]
    async fn update(&self, edit: &PendingEdit) -> Result<Record> {
        self.client
            .put(self.client.url(&[RECORDS, edit.id().as_str()]), edit, edit.id())
            .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.client
            .delete(self.client.url(&[RECORDS, id.as_str()]), id)
            .await
    }

    #[instrument(skip(self))]
    async fn meta_schema(&self) -> Result<MetaSchema> {
        self.client
            .get(self.client.url(&[META_FIELDS]), &(), None)
            .await
    }
}
