//! Fire-once fetch of a single-type resource.

use serde::de::DeserializeOwned;
use tokio::sync::{OnceCell, watch};

use cms_starter_core::HomeContent;

use crate::api::ApiClient;
use crate::query::QueryParams;

/// State of a [`SingleTypeResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

/// A single-type resource fetched at most once.
///
/// The first [`load`](Self::load) performs the request; concurrent and later
/// calls wait for that request and return its result. There is no retry or
/// refetch.
pub struct SingleTypeResource<T> {
    client: ApiClient,
    resource: String,
    params: QueryParams,
    loaded: OnceCell<()>,
    state: watch::Sender<ResourceState<T>>,
}

impl<T> SingleTypeResource<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    #[must_use]
    pub fn new(client: ApiClient, resource: impl Into<String>, params: QueryParams) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            client,
            resource: resource.into(),
            params,
            loaded: OnceCell::new(),
            state,
        }
    }

    /// Fetch once and return the resulting state.
    pub async fn load(&self) -> ResourceState<T> {
        self.loaded.get_or_init(|| self.fetch()).await;
        self.state()
    }

    async fn fetch(&self) {
        let result = self
            .client
            .get_single_type::<T>(&self.resource, &self.params)
            .await;

        self.state.send_modify(|state| {
            match result {
                Ok(envelope) => {
                    state.data = envelope.data;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!(resource = %self.resource, error = %e, "Failed to load resource");
                    state.data = None;
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
        });
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }
}

/// The home singleton with every relation populated.
#[must_use]
pub fn home_resource(client: ApiClient) -> SingleTypeResource<HomeContent> {
    SingleTypeResource::new(client, HomeContent::RESOURCE, QueryParams::populate_all())
}
