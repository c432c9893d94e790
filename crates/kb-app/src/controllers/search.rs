use super::BusyFlag;
use kb_client::{ApiEnvelope, Gateway, RequestResult, SearchRequest};
use kb_store::Store;
use kb_types::{SearchParams, SearchResult};

#[derive(Clone)]
pub struct SearchController {
    gateway: Gateway,
    store: Store,
    params: SearchParams,
}

impl SearchController {
    pub fn new(gateway: Gateway, store: Store, params: SearchParams) -> Self {
        Self {
            gateway,
            store,
            params,
        }
    }

    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    /// Semantic search. A blank query is ignored (`Ok(None)`, no request).
    /// Results are cleared when the search fails.
    pub async fn search(&self, query: &str) -> RequestResult<Option<Vec<SearchResult>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }

        self.store.set_search_query(query);

        let request = SearchRequest::new(query)
            .with_n_results(self.params.n_results)
            .with_min_score(self.params.min_score);
        let result = {
            let _searching = BusyFlag::raise(&self.store, Store::set_is_searching);
            self.gateway
                .search()
                .semantic(&request)
                .await
                .and_then(|r| r.into_result("search failed"))
        };

        match result {
            Ok(response) => {
                tracing::debug!(query, total_found = response.total_found, "search completed");
                self.store.set_search_results(response.results.clone());
                Ok(Some(response.results))
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed");
                self.store.set_search_results(Vec::new());
                Err(e)
            }
        }
    }
}
