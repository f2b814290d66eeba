use crate::model::api::SearchQuery;
use crate::model::document::Document;
use crate::model::errors::NavResult;
use crate::Navigator;

impl Navigator {
    /// Runs `query` against the server's search and holds the hits as the result list. Hits and
    /// the folders containing them become the highlight set. A failed search leaves no results.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn search(&self, query: SearchQuery) -> NavResult<Vec<Document>> {
        let (session, company) = self.company_session().await?;
        let ticket = self.state.write().await.begin_search();

        let result = self
            .backend
            .search_documents(&session, company, query)
            .await;

        let mut state = self.state.write().await;
        if !state.is_current_search(ticket) {
            debug!("discarding superseded search");
            return result;
        }
        state.searching = false;
        match &result {
            Ok(docs) => {
                state.results = docs.clone();
                state.highlighted = docs
                    .iter()
                    .flat_map(|d| std::iter::once(d.id).chain(d.folder_id))
                    .collect();
            }
            Err(err) => {
                error!(?err, "search failed");
                state.results.clear();
                state.highlighted.clear();
            }
        }
        drop(state);

        self.events.search_completed();
        result
    }

    pub async fn search_results(&self) -> Vec<Document> {
        self.state.read().await.results.clone()
    }

    pub async fn clear_search(&self) {
        let mut state = self.state.write().await;
        state.begin_search();
        state.searching = false;
        state.results.clear();
        state.highlighted.clear();
    }
}
