use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use goodnews_core::{Article, Language};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct NewsQuery {
    pub country: Option<String>,
    pub language: Option<String>,
}

pub(super) async fn get_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let Some(country) = query
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
    else {
        return Err(ApiError::bad_request("Country code is required"));
    };
    let language = Language::from_param(query.language.as_deref());

    tracing::info!(
        request_id = %req_id.0,
        country = %country,
        language = %language,
        "news request"
    );

    // Run on its own task so a dropped connection never cancels a fetch
    // other requests may be waiting on.
    let aggregator = Arc::clone(&state.aggregator);
    let task_country = country.clone();
    let joined = tokio::spawn(async move { aggregator.fetch(&task_country, language).await }).await;

    let outcome = match joined {
        Ok(result) => result?,
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "news task failed");
            return Err(ApiError::internal(e.to_string()));
        }
    };

    tracing::info!(
        request_id = %req_id.0,
        country = %country,
        path = %outcome.path,
        count = outcome.articles.len(),
        "news response"
    );
    Ok(Json(outcome.articles))
}
