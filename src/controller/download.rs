// Package api provides the page download controller.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::http::Controller;
use crate::workers::{Admission, Dispatcher};

pub const DOWNLOAD_PATH: &str = "/download";

const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Query parameters of a download request. Only the first occurrence of
/// each key counts and unknown keys are ignored, so a repeated or odd
/// parameter never turns into a rejected request.
#[derive(Debug, Default)]
pub struct DownloadQuery {
    pub url: Option<String>,
    pub retry_limit: Option<String>,
    pub customer_paying: Option<String>,
}

impl DownloadQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "url" => &mut query.url,
                "retry_limit" => &mut query.retry_limit,
                "customer_paying" => &mut query.customer_paying,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// Parses `retry_limit` as a decimal integer. Missing or invalid input is 0;
/// clamping to the allowed range happens at admission.
pub fn parse_retry_limit(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

/// Parses `customer_paying`. Accepts the usual boolean spellings; anything
/// else, including a missing value, means a non-paying customer.
pub fn parse_paying(raw: Option<&str>) -> bool {
    matches!(raw, Some("1" | "t" | "T" | "TRUE" | "true" | "True"))
}

/// DownloadController serves cached pages and schedules fetches on a miss.
pub struct DownloadController {
    dispatcher: Arc<Dispatcher>,
}

impl DownloadController {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    async fn download(
        Query(pairs): Query<Vec<(String, String)>>,
        State(controller): State<Arc<Self>>,
    ) -> Response {
        let params = DownloadQuery::from_pairs(pairs);
        let url = match params.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => return (StatusCode::BAD_REQUEST, "url query parameter is required").into_response(),
        };

        let retry_limit = parse_retry_limit(params.retry_limit.as_deref());
        let paying = parse_paying(params.customer_paying.as_deref());

        match controller.dispatcher.submit(url, retry_limit, paying) {
            Admission::Hit(payload) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE_HTML)], payload).into_response()
            }
            Admission::Queued(_) => StatusCode::ACCEPTED.into_response(),
            Admission::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        }
    }
}

impl Clone for DownloadController {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl Controller for DownloadController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            DOWNLOAD_PATH,
            get(move |query: Query<Vec<(String, String)>>| {
                let controller = controller.clone();
                async move { Self::download(query, State(controller)).await }
            }),
        )
    }
}
