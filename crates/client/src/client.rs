//! The ordering backend API client.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use red_lantern_core::{CreateOrderRequest, Dish, DishId, Order, OrderId, OrderStatus};

use crate::error::ApiError;
use crate::types::{TodayStats, WeeklyStats};

/// How long a fetched dish list stays fresh.
const MENU_CACHE_TTL: Duration = Duration::from_secs(60);

/// Per-request timeout; the backend is expected to be close and fast.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the ordering backend's JSON API.
///
/// Cheap to clone; all clones share one HTTP connection pool and one
/// menu cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    menu_cache: Cache<String, Vec<Dish>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let menu_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(MENU_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::builder()
                    .timeout(REQUEST_TIMEOUT)
                    .build()
                    .expect("Failed to create HTTP client"),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                menu_cache,
            }),
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    /// All dishes on the menu, cached for [`MENU_CACHE_TTL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn dishes(&self) -> Result<Vec<Dish>, ApiError> {
        self.cached_dishes("dishes", "/api/dishes").await
    }

    /// Dishes in one menu category, cached for [`MENU_CACHE_TTL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn dishes_by_category(&self, category: &str) -> Result<Vec<Dish>, ApiError> {
        let encoded: String = url::form_urlencoded::byte_serialize(category.as_bytes()).collect();
        self.cached_dishes(
            &format!("dishes:category:{category}"),
            &format!("/api/dishes?type={encoded}"),
        )
        .await
    }

    /// One dish by id. Not cached: detail views want current
    /// availability.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn dish(&self, id: DishId) -> Result<Dish, ApiError> {
        self.get_json(&format!("/api/dishes/{id}")).await
    }

    /// The first `limit` available dishes, menu order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn popular_dishes(&self, limit: usize) -> Result<Vec<Dish>, ApiError> {
        let dishes = self.dishes().await?;
        Ok(dishes
            .into_iter()
            .filter(|dish| dish.available)
            .take(limit)
            .collect())
    }

    async fn cached_dishes(&self, cache_key: &str, path: &str) -> Result<Vec<Dish>, ApiError> {
        if let Some(hit) = self.inner.menu_cache.get(cache_key).await {
            debug!(cache_key, "menu cache hit");
            return Ok(hit);
        }
        let dishes: Vec<Dish> = self.get_json(path).await?;
        self.inner
            .menu_cache
            .insert(cache_key.to_string(), dishes.clone())
            .await;
        Ok(dishes)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit a new order built from the cart's order draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self, request), fields(user_id = %request.user_id, lines = request.items.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.post_json("/api/orders", request).await
    }

    /// All orders ever placed by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/api/orders/user/{}", encode(user_id)))
            .await
    }

    /// Orders still moving through the queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn active_orders(&self, user_id: &str) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/api/orders/user/{}/active", encode(user_id)))
            .await
    }

    /// Completed and cancelled orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn history_orders(&self, user_id: &str) -> Result<Vec<Order>, ApiError> {
        self.get_json(&format!("/api/orders/user/{}/history", encode(user_id)))
            .await
    }

    /// Look an order up by its pickup code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn order_by_pickup_code(&self, code: &str) -> Result<Order, ApiError> {
        self.get_json(&format!("/api/orders/pickup/{}", encode(code)))
            .await
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get_json(&format!("/api/orders/{id}")).await
    }

    /// Move an order to a new status (staff operation).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        self.put_json(
            &format!("/api/orders/{id}/status"),
            Some(&json!({ "status": status })),
        )
        .await
    }

    /// Cancel an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.put_json(&format!("/api/orders/{id}/cancel"), None).await
    }

    /// Confirm the order was picked up.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn confirm_pickup(&self, id: OrderId) -> Result<Order, ApiError> {
        self.put_json(&format!("/api/orders/{id}/pickup"), None).await
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Today's sales summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn today_stats(&self) -> Result<TodayStats, ApiError> {
        self.get_json("/api/stats/today").await
    }

    /// This week's sales summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the backend answers with
    /// a non-success status, or the response cannot be decoded.
    #[instrument(skip(self))]
    pub async fn weekly_stats(&self) -> Result<WeeklyStats, ApiError> {
        self.get_json("/api/stats/weekly").await
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Whether the backend is reachable and answering.
    #[instrument(skip(self))]
    pub async fn health(&self) -> bool {
        let url = format!("{}/api/health", self.inner.base_url);
        match self.inner.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "health probe failed");
                false
            }
        }
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(format!("{}{path}", self.inner.base_url))
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .json(body)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn put_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .put(format!("{}{path}", self.inner.base_url));
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::decode(path, request.send().await?).await
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        // Read the body as text first so error responses keep their
        // diagnostics.
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

fn encode(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}
