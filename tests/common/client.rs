//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all catalog-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::json;
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    ///
    /// Use this for testing authentication flows and the public surface.
    /// For admin endpoints, use `authenticated()` instead.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true) // Automatically handle session cookies
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client pre-authenticated as the seeded admin
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        let client = Self::new(base_url);

        let response = client.login(ADMIN_EMAIL, ADMIN_PASS).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Admin authentication failed: {:?}",
            response.text().await
        );

        client
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /admin/login
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(format!("{}/admin/login", self.base_url))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST /admin/logout
    pub async fn logout(&self) -> Response {
        self.client
            .post(format!("{}/admin/logout", self.base_url))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// POST /admin/forgot-password
    pub async fn forgot_password(&self, email: &str) -> Response {
        self.client
            .post(format!("{}/admin/forgot-password", self.base_url))
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("Forgot password request failed")
    }

    /// POST /admin/reset-password
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Response {
        self.client
            .post(format!("{}/admin/reset-password", self.base_url))
            .json(&json!({ "token": token, "new_password": new_password }))
            .send()
            .await
            .expect("Reset password request failed")
    }

    /// POST /admin - create a new admin account
    pub async fn create_admin(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/admin", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Create admin request failed")
    }

    // ========================================================================
    // Public Catalog Endpoints
    // ========================================================================

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    /// GET /songs/search with arbitrary query parameters
    pub async fn search_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/songs/search", self.base_url))
            .query(query)
            .send()
            .await
            .expect("Search songs request failed")
    }

    /// GET /songs/{id}
    pub async fn get_song(&self, id: &str) -> Response {
        self.client
            .get(format!("{}/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Get song request failed")
    }

    /// GET /songs/popular
    pub async fn get_popular(&self, limit: Option<i64>) -> Response {
        let mut request = self
            .client
            .get(format!("{}/songs/popular", self.base_url));
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        request.send().await.expect("Popular songs request failed")
    }

    /// GET /categories
    pub async fn get_categories(&self) -> Response {
        self.client
            .get(format!("{}/categories", self.base_url))
            .send()
            .await
            .expect("Get categories request failed")
    }

    /// GET /categories/{id}/songs with arbitrary query parameters
    pub async fn get_category_songs(&self, id: &str, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/categories/{}/songs", self.base_url, id))
            .query(query)
            .send()
            .await
            .expect("Get category songs request failed")
    }

    // ========================================================================
    // Usage Event Endpoints
    // ========================================================================

    /// POST /events/search
    pub async fn post_search_event(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/events/search", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Post search event request failed")
    }

    /// POST /events/category-click
    pub async fn post_category_click(&self, category_id: &str) -> Response {
        self.client
            .post(format!("{}/events/category-click", self.base_url))
            .json(&json!({ "category_id": category_id }))
            .send()
            .await
            .expect("Post category click request failed")
    }

    // ========================================================================
    // Admin Catalog Endpoints
    // ========================================================================

    /// POST /admin/songs
    pub async fn create_song(&self, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}/admin/songs", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Create song request failed")
    }

    /// PUT /admin/songs/{id}
    pub async fn update_song(&self, id: &str, body: serde_json::Value) -> Response {
        self.client
            .put(format!("{}/admin/songs/{}", self.base_url, id))
            .json(&body)
            .send()
            .await
            .expect("Update song request failed")
    }

    /// DELETE /admin/songs/{id}
    pub async fn delete_song(&self, id: &str) -> Response {
        self.client
            .delete(format!("{}/admin/songs/{}", self.base_url, id))
            .send()
            .await
            .expect("Delete song request failed")
    }

    /// GET /admin/songs with arbitrary query parameters
    pub async fn list_admin_songs(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/admin/songs", self.base_url))
            .query(query)
            .send()
            .await
            .expect("List admin songs request failed")
    }
}
