//! Read-only client for the blog REST API.
//!
//! Four operations, one GET each: all users, one user, a user's posts, a
//! post's comments. An absent identifier short-circuits to `Ok(None)`
//! without issuing a request, keeping "no input" distinct from "empty
//! collection". Transport, status, and decode failures are logged with the
//! resource and identifier involved and returned to the caller; there is
//! no retry and no backoff.

mod error;

use std::sync::OnceLock;
use std::time::Duration;

use serde::de::DeserializeOwned;

use bulletin_types::{Comment, Post, PostId, User, UserId};

pub use error::{ApiError, Resource};

pub use bulletin_types;

/// Canonical public endpoint. Overridable via `BULLETIN_API_URL`.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Environment variable consulted by [`ApiClient::from_env`].
pub const BASE_URL_ENV_VAR: &str = "BULLETIN_API_URL";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Shared HTTP client for the process.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!("Failed to build HTTP client: {e}. Falling back to defaults.");
            reqwest::Client::new()
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: http_client().clone(),
            base_url,
        }
    }

    /// Build a client from `BULLETIN_API_URL`, or the public endpoint.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch all users.
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.get_json(Resource::Users, None, "/users".to_string())
            .await
    }

    /// Fetch one user. Absent id: absent result, no request issued.
    pub async fn user(&self, id: Option<UserId>) -> Result<Option<User>, ApiError> {
        let Some(id) = id else { return Ok(None) };
        self.get_json(Resource::User, Some(id.value()), format!("/users/{id}"))
            .await
            .map(Some)
    }

    /// Fetch a user's posts. Absent id: absent result, no request issued.
    pub async fn user_posts(&self, id: Option<UserId>) -> Result<Option<Vec<Post>>, ApiError> {
        let Some(id) = id else { return Ok(None) };
        self.get_json(
            Resource::Posts,
            Some(id.value()),
            format!("/posts?userId={id}"),
        )
        .await
        .map(Some)
    }

    /// Fetch a post's comments. Absent id: absent result, no request issued.
    pub async fn post_comments(&self, id: Option<PostId>) -> Result<Option<Vec<Comment>>, ApiError> {
        let Some(id) = id else { return Ok(None) };
        self.get_json(
            Resource::Comments,
            Some(id.value()),
            format!("/comments?postId={id}"),
        )
        .await
        .map(Some)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: Option<u64>,
        path_and_query: String,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path_and_query);

        let response = self.http.get(&url).send().await.map_err(|source| {
            tracing::error!(%resource, ?id, error = %source, "request failed");
            ApiError::Transport {
                resource,
                id,
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%resource, ?id, %status, "request returned non-success status");
            return Err(ApiError::Status {
                resource,
                id,
                status,
            });
        }

        response.json::<T>().await.map_err(|source| {
            tracing::error!(%resource, ?id, error = %source, "failed to decode response");
            ApiError::Decode {
                resource,
                id,
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{any, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn users_body() -> serde_json::Value {
        serde_json::json!([
            {
                "id": 1,
                "name": "A",
                "company": { "name": "A Co", "catchPhrase": "alpha" }
            },
            {
                "id": 2,
                "name": "B",
                "company": { "name": "B Co", "catchPhrase": "beta" }
            }
        ])
    }

    #[tokio::test]
    async fn absent_ids_short_circuit_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        assert!(client.user(None).await.expect("absent id is not an error").is_none());
        assert!(client.user_posts(None).await.expect("absent id").is_none());
        assert!(client.post_comments(None).await.expect("absent id").is_none());

        server.verify().await;
    }

    #[tokio::test]
    async fn users_decodes_the_full_collection_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let users = client.users().await.expect("users fetch succeeds");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "A");
        assert_eq!(users[1].name, "B");
    }

    #[tokio::test]
    async fn user_fetches_by_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 7,
                "name": "X",
                "company": { "name": "Y", "catchPhrase": "Z" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let user = client
            .user(Some(UserId::new(7)))
            .await
            .expect("user fetch succeeds")
            .expect("present id yields a record");
        assert_eq!(user.name, "X");
        assert_eq!(user.company.catch_phrase, "Z");
    }

    #[tokio::test]
    async fn user_posts_filter_by_owner_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts"))
            .and(query_param("userId", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "userId": 3, "id": 31, "title": "t", "body": "b" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let posts = client
            .user_posts(Some(UserId::new(3)))
            .await
            .expect("posts fetch succeeds")
            .expect("present id yields a list");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, PostId::new(31));
    }

    #[tokio::test]
    async fn post_comments_filter_by_post_query_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/comments"))
            .and(query_param("postId", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "postId": 5, "id": 50, "name": "n", "email": "n@x.dev", "body": "b" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let comments = client
            .post_comments(Some(PostId::new(5)))
            .await
            .expect("comments fetch succeeds")
            .expect("present id yields a list");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].email, "n@x.dev");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client.users().await.expect_err("500 propagates");
        assert_eq!(err.resource(), Resource::Users);
        assert!(matches!(err, ApiError::Status { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_an_error_naming_the_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri());
        let err = client
            .post_comments(Some(PostId::new(9)))
            .await
            .expect_err("decode failure propagates");
        assert_eq!(err.resource(), Resource::Comments);
        assert_eq!(err.id(), Some(9));
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base_url() {
        let client = ApiClient::new("http://localhost:9/");
        assert_eq!(client.base_url(), "http://localhost:9");
    }
}
