use crate::error::{AuditError, Result};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use octocrab::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

pub struct GithubClient {
    octocrab: Octocrab,
}

impl GithubClient {
    /// `api_root` is any URL on the API host (scheme, host and port are kept).
    pub fn new(token: &str, api_root: &str) -> Result<Self> {
        let origin = url::Url::parse(api_root)
            .map_err(|e| AuditError::Config(format!("invalid API URL {api_root}: {e}")))?
            .origin()
            .ascii_serialization();

        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(origin.as_str())?
            .add_retry_config(RetryConfig::None)
            .build()?;
        Ok(Self { octocrab })
    }

    /// Collects every item of a `Link`-paginated collection, in server order.
    ///
    /// Any failed page fails the whole collection; items from earlier
    /// pages are discarded.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self, url: &str) -> Result<Vec<Value>> {
        let mut page: Page<Value> = self
            .octocrab
            .get(url, None::<&()>)
            .await
            .map_err(|e| AuditError::fetch_failed(url, &e))?;

        let mut items = Vec::new();
        let mut pages = 1u32;
        loop {
            items.append(&mut page.items);
            let next = page.next.take();
            let Some(next_url) = next.as_ref().map(|uri| uri.to_string()) else {
                break;
            };

            page = match self.octocrab.get_page::<Value>(&next).await {
                Ok(Some(next_page)) => next_page,
                Ok(None) => break,
                Err(e) => return Err(AuditError::fetch_failed(&next_url, &e)),
            };
            pages += 1;
        }

        debug!(pages, items = items.len(), "collection fetched");
        Ok(items)
    }

    /// Reads a single response body without following pagination.
    #[instrument(skip(self))]
    pub async fn fetch_one<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.octocrab
            .get(url, None::<&()>)
            .await
            .map_err(|e| AuditError::fetch_failed(url, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn next_link(server: &MockServer, page: u32) -> String {
        format!("<{}/items?page={page}>; rel=\"next\"", server.uri())
    }

    #[tokio::test]
    async fn fetch_all_follows_next_links_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param_is_missing("page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", next_link(&server, 2).as_str())
                    .set_body_json(json!([{"id": 1}, {"id": 2}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", next_link(&server, 3).as_str())
                    .set_body_json(json!([{"id": 3}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 4}, {"id": 5}])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new("t0ken", &server.uri()).unwrap();
        let items = client
            .fetch_all(&format!("{}/items", server.uri()))
            .await
            .unwrap();

        let ids: Vec<i64> = items.iter().map(|v| v["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn fetch_all_single_page_without_link() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = GithubClient::new("t0ken", &server.uri()).unwrap();
        let items = client
            .fetch_all(&format!("{}/items", server.uri()))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fetch_all_fails_when_a_later_page_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param_is_missing("page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", next_link(&server, 2).as_str())
                    .set_body_json(json!([{"id": 1}])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "Server Error"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GithubClient::new("t0ken", &server.uri()).unwrap();
        let err = client
            .fetch_all(&format!("{}/items", server.uri()))
            .await
            .unwrap_err();
        match err {
            AuditError::FetchFailed { url, cause } => {
                assert!(url.contains("page=2"));
                assert!(cause.contains("Server Error"), "cause was {cause}");
                assert!(cause.contains("500"), "cause was {cause}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn fetch_all_fails_on_first_page_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let client = GithubClient::new("t0ken", &server.uri()).unwrap();
        let result = client.fetch_all(&format!("{}/items", server.uri())).await;
        assert!(matches!(result, Err(AuditError::FetchFailed { .. })));
    }

    #[test]
    fn new_rejects_relative_api_root() {
        assert!(matches!(
            GithubClient::new("t0ken", "not a url"),
            Err(AuditError::Config(_))
        ));
    }
}
