//! HTTP remote adapter for a JSON posts-style endpoint

use reqwest::header::ACCEPT;
use serde::Serialize;

use super::{FetchError, PushItemError, RemoteAdapter, RemoteItem};
use crate::config::SyncConfig;
use crate::models::QuoteRecord;
use crate::util::{compact_text, is_http_url, normalize_text_option};

/// Talks to `GET {endpoint}?_limit=N` and `POST {endpoint}`
#[derive(Clone)]
pub struct HttpRemote {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct PushBody<'a> {
    text: &'a str,
    category: &'a str,
}

impl HttpRemote {
    pub fn new(config: &SyncConfig) -> Result<Self, FetchError> {
        let endpoint = normalize_endpoint(config.endpoint.clone())?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteAdapter for HttpRemote {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<QuoteRecord>, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("_limit", limit)])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.text().await?;
        parse_remote_items(&body, limit)
    }

    async fn push_record(&self, record: &QuoteRecord) -> Result<(), PushItemError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(&PushBody {
                text: &record.text,
                category: &record.category,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(PushItemError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Parse a fetch payload into at most `limit` records. Servers are free to
/// ignore `_limit`, so the cap is applied here as well.
pub(crate) fn parse_remote_items(
    payload: &str,
    limit: usize,
) -> Result<Vec<QuoteRecord>, FetchError> {
    let items = serde_json::from_str::<Vec<RemoteItem>>(payload)
        .map_err(|error| FetchError::InvalidPayload(error.to_string()))?;
    Ok(items
        .into_iter()
        .take(limit)
        .map(RemoteItem::into_record)
        .collect())
}

fn error_message(body: &str) -> String {
    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed
    }
}

fn normalize_endpoint(raw: String) -> Result<String, FetchError> {
    let endpoint = normalize_text_option(Some(raw)).ok_or_else(|| {
        FetchError::InvalidConfiguration("endpoint must not be empty".to_string())
    })?;
    if is_http_url(&endpoint) {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(FetchError::InvalidConfiguration(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    async fn spawn_one_shot_server(status_line: &str, body: &str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let address = listener.local_addr().expect("local address");
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut request_buffer = [0_u8; 1024];
                let _ = socket.read(&mut request_buffer).await;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{address}/posts")
    }

    fn remote_for(endpoint: &str) -> HttpRemote {
        HttpRemote::new(&SyncConfig::default().with_endpoint(endpoint)).unwrap()
    }

    #[test]
    fn normalize_endpoint_rejects_invalid_values() {
        assert!(normalize_endpoint(String::new()).is_err());
        assert!(normalize_endpoint("api.example.com/posts".to_string()).is_err());
    }

    #[test]
    fn normalize_endpoint_trims_trailing_slash() {
        assert_eq!(
            normalize_endpoint(" https://api.example.com/posts/ ".to_string()).unwrap(),
            "https://api.example.com/posts"
        );
    }

    #[test]
    fn http_remote_uses_configured_endpoint() {
        let config = SyncConfig::default().with_endpoint("https://api.example.com/posts/");
        let remote = HttpRemote::new(&config).unwrap();
        assert_eq!(remote.endpoint(), "https://api.example.com/posts");
    }

    #[test]
    fn parse_remote_items_rejects_non_array_payload() {
        let error = parse_remote_items(r#"{"id": 1}"#, 12).unwrap_err();
        assert!(matches!(error, FetchError::InvalidPayload(_)));
    }

    #[test]
    fn parse_remote_items_maps_every_item() {
        let records = parse_remote_items(
            r#"[{"id": 1, "title": "a", "userId": 1}, {"id": 2, "title": "b", "userId": 2}]"#,
            12,
        )
        .unwrap();
        let ids = records.iter().map(|record| record.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["remote-1", "remote-2"]);
    }

    #[test]
    fn error_message_handles_empty_body() {
        assert_eq!(error_message("   "), "empty response body");
        assert_eq!(error_message(" not found "), "not found");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_batch_caps_items_when_server_ignores_limit() {
        let endpoint = spawn_one_shot_server(
            "200 OK",
            r#"[{"id": 1, "title": "a", "userId": 1}, {"id": 2, "title": "b", "userId": 1}, {"id": 3, "title": "c", "userId": 2}]"#,
        )
        .await;

        let batch = remote_for(&endpoint).fetch_batch(1).await.unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id.as_str(), "remote-1");
        assert_eq!(batch[0].category, "Remote Cat 1");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_batch_reports_error_status_with_body() {
        let endpoint =
            spawn_one_shot_server("503 Service Unavailable", r#"{"error":"maintenance"}"#).await;

        let error = remote_for(&endpoint).fetch_batch(12).await.unwrap_err();

        match error {
            FetchError::Status { status, message } => {
                assert_eq!(status, 503);
                assert!(message.contains("maintenance"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_batch_rejects_malformed_payload() {
        let endpoint = spawn_one_shot_server("200 OK", r#"{"posts": []}"#).await;

        let error = remote_for(&endpoint).fetch_batch(12).await.unwrap_err();

        assert!(matches!(error, FetchError::InvalidPayload(_)));
    }
}
