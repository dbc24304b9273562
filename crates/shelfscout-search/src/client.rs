//! JSON-RPC catalog client
//!
//! Calls the endpoint's `tools/call` method with the configured tool name
//! (`search_shop_catalog` by default). The tool answers with text content
//! blocks; the first block holding a JSON object is the search payload. A
//! result with prose only is treated as an empty response.

use crate::config::ClientConfig;
use crate::error::SearchError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, ToolResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;
use shelfscout_domain::traits::CatalogSearch;
use shelfscout_domain::{SearchRequest, SearchResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

const MAX_ERROR_BODY: usize = 500;

/// Ceiling on the pause between attempts
const MAX_BACKOFF_SECS: u64 = 60;

/// Pause before retrying after `attempt` failed attempts: 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
}

/// Catalog search over JSON-RPC 2.0
pub struct McpCatalogClient {
    config: ClientConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl McpCatalogClient {
    /// Create a client; fails on invalid configuration or headers
    pub fn new(config: ClientConfig) -> Result<Self, SearchError> {
        config.validate().map_err(SearchError::Config)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SearchError::Config(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| SearchError::Config(format!("invalid header value for '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| SearchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        info!(endpoint = %config.endpoint, tool = %config.tool_name, "Catalog client initialized");

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Access the configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the JSON-RPC envelope for a search request
    pub fn build_request(&self, request: &SearchRequest) -> Result<JsonRpcRequest, SearchError> {
        let arguments = serde_json::to_value(request)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ok(JsonRpcRequest::tool_call(id, self.config.tool_name.as_str(), arguments))
    }

    /// Issue a minimal search to check the endpoint answers
    ///
    /// Returns the number of products in the reply.
    pub async fn test_connection(&self) -> Result<usize, SearchError> {
        let request = SearchRequest::new("test", "connection check", 1);
        let response = self.search(&request).await?;
        Ok(response.product_count())
    }

    async fn send_once(&self, body: &JsonRpcRequest) -> Result<Value, SearchError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout(self.config.timeout_secs)
            } else {
                SearchError::InvalidResponse(format!("Failed to parse response: {}", e))
            }
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::Timeout(self.config.timeout_secs)
        } else {
            SearchError::Communication(format!("Request failed: {}", e))
        }
    }
}

/// Turn a JSON-RPC reply into a search response
pub fn interpret_reply(body: Value) -> Result<SearchResponse, SearchError> {
    let reply: JsonRpcResponse = serde_json::from_value(body)?;

    if let Some(error) = reply.error {
        return Err(SearchError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let result = reply
        .result
        .ok_or_else(|| SearchError::InvalidResponse("reply has neither result nor error".to_string()))?;

    // Some deployments answer with the payload directly instead of content blocks
    if result.get("products").is_some() || result.get("available_filters").is_some() {
        return Ok(SearchResponse::new(result));
    }

    let tool: ToolResult = serde_json::from_value(result.clone())?;
    if tool.is_error {
        let text = tool.text();
        return Err(SearchError::Tool(if text.is_empty() {
            "tool reported an error".to_string()
        } else {
            text
        }));
    }

    match tool.json_payload() {
        Some(payload) => Ok(SearchResponse::new(payload)),
        None => {
            // A prose-only answer carries no products and no filters
            warn!(text = %tool.text(), "Tool result has no JSON payload");
            Ok(SearchResponse::new(result))
        }
    }
}

#[async_trait]
impl CatalogSearch for McpCatalogClient {
    type Error = SearchError;

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, Self::Error> {
        let body = self.build_request(request)?;
        debug!(
            id = body.id,
            query = %request.query,
            limit = request.limit,
            filters = request.filters.len(),
            "Catalog search"
        );

        let mut attempts = 0;
        loop {
            attempts += 1;
            let outcome = match self.send_once(&body).await {
                Ok(reply) => interpret_reply(reply),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(response) => {
                    debug!(products = response.product_count(), "Catalog search succeeded");
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempts < self.config.max_retries => {
                    let delay = backoff_delay(attempts);
                    warn!(
                        attempt = attempts,
                        max = self.config.max_retries,
                        ?delay,
                        "Catalog search failed: {}; retrying",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shelfscout_domain::ConcreteFilter;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client() -> McpCatalogClient {
        McpCatalogClient::new(ClientConfig::new("http://127.0.0.1:9/api/mcp")).unwrap()
    }

    #[test]
    fn test_build_request() {
        let client = client();
        let request = SearchRequest::new("shirts", "Customer searching for: shirts", 10)
            .with_filters(vec![ConcreteFilter::variant_option("Color", "Blue")]);

        let first = serde_json::to_value(client.build_request(&request).unwrap()).unwrap();
        assert_eq!(first["method"], "tools/call");
        assert_eq!(first["params"]["name"], "search_shop_catalog");
        assert_eq!(
            first["params"]["arguments"]["filters"],
            json!([{"variantOption": {"name": "Color", "value": "Blue"}}])
        );

        let second = serde_json::to_value(client.build_request(&request).unwrap()).unwrap();
        assert_ne!(first["id"], second["id"]);
    }

    #[test]
    fn test_invalid_config_and_headers() {
        assert!(matches!(
            McpCatalogClient::new(ClientConfig::new("not a url")),
            Err(SearchError::Config(_))
        ));

        let mut config = ClientConfig::new("https://shop.example/api/mcp");
        config.headers.insert("bad header".into(), "x".into());
        assert!(matches!(McpCatalogClient::new(config), Err(SearchError::Config(_))));
    }

    #[test]
    fn test_interpret_content_payload() {
        let reply = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "{\"products\": [{\"id\": \"1\"}]}"}]}
        });
        let response = interpret_reply(reply).unwrap();
        assert_eq!(response.product_count(), 1);
    }

    #[test]
    fn test_interpret_direct_payload() {
        let reply = json!({"jsonrpc": "2.0", "id": 1, "result": {"products": [], "available_filters": []}});
        assert_eq!(interpret_reply(reply).unwrap().product_count(), 0);
    }

    #[test]
    fn test_interpret_errors() {
        let rpc = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "Invalid params"}});
        assert_eq!(
            interpret_reply(rpc).unwrap_err(),
            SearchError::Rpc { code: -32602, message: "Invalid params".into() }
        );

        let tool = json!({"result": {"isError": true, "content": [{"type": "text", "text": "unknown filter"}]}});
        assert_eq!(interpret_reply(tool).unwrap_err(), SearchError::Tool("unknown filter".into()));

        let empty = json!({"jsonrpc": "2.0", "id": 1});
        assert!(matches!(interpret_reply(empty), Err(SearchError::InvalidResponse(_))));
    }

    #[test]
    fn test_prose_tool_result_is_empty_response() {
        let prose = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": "No products matched."}]}
        });
        let response = interpret_reply(prose).unwrap();
        assert_eq!(response.product_count(), 0);
        assert_eq!(response.end_cursor(), None);

        let no_blocks = json!({"jsonrpc": "2.0", "id": 1, "result": {"content": []}});
        assert_eq!(interpret_reply(no_blocks).unwrap().product_count(), 0);
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert_eq!(backoff_delay(7), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(65), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    /// Serve one scripted HTTP reply per connection; returns the endpoint
    /// and a counter of accepted requests
    async fn scripted_endpoint(replies: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            for (status, body) in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                read_request(&mut socket).await;
                let reply = format!(
                    "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/api/mcp", addr), hits)
    }

    /// Read headers plus a `content-length` body
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    const PRODUCTS_REPLY: &str = r#"{"jsonrpc":"2.0","id":1,"result":{"content":[{"type":"text","text":"{\"products\":[{\"id\":\"1\"}]}"}]}}"#;

    fn scripted_client(endpoint: &str, max_retries: u32) -> McpCatalogClient {
        let config = ClientConfig {
            max_retries,
            timeout_secs: 5,
            ..ClientConfig::new(endpoint)
        };
        McpCatalogClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_retries_server_error_then_succeeds() {
        let (endpoint, hits) =
            scripted_endpoint(vec![(503, "unavailable"), (200, PRODUCTS_REPLY)]).await;
        let client = scripted_client(&endpoint, 3);

        let response = client.search(&SearchRequest::new("shirts", "ctx", 5)).await.unwrap();
        assert_eq!(response.product_count(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (endpoint, hits) = scripted_endpoint(vec![(400, "bad request"), (200, PRODUCTS_REPLY)]).await;
        let client = scripted_client(&endpoint, 3);

        let result = client.search(&SearchRequest::new("shirts", "ctx", 5)).await;
        assert!(matches!(result, Err(SearchError::Http { status: 400, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (endpoint, hits) =
            scripted_endpoint(vec![(503, "busy"), (503, "busy"), (200, PRODUCTS_REPLY)]).await;
        let client = scripted_client(&endpoint, 2);

        let result = client.search(&SearchRequest::new("shirts", "ctx", 5)).await;
        assert!(matches!(result, Err(SearchError::Http { status: 503, .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let config = ClientConfig {
            max_retries: 1,
            ..ClientConfig::new("http://127.0.0.1:9/api/mcp")
        };
        let client = McpCatalogClient::new(config).unwrap();
        let result = client.search(&SearchRequest::new("x", "y", 1)).await;
        assert!(matches!(
            result,
            Err(SearchError::Communication(_)) | Err(SearchError::Timeout(_))
        ));
    }
}
