//! PostgREST-style HTTP catalog service.
//!
//! Records use the service's column names (`id`, `name`, `stock`, `kategori`,
//! `harga`). Requests:
//! - `GET    {base}/rest/v1/{collection}?select=*`
//! - `POST   {base}/rest/v1/{collection}`
//! - `PATCH  {base}/rest/v1/{collection}?id=eq.{id}`
//! - `DELETE {base}/rest/v1/{collection}?id=eq.{id}`

use serde::{Deserialize, Serialize};

use pawshop_core::ItemId;
use pawshop_inventory::{CatalogItem, ItemPatch};

use super::r#trait::{CatalogRemote, RemoteError};

/// Identifier as stored remotely: text or an integer key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_item_id(self) -> Result<ItemId, RemoteError> {
        let raw = match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        };
        ItemId::new(raw).map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ItemRow {
    id: RawId,
    name: String,
    #[serde(default)]
    stock: i64,
    #[serde(default)]
    kategori: Option<String>,
    #[serde(default)]
    harga: i64,
}

impl ItemRow {
    /// Negative values coming from the service are clamped to zero.
    fn into_item(self) -> Result<CatalogItem, RemoteError> {
        Ok(CatalogItem {
            id: self.id.into_item_id()?,
            name: self.name,
            stock: u32::try_from(self.stock.max(0)).unwrap_or(u32::MAX),
            price: u64::try_from(self.harga.max(0)).unwrap_or(0),
            category: self.kategori.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
struct NewRow<'a> {
    id: &'a str,
    name: &'a str,
    stock: u32,
    kategori: &'a str,
    harga: u64,
}

impl<'a> From<&'a CatalogItem> for NewRow<'a> {
    fn from(item: &'a CatalogItem) -> Self {
        Self {
            id: item.id.as_str(),
            name: &item.name,
            stock: item.stock,
            kategori: &item.category,
            harga: item.price,
        }
    }
}

#[derive(Debug, Serialize)]
struct PatchRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kategori: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    harga: Option<u64>,
}

impl<'a> From<&'a ItemPatch> for PatchRow<'a> {
    fn from(patch: &'a ItemPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            stock: patch.stock,
            kategori: patch.category.as_deref(),
            harga: patch.price,
        }
    }
}

/// HTTP client for a PostgREST-compatible catalog service.
#[derive(Debug, Clone)]
pub struct RestCatalogRemote {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestCatalogRemote {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn request(&self, method: reqwest::Method, collection: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .request(method, self.collection_url(collection))
            .header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key).bearer_auth(key);
        }
        req
    }

    /// Send `req`; any non-2xx response is a negative acknowledgment.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<String, RemoteError> {
        let resp = req
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog service returned non-success status"
            );
            return Err(RemoteError::Api(status.as_u16(), body));
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl CatalogRemote for RestCatalogRemote {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<CatalogItem>, RemoteError> {
        let req = self
            .request(reqwest::Method::GET, collection)
            .query(&[("select", "*")]);
        let body = self.send(req).await?;
        let rows: Vec<ItemRow> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Parse(e.to_string()))?;
        rows.into_iter().map(ItemRow::into_item).collect()
    }

    async fn insert(&self, collection: &str, item: &CatalogItem) -> Result<(), RemoteError> {
        let req = self
            .request(reqwest::Method::POST, collection)
            .header("Prefer", "return=minimal")
            .json(&NewRow::from(item));
        self.send(req).await.map(|_| ())
    }

    async fn update(
        &self,
        collection: &str,
        id: &ItemId,
        patch: &ItemPatch,
    ) -> Result<(), RemoteError> {
        let req = self
            .request(reqwest::Method::PATCH, collection)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=minimal")
            .json(&PatchRow::from(patch));
        self.send(req).await.map(|_| ())
    }

    async fn delete(&self, collection: &str, id: &ItemId) -> Result<(), RemoteError> {
        let req = self
            .request(reqwest::Method::DELETE, collection)
            .query(&[("id", format!("eq.{id}"))]);
        self.send(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one HTTP request (head plus `Content-Length` body).
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < end + 4 + len {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            break;
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve a single canned response; returns the base URL and the request
    /// line the server saw.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    async fn fetch_all_decodes_success_body() {
        let (url, server) = serve_once(
            "200 OK",
            r#"[{"id": 1, "name": "Whiskas", "stock": 3, "kategori": "kucing", "harga": 100}]"#,
        )
        .await;
        let remote = RestCatalogRemote::new(url, Some("key".to_string()));

        let items = remote.fetch_all("items").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "1");
        assert_eq!(items[0].category, "kucing");

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /rest/v1/items?select="));
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error() {
        let (url, _server) = serve_once("503 Service Unavailable", "down").await;
        let remote = RestCatalogRemote::new(url, None);

        let err = remote.fetch_all("items").await.unwrap_err();
        assert_eq!(err, RemoteError::Api(503, "down".to_string()));
    }

    #[tokio::test]
    async fn refused_update_maps_to_api_error() {
        let (url, server) = serve_once("409 Conflict", r#"{"message":"conflict"}"#).await;
        let remote = RestCatalogRemote::new(url, None);

        let err = remote
            .update("items", &ItemId::new("a").unwrap(), &ItemPatch::stock(2))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Api(409, _)));

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("PATCH /rest/v1/items?id=eq.a"));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let (url, _server) = serve_once("200 OK", "{not json").await;
        let remote = RestCatalogRemote::new(url, None);

        let err = remote.fetch_all("items").await.unwrap_err();
        assert!(matches!(err, RemoteError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let remote = RestCatalogRemote::new(format!("http://{addr}"), None);
        let err = remote
            .delete("items", &ItemId::new("a").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
    }

    #[test]
    fn rows_decode_with_text_or_numeric_ids() {
        let body = r#"[
            {"id": "a1", "name": "Whiskas", "stock": 4, "kategori": "kucing", "harga": 25000},
            {"id": 7, "name": "Pedigree", "stock": -2, "kategori": null, "harga": 30000}
        ]"#;
        let rows: Vec<ItemRow> = serde_json::from_str(body).unwrap();
        let items: Vec<CatalogItem> = rows
            .into_iter()
            .map(ItemRow::into_item)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(items[0].id.as_str(), "a1");
        assert_eq!(items[0].price, 25_000);
        assert_eq!(items[1].id.as_str(), "7");
        assert_eq!(items[1].stock, 0);
        assert_eq!(items[1].category, "");
    }

    #[test]
    fn patch_rows_use_service_column_names() {
        let patch = ItemPatch {
            price: Some(9),
            category: Some("anjing".to_string()),
            ..ItemPatch::default()
        };
        let json = serde_json::to_value(PatchRow::from(&patch)).unwrap();
        assert_eq!(json, serde_json::json!({ "kategori": "anjing", "harga": 9 }));
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let remote = RestCatalogRemote::new("https://example.test/", None);
        assert_eq!(remote.collection_url("items"), "https://example.test/rest/v1/items");
    }
}
