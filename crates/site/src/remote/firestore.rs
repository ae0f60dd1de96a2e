//! Cloud Firestore REST client.
//!
//! # API Reference
//!
//! - Base URL: `https://firestore.googleapis.com/v1`
//! - Documents: `/projects/{project}/databases/{database}/documents/{collection}[/{id}]`
//! - Authentication: web API key via the `key` query parameter
//! - Values are wrapped by type: `{"stringValue": "..."}`, `{"timestampValue": "..."}`, ...

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::{
    Document, DocumentStore, FieldValue, Fields, RemoteStoreError, validate_document_id,
};
use crate::config::FirestoreConfig;

/// Page size requested when listing a collection.
const LIST_PAGE_SIZE: &str = "300";

/// Firestore REST API client.
#[derive(Clone)]
pub struct FirestoreClient {
    inner: Arc<FirestoreClientInner>,
}

struct FirestoreClientInner {
    client: reqwest::Client,
    /// `{base}/projects/{project}/databases/{database}/documents`
    documents_url: String,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for FirestoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreClient")
            .field("documents_url", &self.inner.documents_url)
            .field("api_key", &self.inner.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
struct RestDocument {
    /// Full resource name, ending in `/{collection}/{id}`.
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RestDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl FirestoreClient {
    /// Create a new Firestore client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirestoreConfig) -> Result<Self, RemoteStoreError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.base_url.trim_end_matches('/'),
            config.project_id,
            config.database
        );

        Ok(Self {
            inner: Arc::new(FirestoreClientInner {
                client,
                documents_url,
                api_key: config.api_key.clone(),
            }),
        })
    }

    /// Build a request URL below the documents root, appending the API key.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` in a
    /// segment cannot change the request target.
    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, RemoteStoreError> {
        let mut url = Url::parse(&self.inner.documents_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                RemoteStoreError::Parse(format!(
                    "Documents URL cannot take a path: {}",
                    self.inner.documents_url
                ))
            })?
            .extend(segments);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(key) = &self.inner.api_key {
                pairs.append_pair("key", key.expose_secret());
            }
        }
        // An empty query string would leave a dangling `?`.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, RemoteStoreError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| RemoteStoreError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the Firestore API.
    async fn parse_error(response: reqwest::Response) -> RemoteStoreError {
        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(30);
            return RemoteStoreError::RateLimited(retry_after);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, api_status) = serde_json::from_str::<ErrorEnvelope>(&body).map_or_else(
            |_| (body.chars().take(200).collect::<String>(), String::new()),
            |envelope| (envelope.error.message, envelope.error.status),
        );

        tracing::warn!(status, api_status = %api_status, message = %message, "Firestore request failed");

        match status {
            404 => RemoteStoreError::NotFound(message),
            401 | 403 => RemoteStoreError::Unauthorized(message),
            _ => RemoteStoreError::Api { status, message },
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn add_document(
        &self,
        collection: &str,
        fields: Fields,
    ) -> Result<String, RemoteStoreError> {
        let url = self.url(&[collection], &[])?;
        let body = json!({ "fields": encode_fields(&fields) });

        let response = self.inner.client.post(url).json(&body).send().await?;
        let document: RestDocument = Self::handle_response(response).await?;

        let id = document_id(&document.name)?;
        debug!(id = %id, "Document created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, RemoteStoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let url = self.url(&[collection], &query)?;

            let response = self.inner.client.get(url).send().await?;
            let page: ListDocumentsResponse = Self::handle_response(response).await?;

            for document in page.documents {
                documents.push(Document {
                    id: document_id(&document.name)?,
                    fields: decode_fields(&document.fields),
                });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = documents.len(), "Documents listed");
        Ok(documents)
    }

    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<(), RemoteStoreError> {
        validate_document_id(id)?;
        let mut query: Vec<(&str, &str)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.as_str()))
            .collect();
        query.push(("currentDocument.exists", "true"));
        let url = self.url(&[collection, id], &query)?;
        let body = json!({ "fields": encode_fields(&fields) });

        let response = self.inner.client.patch(url).json(&body).send().await?;
        let _: RestDocument = Self::handle_response(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), RemoteStoreError> {
        validate_document_id(id)?;
        let url = self.url(&[collection, id], &[])?;
        let response = self.inner.client.delete(url).send().await?;

        let status = response.status();
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }
}

// =============================================================================
// Value Encoding
// =============================================================================

/// Extract the document ID from a full resource name.
fn document_id(name: &str) -> Result<String, RemoteStoreError> {
    name.rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| RemoteStoreError::Parse(format!("Invalid document name: {name}")))
}

fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}

fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        // Firestore transports 64-bit integers as strings.
        FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
    }
}

fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), decode_value(value)))
        .collect()
}

/// Decode a typed Firestore value. Kinds this crate never writes (maps,
/// references, geo points, bytes) decode as `Null`.
fn decode_value(value: &Value) -> FieldValue {
    if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        return FieldValue::String(s.to_string());
    }
    if let Some(ts) = value.get("timestampValue").and_then(Value::as_str) {
        return DateTime::parse_from_rfc3339(ts).map_or(FieldValue::Null, |dt| {
            FieldValue::Timestamp(dt.with_timezone(&Utc))
        });
    }
    if let Some(b) = value.get("booleanValue").and_then(Value::as_bool) {
        return FieldValue::Bool(b);
    }
    if let Some(i) = value.get("integerValue") {
        let parsed = i
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| i.as_i64());
        return parsed.map_or(FieldValue::Null, FieldValue::Integer);
    }
    if let Some(d) = value.get("doubleValue").and_then(Value::as_f64) {
        return FieldValue::Double(d);
    }
    if let Some(array) = value.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return FieldValue::Array(values);
    }
    FieldValue::Null
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;

    fn config(api_key: Option<&str>) -> FirestoreConfig {
        FirestoreConfig {
            project_id: "balaji-demo".to_string(),
            database: "(default)".to_string(),
            base_url: "https://firestore.googleapis.com/v1/".to_string(),
            api_key: api_key.map(|k| SecretString::from(k.to_string())),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_document_id_is_last_segment() {
        assert_eq!(
            document_id("projects/p/databases/(default)/documents/products/x7Qa").unwrap(),
            "x7Qa"
        );
        assert!(document_id("projects/p/databases/(default)/documents/products/").is_err());
    }

    #[test]
    fn test_url_includes_api_key() {
        let client = FirestoreClient::new(&config(Some("AIza-test"))).unwrap();
        let url = client.url(&["products"], &[("pageSize", "300")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/balaji-demo/databases/(default)/documents/products?pageSize=300&key=AIza-test"
        );
    }

    #[test]
    fn test_url_without_query_has_no_question_mark() {
        let client = FirestoreClient::new(&config(None)).unwrap();
        let url = client.url(&["products", "abc"], &[]).unwrap();
        assert!(url.query().is_none());
        assert!(url.as_str().ends_with("/documents/products/abc"));
    }

    #[test]
    fn test_url_escapes_reserved_characters_in_segments() {
        let client = FirestoreClient::new(&config(Some("AIza-test"))).unwrap();

        let url = client.url(&["products", "abc?x=1"], &[]).unwrap();
        assert!(url.path().ends_with("/documents/products/abc%3Fx=1"));
        assert_eq!(url.query(), Some("key=AIza-test"));

        let url = client.url(&["products", "abc#def"], &[]).unwrap();
        assert!(url.path().ends_with("/documents/products/abc%23def"));
        assert!(url.fragment().is_none());

        let url = client.url(&["products", "a/b"], &[]).unwrap();
        assert!(url.path().ends_with("/documents/products/a%2Fb"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = FirestoreClient::new(&config(Some("AIza-secret"))).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("AIza-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_value_encoding_matches_rest_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            encode_value(&FieldValue::Timestamp(ts)),
            json!({ "timestampValue": "2024-01-01T00:00:00.000000Z" })
        );
        assert_eq!(
            encode_value(&FieldValue::Integer(42)),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            encode_value(&FieldValue::Array(vec![FieldValue::from("a")])),
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }] } })
        );
    }

    #[test]
    fn test_value_decoding() {
        assert_eq!(
            decode_value(&json!({ "stringValue": "Gate A" })),
            FieldValue::String("Gate A".to_string())
        );
        assert_eq!(
            decode_value(&json!({ "timestampValue": "2024-01-01T00:00:00.123Z" })),
            FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::milliseconds(123)
            )
        );
        assert_eq!(
            decode_value(&json!({ "integerValue": "7" })),
            FieldValue::Integer(7)
        );
        assert_eq!(
            decode_value(&json!({ "arrayValue": {} })),
            FieldValue::Array(Vec::new())
        );
        assert_eq!(
            decode_value(&json!({ "mapValue": { "fields": {} } })),
            FieldValue::Null
        );
    }
}
