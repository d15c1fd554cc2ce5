// Google Drive (directory) and Google Docs (editor) over HTTPS.
//
// Listing goes through Drive v3 `files.list`; creation and batch updates go
// through Docs v1. Every request carries the user's OAuth bearer token.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use notemaker_common::types::{DocumentHandle, DocumentQuery, EditOperation, ListPage};

use super::{build_http_client, DocumentDirectory, DocumentEditor, RemoteFuture};
use crate::config::NotemakerConfig;
use crate::error::RemoteError;

const LIST_FIELDS: &str = "nextPageToken, files(id, name)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedDocument {
    document_id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Authenticated client for the Drive and Docs APIs.
#[derive(Debug, Clone)]
pub struct GoogleApi {
    http: Client,
    access_token: String,
    drive_base: Url,
    docs_base: Url,
}

impl GoogleApi {
    pub fn new(access_token: impl Into<String>, config: &NotemakerConfig) -> Result<Self, RemoteError> {
        let drive_base = parse_base(&config.drive_api_base)?;
        let docs_base = parse_base(&config.docs_api_base)?;
        Ok(Self {
            http: build_http_client(config.request_timeout_secs)?,
            access_token: access_token.into(),
            drive_base,
            docs_base,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|error| RemoteError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response.json::<T>().await.map_err(|error| RemoteError::Malformed(error.to_string()))
    }

    async fn list_page(&self, query: &DocumentQuery) -> Result<ListPage, RemoteError> {
        let mut url = endpoint(&self.drive_base, &["drive", "v3", "files"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &drive_query(query));
            pairs.append_pair("pageSize", &query.page_size.to_string());
            pairs.append_pair("fields", LIST_FIELDS);
            if let Some(token) = &query.page_token {
                pairs.append_pair("pageToken", token);
            }
        }

        debug!(page_token = ?query.page_token, "listing drive files");
        let list: FileList = self.send(self.http.get(url)).await?;
        Ok(ListPage {
            files: list
                .files
                .into_iter()
                .map(|file| DocumentHandle { id: file.id, title: file.name })
                .collect(),
            next_page_token: list.next_page_token,
        })
    }

    async fn create_document(&self, title: &str) -> Result<DocumentHandle, RemoteError> {
        let url = endpoint(&self.docs_base, &["v1", "documents"])?;
        let created: CreatedDocument =
            self.send(self.http.post(url).json(&json!({ "title": title }))).await?;
        Ok(DocumentHandle { id: created.document_id, title: created.title })
    }

    async fn apply_batch(
        &self,
        document_id: &str,
        operations: &[EditOperation],
    ) -> Result<(), RemoteError> {
        let action = format!("{document_id}:batchUpdate");
        let url = endpoint(&self.docs_base, &["v1", "documents", &action])?;
        debug!(document_id, operations = operations.len(), "submitting batch update");
        let _reply: Value =
            self.send(self.http.post(url).json(&batch_update_body(operations))).await?;
        Ok(())
    }
}

impl DocumentDirectory for GoogleApi {
    fn list<'a>(&'a self, query: &'a DocumentQuery) -> RemoteFuture<'a, ListPage> {
        Box::pin(self.list_page(query))
    }

    fn create<'a>(&'a self, title: &'a str) -> RemoteFuture<'a, DocumentHandle> {
        Box::pin(self.create_document(title))
    }
}

impl DocumentEditor for GoogleApi {
    fn batch_update<'a>(
        &'a self,
        document_id: &'a str,
        operations: &'a [EditOperation],
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.apply_batch(document_id, operations))
    }
}

/// Drive search expression for an exact title match.
pub fn drive_query(query: &DocumentQuery) -> String {
    let name = format!("name = '{}'", escape_query_value(&query.title_exact));
    if query.exclude_trashed {
        format!("{name} and trashed = false")
    } else {
        name
    }
}

/// Escape a string literal for a Drive query (`\` and `'`).
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// JSON body of a Docs `batchUpdate` call.
pub fn batch_update_body(operations: &[EditOperation]) -> Value {
    let requests: Vec<Value> = operations.iter().map(request_json).collect();
    json!({ "requests": requests })
}

fn request_json(operation: &EditOperation) -> Value {
    match operation {
        EditOperation::InsertText { text, index } => json!({
            "insertText": {
                "text": text,
                "location": { "index": index },
            }
        }),
        EditOperation::SetParagraphStyle { style, start, end } => json!({
            "updateParagraphStyle": {
                "range": { "startIndex": start, "endIndex": end },
                "paragraphStyle": { "namedStyleType": style.name() },
                "fields": "namedStyleType",
            }
        }),
        EditOperation::SetCharacterStyle { style, start, end } => {
            let field = style.style_field();
            let mut text_style = serde_json::Map::new();
            text_style.insert(field.to_string(), Value::Bool(true));
            json!({
                "updateTextStyle": {
                    "range": { "startIndex": start, "endIndex": end },
                    "textStyle": text_style,
                    "fields": field,
                }
            })
        }
    }
}

fn parse_base(raw: &str) -> Result<Url, RemoteError> {
    let url = Url::parse(raw).map_err(|_| RemoteError::InvalidUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(RemoteError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(base.to_string()))?;
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}
