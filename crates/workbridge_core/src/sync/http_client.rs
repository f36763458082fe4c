//! Blocking HTTP implementation of `DocumentClient`.
//!
//! # Invariants
//! - Each call sends `Authorization: Bearer <secret>` and the configured
//!   protocol-version header.
//! - Non-success statuses surface as `ClientError::Status`; nothing is retried.
//! - Secrets and request bodies are never logged.

use crate::chunk::DOCUMENT_BLOCK_LIMIT;
use crate::config::DocumentServiceConfig;
use crate::logging::one_line;
use crate::model::block::Block;
use crate::model::task::BoardRow;
use crate::sync::client::{ClientError, ClientResult, DocumentClient};
use crate::sync::wire;
use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::{Duration, Instant};

const PROTOCOL_VERSION_HEADER: &str = "Notion-Version";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Document-service client over `reqwest::blocking`.
pub struct HttpDocumentClient {
    http: Client,
    base_url: String,
    protocol_version: String,
}

impl HttpDocumentClient {
    pub fn new(config: &DocumentServiceConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            protocol_version: config.protocol_version.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(
        &self,
        operation: &str,
        request: RequestBuilder,
        secret: &str,
        body: &Value,
    ) -> ClientResult<Value> {
        let started_at = Instant::now();
        let response = request
            .bearer_auth(secret)
            .header(PROTOCOL_VERSION_HEADER, self.protocol_version.as_str())
            .json(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(
                "event=document_call module=sync status=error operation={operation} http_status={} duration_ms={}",
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: one_line(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let text = response.text()?;
        debug!(
            "event=document_call module=sync status=ok operation={operation} http_status={} duration_ms={}",
            status.as_u16(),
            started_at.elapsed().as_millis()
        );
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|err| ClientError::Decode(err.to_string()))
    }

    fn send_for_id(
        &self,
        operation: &str,
        request: RequestBuilder,
        secret: &str,
        body: &Value,
    ) -> ClientResult<String> {
        let response = self.send(operation, request, secret, body)?;
        wire::created_id(&response)
            .ok_or_else(|| ClientError::Decode(format!("{operation} response has no `id`")))
    }
}

impl DocumentClient for HttpDocumentClient {
    fn create_page(&self, secret: &str, parent_ref: &str, title: &str) -> ClientResult<String> {
        let request = self.http.post(self.endpoint("pages"));
        self.send_for_id(
            "create_page",
            request,
            secret,
            &wire::new_page_body(parent_ref, title),
        )
    }

    fn update_title(&self, secret: &str, document_ref: &str, title: &str) -> ClientResult<()> {
        let request = self
            .http
            .patch(self.endpoint(&format!("pages/{document_ref}")));
        self.send("update_title", request, secret, &wire::title_update_body(title))?;
        Ok(())
    }

    fn append_blocks(
        &self,
        secret: &str,
        document_ref: &str,
        blocks: &[Block],
    ) -> ClientResult<()> {
        if blocks.len() > DOCUMENT_BLOCK_LIMIT {
            return Err(ClientError::BatchTooLarge {
                given: blocks.len(),
                limit: DOCUMENT_BLOCK_LIMIT,
            });
        }
        let request = self
            .http
            .patch(self.endpoint(&format!("blocks/{document_ref}/children")));
        self.send(
            "append_blocks",
            request,
            secret,
            &wire::append_children_body(blocks),
        )?;
        Ok(())
    }

    fn create_container(
        &self,
        secret: &str,
        parent_ref: &str,
        title: &str,
    ) -> ClientResult<String> {
        let request = self.http.post(self.endpoint("databases"));
        self.send_for_id(
            "create_container",
            request,
            secret,
            &wire::board_schema_body(parent_ref, title),
        )
    }

    fn insert_row(
        &self,
        secret: &str,
        container_ref: &str,
        row: &BoardRow,
    ) -> ClientResult<String> {
        let request = self.http.post(self.endpoint("pages"));
        self.send_for_id(
            "insert_row",
            request,
            secret,
            &wire::insert_row_body(container_ref, row),
        )
    }

    fn update_row(&self, secret: &str, row_ref: &str, row: &BoardRow) -> ClientResult<()> {
        let request = self.http.patch(self.endpoint(&format!("pages/{row_ref}")));
        self.send("update_row", request, secret, &wire::update_row_body(row))?;
        Ok(())
    }
}
