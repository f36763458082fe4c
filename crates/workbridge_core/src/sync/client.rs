//! Document-service client contract.

use crate::model::block::Block;
use crate::model::task::BoardRow;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of one document-service call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("document service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("document service request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("document service response could not be decoded: {0}")]
    Decode(String),
    #[error("append batch of {given} blocks exceeds limit {limit}")]
    BatchTooLarge { given: usize, limit: usize },
}

impl ClientError {
    /// HTTP status of the failed call, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            Self::Decode(_) | Self::BatchTooLarge { .. } => None,
        }
    }
}

/// Blocking operations the export orchestrator issues against the workspace.
pub trait DocumentClient {
    /// Creates an empty document titled `title` under `parent_ref` and
    /// returns its reference.
    fn create_page(&self, secret: &str, parent_ref: &str, title: &str) -> ClientResult<String>;

    /// Replaces the title of an existing document.
    fn update_title(&self, secret: &str, document_ref: &str, title: &str) -> ClientResult<()>;

    /// Appends at most one batch of blocks to the end of a document.
    fn append_blocks(&self, secret: &str, document_ref: &str, blocks: &[Block])
        -> ClientResult<()>;

    /// Creates the task board container under `parent_ref` and returns its
    /// reference.
    fn create_container(&self, secret: &str, parent_ref: &str, title: &str)
        -> ClientResult<String>;

    /// Inserts one board row and returns its reference.
    fn insert_row(&self, secret: &str, container_ref: &str, row: &BoardRow)
        -> ClientResult<String>;

    /// Overwrites the fields of an already exported board row.
    fn update_row(&self, secret: &str, row_ref: &str, row: &BoardRow) -> ClientResult<()>;
}

impl<C: DocumentClient + ?Sized> DocumentClient for &C {
    fn create_page(&self, secret: &str, parent_ref: &str, title: &str) -> ClientResult<String> {
        (**self).create_page(secret, parent_ref, title)
    }

    fn update_title(&self, secret: &str, document_ref: &str, title: &str) -> ClientResult<()> {
        (**self).update_title(secret, document_ref, title)
    }

    fn append_blocks(
        &self,
        secret: &str,
        document_ref: &str,
        blocks: &[Block],
    ) -> ClientResult<()> {
        (**self).append_blocks(secret, document_ref, blocks)
    }

    fn create_container(
        &self,
        secret: &str,
        parent_ref: &str,
        title: &str,
    ) -> ClientResult<String> {
        (**self).create_container(secret, parent_ref, title)
    }

    fn insert_row(
        &self,
        secret: &str,
        container_ref: &str,
        row: &BoardRow,
    ) -> ClientResult<String> {
        (**self).insert_row(secret, container_ref, row)
    }

    fn update_row(&self, secret: &str, row_ref: &str, row: &BoardRow) -> ClientResult<()> {
        (**self).update_row(secret, row_ref, row)
    }
}
