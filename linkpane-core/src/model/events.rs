//! Structured records handed to an optional observer hook.
//!
//! The core does not depend on a global subscriber being installed; a caller
//! that wants an audit trail passes an [`EventHook`] to the creator instead.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, LinkErrorKind};

pub type EventHook = Arc<dyn Fn(&LinkEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStage {
    Requested,
    Created,
    /// A precondition failed before any filesystem mutation was attempted.
    Rejected,
    /// The creation call itself failed.
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkEvent {
    /// Shared by every event of one `create_link` call.
    pub id: CompactString,
    pub timestamp: DateTime<Utc>,
    pub stage: LinkStage,
    pub source: PathBuf,
    pub target_folder: PathBuf,
    pub link_path: Option<PathBuf>,
    pub error_kind: Option<LinkErrorKind>,
    pub message: String,
}

impl LinkEvent {
    #[must_use]
    pub fn requested(id: &str, source: PathBuf, target_folder: PathBuf) -> Self {
        Self {
            id: CompactString::new(id),
            timestamp: Utc::now(),
            stage: LinkStage::Requested,
            source,
            target_folder,
            link_path: None,
            error_kind: None,
            message: String::new(),
        }
    }

    #[must_use]
    pub fn created(mut self, link_path: PathBuf, message: String) -> Self {
        self.timestamp = Utc::now();
        self.stage = LinkStage::Created;
        self.link_path = Some(link_path);
        self.message = message;
        self
    }

    #[must_use]
    pub fn errored(mut self, stage: LinkStage, err: &LinkError) -> Self {
        self.timestamp = Utc::now();
        self.stage = stage;
        self.error_kind = Some(err.kind);
        self.message = err.message.to_string();
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
