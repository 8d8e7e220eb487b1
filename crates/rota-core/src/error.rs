//! Error types for `rota-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("event not found: {0}")]
  EventNotFound(Uuid),

  #[error("no schedule exists for event {0}")]
  ScheduleNotFound(Uuid),

  #[error("template not found: {0}")]
  TemplateNotFound(Uuid),

  #[error("unknown event kind code: {0}")]
  UnknownEventKind(i64),

  #[error("unknown member status: {0:?}")]
  UnknownMemberStatus(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
