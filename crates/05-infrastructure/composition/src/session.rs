//! 装配会话

use chrono::{DateTime, Utc};
use tracing::{info_span, Span};
use uuid::Uuid;

/// 一次顶层装配的会话信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblySession {
    /// 会话ID
    pub id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
}

impl AssemblySession {
    /// 开始新的装配会话
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// 会话的日志 span
    pub fn span(&self) -> Span {
        info_span!("assembly", session = %self.id, started_at = %self.started_at.to_rfc3339())
    }

    /// 自开始以来经过的毫秒数
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for AssemblySession {
    fn default() -> Self {
        Self::new()
    }
}
