//! 基于 Tokio 的防抖定时器

use di_abstractions::{DeferredCallback, Debouncer};
use infrastructure_common::CollaboratorError;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

/// 防抖定时器
///
/// 每次调度都会中止上一个挂起的任务，只有最后一次调度的回调会执行。
pub struct TokioDebouncer {
    handle: Handle,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl TokioDebouncer {
    /// 使用当前 Tokio 运行时创建
    pub fn new() -> Result<Self, CollaboratorError> {
        let handle = Handle::try_current().map_err(|e| CollaboratorError::SchedulingFailed {
            message: format!("没有可用的 Tokio 运行时: {e}"),
        })?;
        Ok(Self::with_handle(handle))
    }

    /// 使用指定运行时创建
    pub fn with_handle(handle: Handle) -> Self {
        Self {
            handle,
            pending: Mutex::new(None),
        }
    }
}

impl Debouncer for TokioDebouncer {
    fn schedule(&self, delay: Duration, callback: DeferredCallback) {
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            trace!("替换挂起的回调");
            previous.abort();
        }
        let deadline = Instant::now() + delay;
        *pending = Some(self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            callback();
        }));
    }

    fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TokioDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TokioDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioDebouncer")
            .field("pending", &self.is_pending())
            .finish()
    }
}
