//! 可共享的路由栈

use di_abstractions::RouteProvider;
use parking_lot::RwLock;
use std::fmt::Display;
use std::sync::Arc;
use tracing::trace;

/// 由调用方命令式维护的路由栈
///
/// 克隆共享同一个栈，导航时修改，解析时读取快照。
#[derive(Debug)]
pub struct SharedRoute<S> {
    segments: Arc<RwLock<Vec<S>>>,
}

impl<S> Clone for SharedRoute<S> {
    fn clone(&self) -> Self {
        Self {
            segments: Arc::clone(&self.segments),
        }
    }
}

impl<S> Default for SharedRoute<S> {
    fn default() -> Self {
        Self {
            segments: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<S: Display> SharedRoute<S> {
    /// 使用初始路由创建
    pub fn new(initial: Vec<S>) -> Self {
        Self {
            segments: Arc::new(RwLock::new(initial)),
        }
    }

    /// 进入下一层
    pub fn push(&self, segment: S) {
        trace!(segment = %segment, "路由进入");
        self.segments.write().push(segment);
    }

    /// 返回上一层
    pub fn pop(&self) -> Option<S> {
        self.segments.write().pop()
    }

    /// 保留前 `len` 段
    pub fn truncate(&self, len: usize) {
        self.segments.write().truncate(len);
    }

    /// 替换整个路由
    pub fn replace(&self, route: Vec<S>) {
        *self.segments.write() = route;
    }

    pub fn len(&self) -> usize {
        self.segments.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.read().is_empty()
    }
}

impl<S> RouteProvider for SharedRoute<S>
where
    S: Display + Clone + Send + Sync,
{
    type Segment = S;

    fn current_route(&self) -> Vec<S> {
        self.segments.read().clone()
    }
}
