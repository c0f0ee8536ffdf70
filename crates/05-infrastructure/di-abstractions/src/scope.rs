//! 路由派生的作用域
//!
//! 路由是调用方提供的有序段序列，每段通过 `Display` 给出规范的字符串形式。
//! 路由 `[root, parent, child]` 对应作用域路径 `root/parent/child`。
//! 段内的 `/` 和 `%` 会被转义为 `%2F` 和 `%25`，单个段 `a/b` 因此不会与路由 `[a, b]` 混淆。

use std::fmt::Display;

/// 作用域路径分隔符
pub const SCOPE_SEPARATOR: &str = "/";

/// 当前路由的提供者，每次调用都重新读取
pub trait RouteProvider: Send + Sync {
    /// 路由段类型
    type Segment: Display;

    /// 获取当前路由
    fn current_route(&self) -> Vec<Self::Segment>;
}

impl<F, S> RouteProvider for F
where
    F: Fn() -> Vec<S> + Send + Sync,
    S: Display,
{
    type Segment = S;

    fn current_route(&self) -> Vec<S> {
        self()
    }
}

/// 将路由段连接为作用域路径
pub fn scope_path<S: Display>(route: &[S]) -> String {
    route
        .iter()
        .map(segment_text)
        .collect::<Vec<_>>()
        .join(SCOPE_SEPARATOR)
}

/// 路由的所有非空前缀，从最具体到最不具体
pub fn scope_chain<S: Display>(route: &[S]) -> Vec<String> {
    let segments: Vec<String> = route.iter().map(segment_text).collect();
    (1..=segments.len())
        .rev()
        .map(|len| segments[..len].join(SCOPE_SEPARATOR))
        .collect()
}

/// 单个段的规范文本，转义分隔符
fn segment_text<S: Display>(segment: &S) -> String {
    let raw = segment.to_string();
    if raw.contains(['%', '/']) {
        raw.replace('%', "%25").replace('/', "%2F")
    } else {
        raw
    }
}
