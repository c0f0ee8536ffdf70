//! 服务键
//!
//! 注册与解析都以 [`ServiceKey`] 为单位：类型 + 名称 + 可选作用域。

use infrastructure_common::TypeInfo;
use std::any::TypeId;
use std::fmt;

/// 未指定名称时使用的规范名称
pub const DEFAULT_SERVICE_NAME: &str = "default";

/// 全局作用域在诊断输出中的显示名称
pub const GLOBAL_SCOPE_LABEL: &str = "global";

/// 服务键
///
/// 三个字段全部相等时两个键才相等。`scope` 为 `None` 表示全局作用域。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    type_info: TypeInfo,
    name: String,
    scope: Option<String>,
}

impl ServiceKey {
    /// 创建新的服务键，缺省名称规范化为 [`DEFAULT_SERVICE_NAME`]
    pub fn new(type_info: TypeInfo, name: Option<&str>, scope: Option<&str>) -> Self {
        Self {
            type_info,
            name: name.unwrap_or(DEFAULT_SERVICE_NAME).to_string(),
            scope: scope.map(str::to_string),
        }
    }

    /// 为类型 `T` 创建服务键
    pub fn of<T: ?Sized + 'static>(name: Option<&str>, scope: Option<&str>) -> Self {
        Self::new(TypeInfo::of::<T>(), name, scope)
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// 是否为全局注册
    pub fn is_global(&self) -> bool {
        self.scope.is_none()
    }

    /// 相同类型和名称，换一个作用域
    pub fn with_scope(&self, scope: Option<&str>) -> Self {
        Self {
            type_info: self.type_info,
            name: self.name.clone(),
            scope: scope.map(str::to_string),
        }
    }

    /// 未找到错误使用的描述，包含完整类型名称
    pub fn descriptor(&self) -> String {
        format!(
            "{} ({}, {})",
            self.type_info.full_name,
            self.name,
            self.scope.as_deref().unwrap_or(GLOBAL_SCOPE_LABEL)
        )
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {})",
            self.type_info.short_name(),
            self.name,
            self.scope.as_deref().unwrap_or(GLOBAL_SCOPE_LABEL)
        )
    }
}
