//! SeaORM 实体定义
//!
//! 与 models 中的业务实体分离：Storage 层用这些实体读写数据库，
//! 再通过 `into_xxx()` 转换为业务实体。时间统一以秒级时间戳存储。

pub mod prelude;

pub mod assignments;
pub mod class_students;
pub mod classes;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

/// 秒级时间戳转 UTC 时间，越界时回落到 epoch
pub(crate) fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
