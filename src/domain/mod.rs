//! 作业 / 提交的核心计算
//!
//! 本模块全部为纯函数：输入快照，输出新值，不访问存储、不持有引用。
//!
//! - `status`: 依据截止时间判定作业状态
//! - `projection`: 将提交、作业、班级与关联记录拍平成展示行
//! - `filter`: 状态 / 班级 / 文本过滤
//! - `aggregate`: 面向仪表盘的分组统计

pub mod aggregate;
pub mod filter;
pub mod projection;
pub mod status;

pub use status::DueStatus;
