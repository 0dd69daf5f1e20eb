pub mod analytics;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod common;
pub mod submissions;
pub mod users;

pub use common::{
    ApiResponse, AppStartTime, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery,
    paginate_items,
};
