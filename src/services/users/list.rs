use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::config::AppConfig;
use crate::domain::filter::search;
use crate::models::{
    ApiResponse, paginate_items,
    users::{
        User, UserRole,
        requests::{UserListParams, UserListQuery},
        responses::{RecentUsersResponse, UserListResponse},
    },
};
use crate::services::internal_error;

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();
    let has_search = query.search.as_deref().is_some_and(|q| !q.trim().is_empty());

    let result = if has_search {
        storage.list_all_users().await.map(|users| {
            search_users(users, query.role, query.search.as_deref(), page, size)
        })
    } else {
        storage
            .list_users_with_pagination(UserListQuery {
                page,
                size,
                role: query.role,
            })
            .await
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve user list", e)),
    }
}

/// 内存中按角色与关键词过滤后分页，排序与数据库分页一致（创建时间倒序）
fn search_users(
    mut users: Vec<User>,
    role: Option<UserRole>,
    query: Option<&str>,
    page: u64,
    size: u64,
) -> UserListResponse {
    if let Some(role) = role {
        users.retain(|u| u.role == role);
    }
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let (items, pagination) = paginate_items(search(users, query), page, size);
    UserListResponse { items, pagination }
}

pub async fn list_recent_users(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let limit = AppConfig::get().dashboard.recent_users_limit;

    match storage.list_recent_users(limit).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RecentUsersResponse { items },
            "Recent users retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve recent users", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::fixtures::{ts, user};

    #[test]
    fn test_search_is_unicode_case_insensitive_and_role_scoped() {
        let users = vec![
            user(1, "Émile Zola", UserRole::Teacher, ts(1, 8)),
            user(2, "Emil Student", UserRole::Student, ts(2, 8)),
            user(3, "Zoé Martin", UserRole::Student, ts(3, 8)),
        ];

        let found = search_users(users.clone(), None, Some("ÉMILE"), 1, 20);
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].id, 1);

        let students = search_users(users.clone(), Some(UserRole::Student), Some("zo"), 1, 20);
        assert_eq!(students.items.len(), 1);
        assert_eq!(students.items[0].id, 3);

        // 邮箱同样参与匹配，结果按创建时间倒序
        let by_email = search_users(users, None, Some("@SCHOOL.test"), 1, 2);
        assert_eq!(by_email.items.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(by_email.pagination.total, 3);
        assert_eq!(by_email.pagination.total_pages, 2);
    }
}
