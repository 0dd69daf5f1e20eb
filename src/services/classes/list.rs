use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::domain::filter::search;
use crate::domain::projection::Lookup;
use crate::errors::Result;
use crate::models::{
    ApiResponse, PaginatedResponse, paginate_items,
    classes::{
        entities::Class,
        requests::{ClassListQuery, ClassQueryParams},
        responses::ClassListResponse,
    },
    users::{User, UserRole},
};
use crate::services::{current_user, internal_error, rows::unique_ids};
use crate::storage::Storage;

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let (page, size) = query.pagination.normalized();
    let has_search = query.search.as_deref().is_some_and(|q| !q.trim().is_empty());

    let response = if has_search {
        search_classes(&storage, &user, query.search.as_deref(), page, size).await
    } else {
        page_classes(&storage, &user, page, size).await
    };

    match response {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve class list", e)),
    }
}

/// 无搜索词时直接在数据库分页
async fn page_classes(
    storage: &Arc<dyn Storage>,
    user: &User,
    page: u64,
    size: u64,
) -> Result<ClassListResponse> {
    let mut list_query = ClassListQuery {
        page,
        size,
        ..Default::default()
    };

    // 管理员查看全部，教师只看自己的班级，学生只看已加入的班级
    match user.role {
        UserRole::Admin => {}
        UserRole::Teacher => list_query.teacher_id = Some(user.id),
        UserRole::Student => list_query.student_id = Some(user.id),
    }

    let result: PaginatedResponse<Class> =
        storage.list_classes_with_pagination(list_query).await?;
    let teachers = class_teachers(storage, &result.items).await?;

    Ok(ClassListResponse {
        pagination: result.pagination,
        items: Lookup::new(&[], &[], &teachers).classes(&result.items),
    })
}

/// 有搜索词时先投影再匹配，教师姓名也参与搜索
async fn search_classes(
    storage: &Arc<dyn Storage>,
    user: &User,
    query: Option<&str>,
    page: u64,
    size: u64,
) -> Result<ClassListResponse> {
    let mut classes = match user.role {
        UserRole::Admin => storage.list_all_classes().await?,
        UserRole::Teacher => storage.list_classes_by_teacher(user.id).await?,
        UserRole::Student => storage.list_classes_by_student(user.id).await?,
    };
    classes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let teachers = class_teachers(storage, &classes).await?;
    let rows = search(Lookup::new(&[], &[], &teachers).classes(&classes), query);
    let (items, pagination) = paginate_items(rows, page, size);

    Ok(ClassListResponse { pagination, items })
}

async fn class_teachers(storage: &Arc<dyn Storage>, classes: &[Class]) -> Result<Vec<User>> {
    let teacher_ids = unique_ids(classes.iter().map(|c| c.teacher_id));
    storage.list_users_by_ids(&teacher_ids).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::requests::NewClass;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    async fn add_user(storage: &Arc<dyn Storage>, name: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@school.test", name.to_lowercase().replace(' ', ".")),
                password: "hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    async fn add_class(storage: &Arc<dyn Storage>, teacher: &User, title: &str, code: &str) -> Class {
        storage
            .create_class(NewClass {
                teacher_id: teacher.id,
                title: title.to_string(),
                code: code.to_string(),
                description: None,
                subject: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_matches_teacher_name_and_unicode_case() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let curie = add_user(&storage, "Marie Curie", UserRole::Teacher).await;
        let other = add_user(&storage, "Alan Turing", UserRole::Teacher).await;
        let admin = add_user(&storage, "Root", UserRole::Admin).await;
        add_class(&storage, &curie, "Période Trois", "PER-3").await;
        add_class(&storage, &other, "Logic", "LOG-1").await;

        let by_teacher = search_classes(&storage, &admin, Some("curie"), 1, 20).await.unwrap();
        assert_eq!(by_teacher.items.len(), 1);
        assert_eq!(by_teacher.items[0].teacher_name, "Marie Curie");
        assert_eq!(by_teacher.pagination.total, 1);

        let accented = search_classes(&storage, &admin, Some("PÉRIODE"), 1, 20).await.unwrap();
        assert_eq!(accented.items.len(), 1);
        assert_eq!(accented.items[0].code, "PER-3");

        // 教师只能搜到自己的班级
        let scoped = search_classes(&storage, &other, Some("curie"), 1, 20).await.unwrap();
        assert!(scoped.items.is_empty());
    }

    #[tokio::test]
    async fn test_listing_is_scoped_by_role() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let t1 = add_user(&storage, "Teacher One", UserRole::Teacher).await;
        let t2 = add_user(&storage, "Teacher Two", UserRole::Teacher).await;
        let student = add_user(&storage, "Student", UserRole::Student).await;
        let admin = add_user(&storage, "Root", UserRole::Admin).await;
        let algebra = add_class(&storage, &t1, "Algebra", "ALG-1").await;
        add_class(&storage, &t2, "Biology", "BIO-1").await;
        storage.enroll_student(algebra.id, student.id).await.unwrap();

        let all = page_classes(&storage, &admin, 1, 20).await.unwrap();
        assert_eq!(all.pagination.total, 2);

        let own = page_classes(&storage, &t2, 1, 20).await.unwrap();
        assert_eq!(own.items.len(), 1);
        assert_eq!(own.items[0].title, "Biology");
        assert_eq!(own.items[0].teacher_name, "Teacher Two");

        let joined = page_classes(&storage, &student, 1, 20).await.unwrap();
        assert_eq!(joined.items.len(), 1);
        assert_eq!(joined.items[0].id, algebra.id);
        assert_eq!(joined.items[0].student_count, 1);
    }
}
