//! 管理员仪表盘：全局统计、分组分析与全量列表
//!
//! 每次请求都从存储读取快照再聚合，不做缓存。

pub mod lists;
pub mod reports;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::analytics::requests::AdminSearchParams;
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from(request),
        }
    }

    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }

    pub async fn user_analytics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::user_analytics(self, request).await
    }

    pub async fn class_analytics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::class_analytics(self, request).await
    }

    pub async fn assignment_analytics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        reports::assignment_analytics(self, request).await
    }

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: AdminSearchParams,
    ) -> ActixResult<HttpResponse> {
        lists::list_classes(self, request, query).await
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AdminSearchParams,
    ) -> ActixResult<HttpResponse> {
        lists::list_assignments(self, request, query).await
    }
}
