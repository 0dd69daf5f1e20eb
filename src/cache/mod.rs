//! 对象缓存
//!
//! 后端以插件形式注册（`moka` 内存缓存与 `redis`），启动时按 `cache.type` 选择，
//! 不可用时回退到内存缓存。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 键存在但读取失败（反序列化或连接错误）
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认值
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化 JSON 值，损坏的条目会被删除
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json, ttl).await,
        Err(e) => tracing::warn!("Failed to encode cache entry {}: {}", key, e),
    }
}

/// 当前用户缓存键
pub fn user_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 声明缓存插件：在进程启动时把 `$ty::new()` 注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[::ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                ::std::sync::Arc::new(|| {
                    ::std::boxed::Box::pin(async {
                        <$ty>::new()
                            .map(|cache| {
                                ::std::boxed::Box::new(cache)
                                    as ::std::boxed::Box<dyn $crate::cache::ObjectCache>
                            })
                            .map_err($crate::errors::PortalError::cache_connection)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MapCache(Mutex<HashMap<String, String>>);

    #[async_trait]
    impl ObjectCache for MapCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            match self.0.lock().await.get(key) {
                Some(v) => CacheResult::Found(v.clone()),
                None => CacheResult::NotFound,
            }
        }
        async fn insert_raw(&self, key: String, value: String, _ttl: u64) {
            self.0.lock().await.insert(key, value);
        }
        async fn remove(&self, key: &str) {
            self.0.lock().await.remove(key);
        }
        async fn invalidate_all(&self) {
            self.0.lock().await.clear();
        }
    }

    #[tokio::test]
    async fn test_json_helpers_store_typed_values() {
        let cache = MapCache::default();
        insert_json(&cache, user_key(7), &vec![1, 2, 3], 0).await;
        let back: Option<Vec<i32>> = get_json(&cache, "user:7").await;
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_evicted() {
        let cache = MapCache::default();
        cache
            .insert_raw("user:1".to_string(), "{not json".to_string(), 0)
            .await;
        let back: Option<Vec<i32>> = get_json(&cache, "user:1").await;
        assert!(back.is_none());
        assert_eq!(cache.get_raw("user:1").await, CacheResult::NotFound);
    }
}
