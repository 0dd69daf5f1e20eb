/*!
 * 速率限制中间件
 *
 * 固定窗口计数：同一键在窗口内超过上限时返回 429，窗口结束后重新计数。
 * 已认证请求按用户 ID 计数，其余按客户端 IP。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::User};

/// 最长窗口，用于淘汰闲置计数器
const MAX_WINDOW_SECS: u64 = 3600;

/// 键: `前缀:user:ID` 或 `前缀:ip:地址`
static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    /// 计入一次请求，上一个窗口已结束时从 1 重新开始
    fn advance(previous: Option<Window>, now: Instant, window: Duration) -> Window {
        match previous {
            Some(w) if now.duration_since(w.started) < window => Window {
                started: w.started,
                count: w.count.saturating_add(1),
            },
            _ => Window {
                started: now,
                count: 1,
            },
        }
    }

    fn retry_after(&self, now: Instant, window: Duration) -> u64 {
        let elapsed = now.duration_since(self.started);
        window.saturating_sub(elapsed).as_secs().max(1)
    }
}

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.min(MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 加入班级：10 次/分钟，防止枚举班级码
    pub fn join_class() -> Self {
        Self::new(10, 60).with_prefix("join")
    }
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

/// 客户端 IP：优先连接信息，其次 X-Forwarded-For 首项与 X-Real-IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    req.extensions().get::<User>().map(|user| user.id)
}

fn limit_key(prefix: &str, req: &ServiceRequest) -> String {
    // extensions 借用须在读取 connection_info 之前释放
    let identifier = match extract_user_id(req) {
        Some(id) => format!("user:{id}"),
        None => format!("ip:{}", extract_client_ip(req)),
    };

    if prefix.is_empty() {
        identifier
    } else {
        format!("{prefix}:{identifier}")
    }
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.config.max_requests;
        let window = Duration::from_secs(self.config.window_secs);
        let key = limit_key(&self.config.key_prefix, &req);

        Box::pin(async move {
            let now = Instant::now();
            let current = RATE_LIMIT_CACHE
                .entry(key.clone())
                .and_upsert_with(|existing| {
                    let previous = existing.map(|entry| *entry.value());
                    std::future::ready(Window::advance(previous, now, window))
                })
                .await
                .into_value();

            if current.count > max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    key, current.count, max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(current.retry_after(now, window))
                        .map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");

        let register = RateLimit::register();
        assert_eq!((register.max_requests, register.window_secs), (3, 60));

        assert_eq!(RateLimit::join_class().key_prefix, "join");
        assert_eq!(RateLimit::new(1, 86_400).window_secs, MAX_WINDOW_SECS);
    }

    #[test]
    fn test_window_counts_then_resets() {
        let window = Duration::from_secs(60);
        let t0 = Instant::now();

        let w = Window::advance(None, t0, window);
        assert_eq!(w.count, 1);
        let w = Window::advance(Some(w), t0 + Duration::from_secs(10), window);
        let w = Window::advance(Some(w), t0 + Duration::from_secs(59), window);
        assert_eq!(w.count, 3);
        assert_eq!(w.started, t0);

        let w = Window::advance(Some(w), t0 + Duration::from_secs(60), window);
        assert_eq!(w.count, 1);
        assert_eq!(w.started, t0 + Duration::from_secs(60));
    }

    #[test]
    fn test_retry_after_never_zero() {
        let window = Duration::from_secs(60);
        let t0 = Instant::now();
        let w = Window::advance(None, t0, window);
        assert_eq!(w.retry_after(t0 + Duration::from_secs(15), window), 45);
        assert_eq!(w.retry_after(t0 + Duration::from_millis(59_900), window), 1);
    }

    #[test]
    fn test_limit_key_for_anonymous_and_signed_in() {
        use crate::domain::projection::fixtures::{ts, user};
        use crate::models::users::UserRole;
        use actix_web::test::TestRequest;

        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "198.51.100.4"))
            .to_srv_request();
        assert_eq!(limit_key("login", &req), "login:ip:198.51.100.4");
        assert_eq!(limit_key("", &req), "ip:198.51.100.4");

        let req = TestRequest::default().to_srv_request();
        req.extensions_mut()
            .insert(user(42, "S", UserRole::Student, ts(1, 0)));
        assert_eq!(limit_key("join", &req), "join:user:42");
    }

    #[actix_web::test]
    async fn test_middleware_rejects_after_limit() {
        use actix_web::{App, HttpResponse, test, web};

        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::new(2, 60).with_prefix("anon-test"))
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = test::TestRequest::post()
                .uri("/login")
                .insert_header(("X-Forwarded-For", "203.0.113.9"))
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }
}
