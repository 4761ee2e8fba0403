//! Fixed-window request limiting keyed by client address.

use std::collections::HashMap;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use futures_util::future::LocalBoxFuture;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::error::DomainError;
use crate::presentation::utils::ClientIpSource;

#[derive(Debug, Clone, Copy)]
struct Window {
    hits: u32,
    started: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Counts one request for `key`; `false` once the window is exhausted.
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let entry = windows.entry(key.to_owned()).or_insert(Window {
            hits: 0,
            started: now,
        });
        if entry.hits >= self.max_requests {
            return false;
        }
        entry.hits += 1;
        true
    }
}

pub struct RateLimitMiddleware {
    limiter: RateLimiter,
    ip_source: ClientIpSource,
}

impl RateLimitMiddleware {
    pub fn new(limiter: RateLimiter, ip_source: ClientIpSource) -> Self {
        Self { limiter, ip_source }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            ip_source: self.ip_source,
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    limiter: RateLimiter,
    ip_source: ClientIpSource,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let key = self
            .ip_source
            .client_ip(req.request())
            .unwrap_or_else(|| "unknown".into());

        Box::pin(async move {
            if !limiter.check(&key).await {
                warn!(path = %req.path(), "rate limit exceeded");
                return Ok(req
                    .error_response(DomainError::RateLimited)
                    .map_into_right_body());
            }
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
