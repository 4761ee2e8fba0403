use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::application::lead_service::RequestContext;
use crate::domain::error::DomainError;
use crate::presentation::middleware::RequestId;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(
                DomainError::Unauthorized("authentication required".into()).into(),
            )),
        }
    }
}

/// Resolves a bearer token to a live user. A token whose user has since been
/// deleted is rejected like a missing one.
pub async fn extract_user_from_token(
    token: &str,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, DomainError> {
    let claims = auth_service
        .keys()
        .verify_token(token)
        .map_err(|_| DomainError::InvalidToken)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::InvalidToken)?;

    let user = match auth_service.get_user(user_id).await {
        Ok(user) => user,
        Err(DomainError::UserNotFound(_)) => {
            return Err(DomainError::Unauthorized("user no longer exists".into()));
        }
        Err(e) => return Err(e),
    };

    Ok(AuthenticatedUser { id: user.id })
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Decides which address identifies the caller. Behind a reverse proxy the
/// socket peer is the proxy itself, so the forwarded chain is trusted instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpSource {
    pub trust_proxy: bool,
}

impl ClientIpSource {
    pub fn new(trust_proxy: bool) -> Self {
        Self { trust_proxy }
    }

    pub fn client_ip(&self, req: &HttpRequest) -> Option<String> {
        if self.trust_proxy {
            if let Some(ip) = req.connection_info().realip_remote_addr() {
                return Some(strip_port(ip).to_string());
            }
        }
        req.peer_addr().map(|addr| addr.ip().to_string())
    }

    pub fn request_context(&self, req: &HttpRequest) -> RequestContext {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        RequestContext {
            ip: self.client_ip(req),
            referrer: header("referer"),
            user_agent: header("user-agent"),
        }
    }
}

/// `203.0.113.7:5123` and `[2001:db8::1]:443` lose their ports; bare
/// addresses pass through.
fn strip_port(addr: &str) -> &str {
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match addr.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => addr,
    }
}
