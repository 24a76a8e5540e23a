use crate::config::Config;
use crate::helper::action_result::failure_body;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};

/// The client IP. `X-Forwarded-For` only counts when the peer is a trusted proxy.
fn client_ip(req: &ServiceRequest, config: &Config) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.ip().to_string());
    let from_trusted_proxy = peer.as_deref().is_some_and(|ip| config.is_trusted_proxy(ip));
    if !from_trusted_proxy {
        return peer;
    }
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next()) // Take the first IP if there's a list
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or(peer)
}

fn is_admin_request_allowed(req: &ServiceRequest) -> bool {
    let Some(config) = req.app_data::<web::Data<Config>>() else {
        log::error!("Config is not registered as app data. Denying admin request.");
        return false;
    };

    let ip = client_ip(req, config).unwrap_or_default();
    let is_allowed = config.is_admin_ip_allowed(&ip);
    if !is_allowed {
        log::warn!(
            "Blocked admin request to {} from unauthorized IP: {}",
            req.path(),
            if ip.is_empty() { "<unknown>" } else { ip.as_str() }
        );
    }
    is_allowed
}

/// Rejects admin API requests whose client IP is not on `ADMIN_ALLOWED_IPS`
/// with a 403 envelope.
pub struct AdminAccess;

impl<S, B> Transform<S, ServiceRequest> for AdminAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAccessMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminAccessMiddleware { service })
    }
}

pub struct AdminAccessMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AdminAccessMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_admin_request_allowed(&req) {
            let fut = self.service.call(req);
            Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            })
        } else {
            Box::pin(async move {
                let (http_req, _payload) = req.into_parts();
                let res = HttpResponse::Forbidden()
                    .json(failure_body("Access to the admin API is not allowed from this address."))
                    .map_into_right_body();
                Ok(ServiceResponse::new(http_req, res))
            })
        }
    }
}
