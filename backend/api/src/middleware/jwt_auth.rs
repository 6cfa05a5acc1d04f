/// JWT authentication middleware
///
/// Accepts the access token either as an `Authorization: Bearer` header or as
/// the `accessToken` httpOnly cookie, validates it, and inserts the resolved
/// [`UserId`] into request extensions for handlers to extract.
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::AppError;
use crate::security::jwt;

/// User ID extracted from a validated access token
#[derive(Debug, Clone, Copy)]
pub struct UserId(pub Uuid);

pub struct JwtAuth {
    settings: Rc<JwtSettings>,
}

impl JwtAuth {
    pub fn new(settings: JwtSettings) -> Self {
        Self {
            settings: Rc::new(settings),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthService {
            service: Rc::new(service),
            settings: self.settings.clone(),
        }))
    }
}

pub struct JwtAuthService<S> {
    service: Rc<S>,
    settings: Rc<JwtSettings>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let settings = self.settings.clone();

        Box::pin(async move {
            let token = extract_token(&req)
                .ok_or_else(|| AppError::Unauthorized("Unauthorized request".to_string()))?;

            let claims = jwt::validate_access_token(&settings, &token).map_err(|e| {
                tracing::warn!("access token validation failed: {}", e);
                e
            })?;

            let user_id = jwt::user_id_from_claims(&claims)?;
            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await
        })
    }
}

/// Bearer header first, `accessToken` cookie as fallback
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(header) = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = header.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    req.cookie("accessToken").map(|c| c.value().to_string())
}

impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<UserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(
                AppError::Unauthorized("User not authenticated".to_string()).into()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::jwt::generate_token_pair;
    use actix_web::{test, web, App, HttpResponse};

    fn test_settings() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_expiry_secs: 900,
            refresh_expiry_secs: 86400,
            issuer: "vidtube".to_string(),
        }
    }

    async fn whoami(user_id: UserId) -> HttpResponse {
        HttpResponse::Ok().body(user_id.0.to_string())
    }

    #[actix_web::test]
    async fn missing_token_is_rejected() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(test_settings()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::try_call_service(&app, req).await;

        let err = resp.expect_err("request without token must fail");
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn bearer_token_is_accepted() {
        let settings = test_settings();
        let user_id = Uuid::new_v4();
        let pair = generate_token_pair(&settings, user_id, "ada").expect("token pair");

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(settings))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn cookie_token_is_accepted() {
        let settings = test_settings();
        let pair = generate_token_pair(&settings, Uuid::new_v4(), "ada").expect("token pair");

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(settings))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(actix_web::cookie::Cookie::new(
                "accessToken",
                pair.access_token,
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn refresh_token_cannot_authenticate() {
        let settings = test_settings();
        let pair = generate_token_pair(&settings, Uuid::new_v4(), "ada").expect("token pair");

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(settings))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", pair.refresh_token)))
            .to_request();
        let resp = test::try_call_service(&app, req).await;

        assert!(resp.is_err());
    }
}
