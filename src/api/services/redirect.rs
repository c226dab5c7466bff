//! Short-code redirect endpoint
//!
//! 点击事件先落库，落库失败不放行跳转。

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, instrument};

use crate::config::get_config;
use crate::errors::AfflinkError;
use crate::services::RedirectService;

fn not_found_response() -> HttpResponse {
    HttpResponse::build(StatusCode::NOT_FOUND)
        .insert_header(("Content-Type", "text/html; charset=utf-8"))
        .insert_header(("Cache-Control", "public, max-age=60"))
        .body("Not Found")
}

#[instrument(skip(redirect), fields(path = %path))]
pub async fn handle_redirect(
    path: web::Path<String>,
    redirect: web::Data<RedirectService>,
) -> impl Responder {
    let code = path.into_inner();

    if code.is_empty() {
        let default_url = get_config().redirect.default_url.clone();
        return HttpResponse::TemporaryRedirect()
            .insert_header(("Location", default_url))
            .finish();
    }

    match redirect.resolve(&code).await {
        Ok(target) => HttpResponse::TemporaryRedirect()
            .insert_header(("Location", target))
            .finish(),
        Err(AfflinkError::NotFound(_)) => {
            debug!("Redirect miss: {}", code);
            not_found_response()
        }
        Err(e) => {
            debug!("Redirect aborted: {}", e);
            HttpResponse::build(e.http_status())
                .insert_header(("Content-Type", "text/html; charset=utf-8"))
                .body("Service Unavailable")
        }
    }
}

/// 兜底路由：根路径与任意短码
pub fn redirect_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/{path:.*}", web::get().to(handle_redirect));
}
