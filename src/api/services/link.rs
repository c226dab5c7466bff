//! Affiliate link endpoints

use actix_web::{Responder, web};
use tracing::trace;

use crate::services::LinkService;

use super::helpers::api_result;
use super::types::CreateLinkRequest;

pub async fn post_link(
    body: web::Json<CreateLinkRequest>,
    links: web::Data<LinkService>,
) -> impl Responder {
    trace!(
        "API: create link for campaign '{}' / product '{}'",
        body.campaign_id, body.product_id
    );
    api_result(links.create_link(&body.campaign_id, &body.product_id).await)
}

pub async fn get_links_for_campaign(
    path: web::Path<String>,
    links: web::Data<LinkService>,
) -> impl Responder {
    api_result(links.list_links_for_campaign(&path.into_inner()).await)
}

/// 纯查询，不记点击
pub async fn get_link_by_code(
    path: web::Path<String>,
    links: web::Data<LinkService>,
) -> impl Responder {
    api_result(links.resolve_by_code(&path.into_inner()).await)
}

pub async fn delete_link(
    path: web::Path<String>,
    links: web::Data<LinkService>,
) -> impl Responder {
    api_result(links.delete_link(&path.into_inner()).await)
}

/// 链接路由 `/link`
pub fn link_routes() -> actix_web::Scope {
    web::scope("/link")
        .route("", web::post().to(post_link))
        .route("/campaign/{id}", web::get().to(get_links_for_campaign))
        .route("/short-code/{code}", web::get().to(get_link_by_code))
        .route("/{id}", web::delete().to(delete_link))
}
