//! Campaign endpoints
//!
//! 活动归属上游网关鉴过权的用户，身份由 X-User-Id 头传入。

use actix_web::{HttpRequest, Responder, web};
use tracing::trace;

use crate::services::CampaignService;

use super::helpers::{api_result, error_from_afflink, owner_from_request};
use super::types::CreateCampaignRequest;

pub async fn post_campaign(
    req: HttpRequest,
    body: web::Json<CreateCampaignRequest>,
    campaigns: web::Data<CampaignService>,
) -> impl Responder {
    let owner = match owner_from_request(&req) {
        Ok(owner) => owner,
        Err(e) => return error_from_afflink(&e),
    };

    trace!("API: create campaign '{}' for owner '{}'", body.name, owner);
    api_result(
        campaigns
            .create_campaign(
                &owner,
                &body.name,
                body.start_at,
                body.end_at,
                &body.utm_campaign,
            )
            .await,
    )
}

pub async fn get_campaigns(
    req: HttpRequest,
    campaigns: web::Data<CampaignService>,
) -> impl Responder {
    let owner = match owner_from_request(&req) {
        Ok(owner) => owner,
        Err(e) => return error_from_afflink(&e),
    };

    api_result(campaigns.list_campaigns(&owner).await)
}

pub async fn get_active_campaigns(campaigns: web::Data<CampaignService>) -> impl Responder {
    api_result(campaigns.list_active_campaigns().await)
}

pub async fn delete_campaign(
    req: HttpRequest,
    path: web::Path<String>,
    campaigns: web::Data<CampaignService>,
) -> impl Responder {
    if let Err(e) = owner_from_request(&req) {
        return error_from_afflink(&e);
    }

    api_result(campaigns.delete_campaign(&path.into_inner()).await)
}

/// 活动路由 `/campaign`
pub fn campaign_routes() -> actix_web::Scope {
    web::scope("/campaign")
        .route("", web::post().to(post_campaign))
        .route("", web::get().to(get_campaigns))
        .route("/active", web::get().to(get_active_campaigns))
        .route("/{id}", web::delete().to(delete_campaign))
}
