//! Dashboard metrics endpoint

use actix_web::{Responder, web};
use tracing::trace;

use crate::services::MetricsService;

use super::helpers::{api_result, error_from_afflink, parse_range_end, parse_range_start};
use super::types::MetricsQuery;

pub async fn get_dashboard_metrics(
    query: web::Query<MetricsQuery>,
    metrics: web::Data<MetricsService>,
) -> impl Responder {
    let start = match parse_range_start(&query.start_at) {
        Ok(dt) => dt,
        Err(e) => return error_from_afflink(&e),
    };
    let end = match parse_range_end(&query.end_at) {
        Ok(dt) => dt,
        Err(e) => return error_from_afflink(&e),
    };

    trace!("API: dashboard metrics for [{}, {})", start, end);
    api_result(metrics.get_metrics(start, end).await)
}

/// 看板路由 `/dashboard`
pub fn dashboard_routes() -> actix_web::Scope {
    web::scope("/dashboard").route("/metrics", web::get().to(get_dashboard_metrics))
}
