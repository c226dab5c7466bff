//! Liveness endpoint

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use serde::Serialize;
use tracing::trace;

use crate::storage::SeaOrmStorage;

use super::helpers::json_response;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: String,
}

/// 健康检查直接 ping 存储层，不走业务逻辑
pub async fn health_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
    trace!("Received health check request");

    let backend = storage.get_backend_name().to_string();

    match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
        Ok(Ok(())) => json_response(
            StatusCode::OK,
            0,
            "OK",
            Some(HealthResponse {
                status: "healthy",
                backend,
            }),
        ),
        Ok(Err(e)) => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            -1,
            format!("storage unhealthy: {}", e),
            Some(HealthResponse {
                status: "unhealthy",
                backend,
            }),
        ),
        Err(_) => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            -1,
            "storage ping timed out",
            Some(HealthResponse {
                status: "unhealthy",
                backend,
            }),
        ),
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health").route("", web::get().to(health_check))
}
