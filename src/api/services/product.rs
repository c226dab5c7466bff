//! Product catalog endpoints

use actix_web::{Responder, web};
use tracing::trace;

use crate::services::CatalogService;

use super::helpers::api_result;
use super::types::CreateProductRequest;

pub async fn post_product(
    body: web::Json<CreateProductRequest>,
    catalog: web::Data<CatalogService>,
) -> impl Responder {
    trace!("API: create product from {}", body.source_url);
    api_result(
        catalog
            .create_product(&body.source_url, body.marketplace)
            .await,
    )
}

pub async fn get_products(catalog: web::Data<CatalogService>) -> impl Responder {
    api_result(catalog.list_products().await)
}

pub async fn get_product(
    path: web::Path<String>,
    catalog: web::Data<CatalogService>,
) -> impl Responder {
    api_result(catalog.get_product(&path.into_inner()).await)
}

pub async fn delete_product(
    path: web::Path<String>,
    catalog: web::Data<CatalogService>,
) -> impl Responder {
    api_result(catalog.delete_product(&path.into_inner()).await)
}

pub async fn get_latest_offer(
    path: web::Path<String>,
    catalog: web::Data<CatalogService>,
) -> impl Responder {
    api_result(catalog.latest_offer(&path.into_inner()).await)
}

pub async fn refresh_offer(
    path: web::Path<String>,
    catalog: web::Data<CatalogService>,
) -> impl Responder {
    api_result(catalog.refresh_offer(&path.into_inner()).await)
}

/// 商品路由 `/product`
pub fn product_routes() -> actix_web::Scope {
    web::scope("/product")
        .route("", web::post().to(post_product))
        .route("", web::get().to(get_products))
        .route("/{id}/offer", web::get().to(get_latest_offer))
        .route("/{id}/offer", web::post().to(refresh_offer))
        .route("/{id}", web::get().to(get_product))
        .route("/{id}", web::delete().to(delete_product))
}
