use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::info;

use afflink::api::services::{
    campaign_routes, dashboard_routes, health_routes, link_routes, product_routes, redirect_route,
};
use afflink::config::{get_config, init_config};
use afflink::services::{
    CampaignService, CatalogService, LinkService, MetricsService, RedirectService, StubResolver,
};
use afflink::storage::StorageFactory;
use afflink::system::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_config();
    let config = get_config();

    // guard 活到进程结束，保证日志落盘
    let _log_guard = init_logging(&config);

    let storage = StorageFactory::create().await.unwrap_or_else(|e| {
        eprintln!("Failed to initialize storage: {}", e);
        std::process::exit(1);
    });
    info!("Using storage backend: {}", storage.get_backend_name());

    let resolver = Arc::new(StubResolver);

    let catalog = web::Data::new(CatalogService::new(
        storage.clone(),
        resolver.clone(),
        resolver.clone(),
    ));
    let campaigns = web::Data::new(CampaignService::new(storage.clone()));
    let links = web::Data::new(LinkService::new(storage.clone()));
    let metrics = web::Data::new(MetricsService::new(storage.clone()));
    let redirect = web::Data::new(RedirectService::new(
        storage.clone(),
        storage.as_click_sink(),
    ));
    let storage_data = web::Data::new(storage);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(storage_data.clone())
            .app_data(catalog.clone())
            .app_data(campaigns.clone())
            .app_data(links.clone())
            .app_data(metrics.clone())
            .app_data(redirect.clone())
            .service(
                web::scope("/api/v1")
                    .service(product_routes())
                    .service(campaign_routes())
                    .service(link_routes())
                    .service(dashboard_routes()),
            )
            .service(health_routes())
            // 兜底：根路径与任意短码的跳转
            .configure(redirect_route)
    })
    .bind(bind_address)?
    .run()
    .await
}
