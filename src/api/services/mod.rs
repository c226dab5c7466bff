pub mod campaign;
pub mod health;
pub mod helpers;
pub mod link;
pub mod metrics;
pub mod product;
pub mod redirect;
pub mod types;

pub use campaign::campaign_routes;
pub use health::health_routes;
pub use link::link_routes;
pub use metrics::dashboard_routes;
pub use product::product_routes;
pub use redirect::redirect_route;
pub use types::ApiResponse;
