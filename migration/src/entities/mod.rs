pub mod campaign;
pub mod campaign_link;
pub mod click_event;
pub mod offer;
pub mod product;

pub use campaign::Entity as CampaignEntity;
pub use campaign_link::Entity as CampaignLinkEntity;
pub use click_event::Entity as ClickEventEntity;
pub use offer::Entity as OfferEntity;
pub use product::Entity as ProductEntity;
