//! Entity Model 与领域结构体之间的转换

use crate::errors::{AfflinkError, Result};
use crate::storage::models::{Campaign, Link, Marketplace, Offer, Product};
use migration::entities::{campaign, campaign_link, offer, product};

/// 解析存储层的 marketplace 字符串
///
/// 数据库里出现未知市场说明数据已损坏，按存储错误上报。
fn parse_marketplace(raw: &str) -> Result<Marketplace> {
    raw.parse::<Marketplace>()
        .map_err(|e| AfflinkError::storage(format!("损坏的 marketplace 值: {}", e)))
}

pub fn model_to_product(model: product::Model) -> Result<Product> {
    Ok(Product {
        marketplace: parse_marketplace(&model.marketplace)?,
        id: model.id,
        title: model.title,
        image_url: model.image_url,
        source_url: model.source_url,
        created_at: model.created_at,
    })
}

pub fn product_to_active_model(p: &Product) -> product::ActiveModel {
    use sea_orm::ActiveValue::Set;

    product::ActiveModel {
        id: Set(p.id.clone()),
        title: Set(p.title.clone()),
        image_url: Set(p.image_url.clone()),
        source_url: Set(p.source_url.clone()),
        marketplace: Set(p.marketplace.to_string()),
        created_at: Set(p.created_at),
    }
}

pub fn model_to_offer(model: offer::Model) -> Result<Offer> {
    Ok(Offer {
        marketplace: parse_marketplace(&model.marketplace)?,
        id: model.id,
        product_id: model.product_id,
        store_name: model.store_name,
        price: model.price,
        last_checked_at: model.last_checked_at,
    })
}

pub fn offer_to_active_model(o: &Offer) -> offer::ActiveModel {
    use sea_orm::ActiveValue::Set;

    offer::ActiveModel {
        id: Set(o.id.clone()),
        product_id: Set(o.product_id.clone()),
        marketplace: Set(o.marketplace.to_string()),
        store_name: Set(o.store_name.clone()),
        price: Set(o.price),
        last_checked_at: Set(o.last_checked_at),
    }
}

pub fn model_to_campaign(model: campaign::Model) -> Campaign {
    Campaign {
        id: model.id,
        owner_user_id: model.owner_user_id,
        name: model.name,
        start_at: model.start_at,
        end_at: model.end_at,
        utm_campaign: model.utm_campaign,
        created_at: model.created_at,
    }
}

pub fn campaign_to_active_model(c: &Campaign) -> campaign::ActiveModel {
    use sea_orm::ActiveValue::Set;

    campaign::ActiveModel {
        id: Set(c.id.clone()),
        owner_user_id: Set(c.owner_user_id.clone()),
        name: Set(c.name.clone()),
        start_at: Set(c.start_at),
        end_at: Set(c.end_at),
        utm_campaign: Set(c.utm_campaign.clone()),
        created_at: Set(c.created_at),
    }
}

pub fn model_to_link(model: campaign_link::Model) -> Link {
    Link {
        id: model.id,
        campaign_id: model.campaign_id,
        product_id: model.product_id,
        short_code: model.short_code,
        target_url: model.target_url,
        created_at: model.created_at,
    }
}

pub fn link_to_active_model(l: &Link) -> campaign_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    campaign_link::ActiveModel {
        id: Set(l.id.clone()),
        campaign_id: Set(l.campaign_id.clone()),
        product_id: Set(l.product_id.clone()),
        short_code: Set(l.short_code.clone()),
        target_url: Set(l.target_url.clone()),
        created_at: Set(l.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn create_test_product_model() -> product::Model {
        product::Model {
            id: "p-1".to_string(),
            title: "Wireless Earbuds".to_string(),
            image_url: "https://cf.shopee.sg/file/abc".to_string(),
            source_url: "https://shopee.sg/item/123".to_string(),
            marketplace: "shopee".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_product_basic() {
        let model = create_test_product_model();
        let expected_id = model.id.clone();

        let p = model_to_product(model).unwrap();

        assert_eq!(p.id, expected_id);
        assert_eq!(p.marketplace, Marketplace::Shopee);
    }

    #[test]
    fn test_model_to_product_corrupt_marketplace() {
        let mut model = create_test_product_model();
        model.marketplace = "ebay".to_string();

        assert!(model_to_product(model).is_err());
    }

    #[test]
    fn test_product_roundtrip() {
        use sea_orm::ActiveValue;

        let p = model_to_product(create_test_product_model()).unwrap();
        let active = product_to_active_model(&p);

        if let ActiveValue::Set(marketplace) = active.marketplace {
            assert_eq!(marketplace, "shopee");
        } else {
            panic!("marketplace must be set");
        }
        assert!(matches!(active.id, ActiveValue::Set(_)));
        assert!(matches!(active.created_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_link_roundtrip() {
        let link = Link {
            id: "l-1".to_string(),
            campaign_id: "c-1".to_string(),
            product_id: "p-1".to_string(),
            short_code: "Ab3xYz".to_string(),
            target_url: "https://shopee.sg/item/123?utm_campaign=summer".to_string(),
            created_at: Utc::now(),
        };

        let active = link_to_active_model(&link);
        use sea_orm::ActiveValue;
        if let ActiveValue::Set(code) = active.short_code {
            assert_eq!(code, "Ab3xYz");
        } else {
            panic!("short_code must be set");
        }
    }
}
