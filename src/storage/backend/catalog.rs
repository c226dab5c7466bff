//! 商品与报价的存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{
    model_to_offer, model_to_product, offer_to_active_model, product_to_active_model,
};
use super::retry;
use crate::errors::{AfflinkError, Result};
use crate::storage::models::{Offer, Product};

use migration::entities::{campaign_link, offer, product};

impl SeaOrmStorage {
    pub async fn insert_product(&self, p: Product) -> Result<()> {
        let db = &self.db;

        retry::with_retry(
            &format!("insert_product({})", p.id),
            self.retry_config,
            || async { product_to_active_model(&p).insert(db).await },
        )
        .await
        .map_err(|e| AfflinkError::storage(format!("插入商品失败: {}", e)))?;

        info!("Product stored: {}", p.id);
        Ok(())
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let model = product::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询商品失败: {}", e)))?;

        model.map(model_to_product).transpose()
    }

    /// 按创建时间倒序列出全部商品
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询商品列表失败: {}", e)))?;

        models.into_iter().map(model_to_product).collect()
    }

    /// 删除商品以及其下的报价和推广链接（单事务）
    ///
    /// 点击事件保留不动：链接删除后 resolve 自然返回 NotFound。
    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AfflinkError::storage(format!("开始事务失败: {}", e)))?;

        campaign_link::Entity::delete_many()
            .filter(campaign_link::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AfflinkError::storage(format!("级联删除链接失败: {}", e)))?;

        offer::Entity::delete_many()
            .filter(offer::Column::ProductId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AfflinkError::storage(format!("级联删除报价失败: {}", e)))?;

        let result = product::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AfflinkError::storage(format!("删除商品失败: {}", e)))?;

        if result.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| AfflinkError::storage(format!("回滚事务失败: {}", e)))?;
            return Err(AfflinkError::not_found(format!("商品不存在: {}", id)));
        }

        txn.commit()
            .await
            .map_err(|e| AfflinkError::storage(format!("提交事务失败: {}", e)))?;

        info!("Product deleted with offers and links: {}", id);
        Ok(())
    }

    pub async fn upsert_offer(&self, o: Offer) -> Result<()> {
        use sea_orm::sea_query::OnConflict;

        let db = &self.db;

        retry::with_retry(
            &format!("upsert_offer({})", o.id),
            self.retry_config,
            || async {
                offer::Entity::insert(offer_to_active_model(&o))
                    .on_conflict(
                        OnConflict::column(offer::Column::Id)
                            .update_columns([
                                offer::Column::StoreName,
                                offer::Column::Price,
                                offer::Column::LastCheckedAt,
                            ])
                            .to_owned(),
                    )
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| AfflinkError::storage(format!("写入报价失败: {}", e)))?;

        Ok(())
    }

    /// 商品最新一条报价（按 last_checked_at 取最新，无报价返回 None）
    pub async fn latest_offer(&self, product_id: &str) -> Result<Option<Offer>> {
        let model = offer::Entity::find()
            .filter(offer::Column::ProductId.eq(product_id))
            .order_by_desc(offer::Column::LastCheckedAt)
            .one(&self.db)
            .await
            .map_err(|e| AfflinkError::storage(format!("查询报价失败: {}", e)))?;

        model.map(model_to_offer).transpose()
    }
}
