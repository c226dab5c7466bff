use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 products 表
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Title).string().not_null())
                    .col(ColumnDef::new(Products::ImageUrl).text().not_null())
                    .col(ColumnDef::new(Products::SourceUrl).text().not_null())
                    .col(ColumnDef::new(Products::Marketplace).string().not_null())
                    .col(
                        ColumnDef::new(Products::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_created_at")
                    .table(Products::Table)
                    .col(Products::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 offers 表（价格快照，保留历史）
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Offers::ProductId).string().not_null())
                    .col(ColumnDef::new(Offers::Marketplace).string().not_null())
                    .col(ColumnDef::new(Offers::StoreName).string().not_null())
                    .col(
                        ColumnDef::new(Offers::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Offers::LastCheckedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // product_id + last_checked_at 复合索引（最新报价查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_offers_product_checked")
                    .table(Offers::Table)
                    .col(Offers::ProductId)
                    .col(Offers::LastCheckedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 campaigns 表
        manager
            .create_table(
                Table::create()
                    .table(Campaigns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaigns::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaigns::OwnerUserId).string().not_null())
                    .col(ColumnDef::new(Campaigns::Name).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Campaigns::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Campaigns::UtmCampaign).string().not_null())
                    .col(
                        ColumnDef::new(Campaigns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // owner + created_at 复合索引（按属主倒序列出）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaigns_owner_created")
                    .table(Campaigns::Table)
                    .col(Campaigns::OwnerUserId)
                    .col(Campaigns::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 有效期窗口索引（list_active 查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaigns_window")
                    .table(Campaigns::Table)
                    .col(Campaigns::StartAt)
                    .col(Campaigns::EndAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除索引
        manager
            .drop_index(Index::drop().name("idx_campaigns_window").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_campaigns_owner_created").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_offers_product_checked").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_products_created_at").to_owned())
            .await?;

        // 删除表
        manager
            .drop_table(Table::drop().table(Campaigns::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    #[sea_orm(iden = "products")]
    Table,
    Id,
    Title,
    ImageUrl,
    SourceUrl,
    Marketplace,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Offers {
    #[sea_orm(iden = "offers")]
    Table,
    Id,
    ProductId,
    Marketplace,
    StoreName,
    Price,
    LastCheckedAt,
}

#[derive(DeriveIden)]
enum Campaigns {
    #[sea_orm(iden = "campaigns")]
    Table,
    Id,
    OwnerUserId,
    Name,
    StartAt,
    EndAt,
    UtmCampaign,
    CreatedAt,
}
