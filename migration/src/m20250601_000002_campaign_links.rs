//! campaign_links 表迁移
//!
//! 短码唯一性和 (campaign, product) 配对唯一性都由数据库唯一索引保证，
//! 并发创建时不存在 check-then-insert 竞态。外键保证链接不会在父级
//! 级联删除后存活：级联事务先删链接再删父行，插入撞上外键则判定
//! 父级已不存在。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CampaignLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CampaignLinks::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CampaignLinks::CampaignId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignLinks::ProductId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CampaignLinks::ShortCode)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CampaignLinks::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(CampaignLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_links_campaign")
                            .from(CampaignLinks::Table, CampaignLinks::CampaignId)
                            .to(Campaigns::Table, Campaigns::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_links_product")
                            .from(CampaignLinks::Table, CampaignLinks::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 短码全局唯一索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_campaign_links_short_code")
                    .table(CampaignLinks::Table)
                    .col(CampaignLinks::ShortCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 一个 campaign 对同一 product 最多一条链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_campaign_links_pair")
                    .table(CampaignLinks::Table)
                    .col(CampaignLinks::CampaignId)
                    .col(CampaignLinks::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 级联删除查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_links_product")
                    .table(CampaignLinks::Table)
                    .col(CampaignLinks::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_campaign_links_product").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("uq_campaign_links_pair").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_campaign_links_short_code")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CampaignLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Campaigns {
    #[sea_orm(iden = "campaigns")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Products {
    #[sea_orm(iden = "products")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CampaignLinks {
    #[sea_orm(iden = "campaign_links")]
    Table,
    Id,
    CampaignId,
    ProductId,
    ShortCode,
    TargetUrl,
    CreatedAt,
}
