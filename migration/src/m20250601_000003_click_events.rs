//! click_events 表迁移
//!
//! 只追加的点击台账：每次成功解析的跳转写入一行，没有更新或删除操作。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClickEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClickEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ClickEvents::LinkId).string().not_null())
                    .col(
                        ColumnDef::new(ClickEvents::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClickEvents::Marketplace)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 时间范围查询索引（聚合器）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_occurred_at")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::OccurredAt)
                    .to_owned(),
            )
            .await?;

        // 复合索引（单链接时间序列查询）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_click_events_link_time")
                    .table(ClickEvents::Table)
                    .col(ClickEvents::LinkId)
                    .col(ClickEvents::OccurredAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_click_events_link_time").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_click_events_occurred_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ClickEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ClickEvents {
    #[sea_orm(iden = "click_events")]
    Table,
    Id,
    LinkId,
    OccurredAt,
    Marketplace,
}
