//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: local accounts mapped to identity-provider subjects
//! - `items`: listed items with their computed score
//! - `boosted_items`: time-limited promotion, one row per item at most
//! - `swap_proposals`: item-for-item offers and their status
//! - `swap_meetings`: in-person meeting, one per proposal at most
//! - `circles`, `circle_members`, `circle_items`: sharing groups
//! - `notifications`: per-user inbox

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    ExternalId,
    Name,
    Email,
    Image,
    CreatedAt,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    OwnerId,
    Title,
    TitleSearch,
    Description,
    Image,
    CurrentPrice,
    OriginalPrice,
    Currency,
    Company,
    Category,
    Condition,
    HasBill,
    ItemAge,
    Score,
    IsSwapped,
    CreatedAt,
}

#[derive(Iden)]
enum BoostedItems {
    Table,
    ItemId,
    UserId,
    BoostedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum SwapProposals {
    Table,
    Id,
    ProposerId,
    ReceiverId,
    ProposedItemId,
    ReceiverItemId,
    Message,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum SwapMeetings {
    Table,
    Id,
    SwapId,
    Location,
    Date,
    Time,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Circles {
    Table,
    Id,
    Name,
    Description,
    Image,
    IsPrivate,
    CreatedBy,
    CreatedAt,
}

#[derive(Iden)]
enum CircleMembers {
    Table,
    CircleId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
enum CircleItems {
    Table,
    CircleId,
    ItemId,
    SharedBy,
    IsApproved,
    SharedAt,
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    UserId,
    Title,
    Body,
    Kind,
    Category,
    Link,
    IsRead,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::ExternalId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Image).string())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Items::OwnerId).string().not_null())
                    .col(ColumnDef::new(Items::Title).string().not_null())
                    .col(ColumnDef::new(Items::TitleSearch).string().not_null())
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::Image).string())
                    .col(ColumnDef::new(Items::CurrentPrice).double().not_null())
                    .col(ColumnDef::new(Items::OriginalPrice).double().not_null())
                    .col(
                        ColumnDef::new(Items::Currency)
                            .string()
                            .not_null()
                            .default("INR"),
                    )
                    .col(ColumnDef::new(Items::Company).string().not_null())
                    .col(ColumnDef::new(Items::Category).string().not_null())
                    .col(ColumnDef::new(Items::Condition).string().not_null())
                    .col(ColumnDef::new(Items::HasBill).boolean().not_null())
                    .col(ColumnDef::new(Items::ItemAge).integer().not_null())
                    .col(ColumnDef::new(Items::Score).double().not_null())
                    .col(
                        ColumnDef::new(Items::IsSwapped)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-items-owner_id")
                            .from(Items::Table, Items::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-items-owner_id")
                    .table(Items::Table)
                    .col(Items::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-items-is_swapped-created_at")
                    .table(Items::Table)
                    .col(Items::IsSwapped)
                    .col(Items::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Boosted items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BoostedItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoostedItems::ItemId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BoostedItems::UserId).string().not_null())
                    .col(
                        ColumnDef::new(BoostedItems::BoostedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BoostedItems::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-boosted_items-item_id")
                            .from(BoostedItems::Table, BoostedItems::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-boosted_items-user_id")
                            .from(BoostedItems::Table, BoostedItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-boosted_items-expires_at")
                    .table(BoostedItems::Table)
                    .col(BoostedItems::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Swap proposals
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SwapProposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SwapProposals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SwapProposals::ProposerId).string().not_null())
                    .col(ColumnDef::new(SwapProposals::ReceiverId).string().not_null())
                    .col(
                        ColumnDef::new(SwapProposals::ProposedItemId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapProposals::ReceiverItemId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SwapProposals::Message).text())
                    .col(
                        ColumnDef::new(SwapProposals::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(SwapProposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapProposals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-swap_proposals-proposer_id")
                            .from(SwapProposals::Table, SwapProposals::ProposerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-swap_proposals-receiver_id")
                            .from(SwapProposals::Table, SwapProposals::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-swap_proposals-proposed_item_id")
                            .from(SwapProposals::Table, SwapProposals::ProposedItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-swap_proposals-receiver_item_id")
                            .from(SwapProposals::Table, SwapProposals::ReceiverItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-swap_proposals-proposer_id")
                    .table(SwapProposals::Table)
                    .col(SwapProposals::ProposerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-swap_proposals-receiver_id")
                    .table(SwapProposals::Table)
                    .col(SwapProposals::ReceiverId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Swap meetings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SwapMeetings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SwapMeetings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SwapMeetings::SwapId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SwapMeetings::Location).string().not_null())
                    .col(ColumnDef::new(SwapMeetings::Date).string().not_null())
                    .col(ColumnDef::new(SwapMeetings::Time).string().not_null())
                    .col(ColumnDef::new(SwapMeetings::Notes).text())
                    .col(ColumnDef::new(SwapMeetings::Status).string().not_null())
                    .col(
                        ColumnDef::new(SwapMeetings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SwapMeetings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-swap_meetings-swap_id")
                            .from(SwapMeetings::Table, SwapMeetings::SwapId)
                            .to(SwapProposals::Table, SwapProposals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Circles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Circles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Circles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Circles::Name).string().not_null())
                    .col(ColumnDef::new(Circles::Description).text().not_null())
                    .col(ColumnDef::new(Circles::Image).string())
                    .col(
                        ColumnDef::new(Circles::IsPrivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Circles::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Circles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circles-created_by")
                            .from(Circles::Table, Circles::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Circle members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CircleMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CircleMembers::CircleId).string().not_null())
                    .col(ColumnDef::new(CircleMembers::UserId).string().not_null())
                    .col(ColumnDef::new(CircleMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(CircleMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CircleMembers::CircleId)
                            .col(CircleMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circle_members-circle_id")
                            .from(CircleMembers::Table, CircleMembers::CircleId)
                            .to(Circles::Table, Circles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circle_members-user_id")
                            .from(CircleMembers::Table, CircleMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-circle_members-user_id")
                    .table(CircleMembers::Table)
                    .col(CircleMembers::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Circle items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CircleItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CircleItems::CircleId).string().not_null())
                    .col(ColumnDef::new(CircleItems::ItemId).string().not_null())
                    .col(ColumnDef::new(CircleItems::SharedBy).string().not_null())
                    .col(
                        ColumnDef::new(CircleItems::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CircleItems::SharedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(CircleItems::CircleId)
                            .col(CircleItems::ItemId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circle_items-circle_id")
                            .from(CircleItems::Table, CircleItems::CircleId)
                            .to(Circles::Table, Circles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circle_items-item_id")
                            .from(CircleItems::Table, CircleItems::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-circle_items-shared_by")
                            .from(CircleItems::Table, CircleItems::SharedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Notifications
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Body).text().not_null())
                    .col(ColumnDef::new(Notifications::Kind).string().not_null())
                    .col(ColumnDef::new(Notifications::Category).string().not_null())
                    .col(ColumnDef::new(Notifications::Link).string())
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-notifications-user_id")
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-notifications-user_id-created_at")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CircleItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CircleMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Circles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SwapMeetings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SwapProposals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BoostedItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
