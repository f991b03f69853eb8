use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::bids::{self, BidStatus, CreateBid, UpdateBid};

/// Insert a new bid with status `Pending`.
pub async fn insert_bid(
    db: &DatabaseConnection,
    input: CreateBid,
    freelancer_id: Uuid,
) -> Result<bids::Model, DbErr> {
    let new_bid = bids::ActiveModel {
        id: Set(Uuid::new_v4()),
        gig_id: Set(input.gig_id),
        freelancer_id: Set(freelancer_id),
        price: Set(input.price),
        message: Set(input.message),
        status: Set(BidStatus::Pending),
        created_at: Set(chrono::Utc::now()),
    };

    new_bid.insert(db).await
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch every bid on a gig, oldest first.
pub async fn get_bids_by_gig_id(
    db: &DatabaseConnection,
    gig_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .order_by_asc(bids::Column::CreatedAt)
        .all(db)
        .await
}

/// Whether a freelancer already has a bid on a gig (one bid per freelancer
/// per gig).
pub async fn bid_exists_for_gig_and_freelancer(
    db: &DatabaseConnection,
    gig_id: Uuid,
    freelancer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = bids::Entity::find()
        .filter(bids::Column::GigId.eq(gig_id))
        .filter(bids::Column::FreelancerId.eq(freelancer_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Apply a freelancer's edit to their pending bid. Only the provided fields
/// change; `freelancer_id` and `status` are untouched.
pub async fn update_bid(
    db: &DatabaseConnection,
    bid: bids::Model,
    input: UpdateBid,
) -> Result<bids::Model, DbErr> {
    let mut active: bids::ActiveModel = bid.into();

    if let Some(price) = input.price {
        active.price = Set(price);
    }
    if let Some(message) = input.message {
        active.message = Set(message);
    }

    active.update(db).await
}

/// Delete a bid by ID.
pub async fn delete_bid(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    bids::Entity::delete_by_id(id).exec(db).await
}

/// Bulk-reject every bid on a gig except the one being hired. Idempotent:
/// already-rejected bids stay rejected. Transaction-only.
pub async fn reject_all_except<C: ConnectionTrait>(
    db: &C,
    gig_id: Uuid,
    keep_bid_id: Uuid,
) -> Result<UpdateResult, DbErr> {
    bids::Entity::update_many()
        .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
        .filter(bids::Column::GigId.eq(gig_id))
        .filter(bids::Column::Id.ne(keep_bid_id))
        .exec(db)
        .await
}

/// Set a bid's status. Transaction-only; the hire coordinator verifies the
/// bid is still pending before promoting it to `Hired`.
pub async fn set_status<C: ConnectionTrait>(
    db: &C,
    bid: bids::Model,
    status: BidStatus,
) -> Result<bids::Model, DbErr> {
    let mut active: bids::ActiveModel = bid.into();
    active.status = Set(status);
    active.update(db).await
}
