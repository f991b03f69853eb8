use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::gigs::{self, CreateGig, GigStatus};

/// Insert a new gig with status `Open`.
pub async fn insert_gig(
    db: &DatabaseConnection,
    input: CreateGig,
    owner_id: Uuid,
) -> Result<gigs::Model, DbErr> {
    let new_gig = gigs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        budget: Set(input.budget),
        owner_id: Set(owner_id),
        status: Set(GigStatus::Open),
        created_at: Set(chrono::Utc::now()),
    };

    new_gig.insert(db).await
}

/// Fetch open gigs whose title contains `search` (case-insensitive).
/// An empty search matches everything. Ordered by creation time so paging
/// clients see a stable sequence.
pub async fn list_open_gigs(
    db: &DatabaseConnection,
    search: &str,
) -> Result<Vec<gigs::Model>, DbErr> {
    let mut query = gigs::Entity::find().filter(gigs::Column::Status.eq(GigStatus::Open));

    if !search.is_empty() {
        query = query.filter(Expr::col(gigs::Column::Title).ilike(format!("%{search}%")));
    }

    query.order_by_asc(gigs::Column::CreatedAt).all(db).await
}

/// Fetch a single gig by ID.
pub async fn get_gig_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).one(db).await
}

/// Fetch a gig by ID under an exclusive row lock (`SELECT ... FOR UPDATE`).
///
/// Transaction-only. Competing hire transactions queue on this lock, so the
/// loser re-reads the gig after the winner's commit and sees `Assigned`.
pub async fn get_gig_by_id_locked<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<gigs::Model>, DbErr> {
    gigs::Entity::find_by_id(id).lock_exclusive().one(db).await
}

/// Move a gig to `Assigned`. Called only by the hire coordinator inside its
/// transaction, after the open-status guard has passed.
pub async fn mark_assigned<C: ConnectionTrait>(
    db: &C,
    gig: gigs::Model,
) -> Result<gigs::Model, DbErr> {
    let mut active: gigs::ActiveModel = gig.into();
    active.status = Set(GigStatus::Assigned);
    active.update(db).await
}
