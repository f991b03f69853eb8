use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Bid status stored as a lowercase string in the database.
///
/// `Pending` is the only mutable state. The hire coordinator moves exactly
/// one bid per gig to `Hired` and every sibling to `Rejected`; both are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum BidStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "hired")]
    Hired,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `bids` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub gig_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: BidStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::gigs::Entity",
        from = "Column::GigId",
        to = "super::gigs::Column::Id"
    )]
    Gig,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::gigs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Gig.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Narrow a gig's bids to what the caller is allowed to see: the gig owner
/// sees every bid, anyone else sees only the bid(s) they authored.
pub fn visible_bids(bids: Vec<Model>, caller_id: Uuid, owner_id: Uuid) -> Vec<Model> {
    if caller_id == owner_id {
        return bids;
    }
    bids.into_iter()
        .filter(|b| b.freelancer_id == caller_id)
        .collect()
}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBid {
    pub gig_id: Uuid,
    pub price: f64,
    pub message: String,
}

impl CreateBid {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.price <= 0.0 {
            return Err(ApiError::Validation(
                "price must be a positive amount".to_string(),
            ));
        }
        if self.message.trim().is_empty() {
            return Err(ApiError::Validation("message is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBid {
    pub price: Option<f64>,
    pub message: Option<String>,
}

impl UpdateBid {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(price) = self.price
            && price <= 0.0
        {
            return Err(ApiError::Validation(
                "price must be a positive amount".to_string(),
            ));
        }
        if let Some(message) = &self.message
            && message.trim().is_empty()
        {
            return Err(ApiError::Validation("message cannot be blank".to_string()));
        }
        Ok(())
    }
}
