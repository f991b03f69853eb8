use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Gig status stored as a lowercase string in the database.
///
/// The only legal transition is `Open` → `Assigned`, performed by the hire
/// coordinator inside its transaction. It never reverses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum GigStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "assigned")]
    Assigned,
}

/// SeaORM entity for the `gigs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gigs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub budget: f64,
    pub owner_id: Uuid,
    pub status: GigStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGig {
    pub title: String,
    pub description: String,
    pub budget: f64,
}

impl CreateGig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::Validation("description is required".to_string()));
        }
        if self.budget <= 0.0 {
            return Err(ApiError::Validation(
                "budget must be a positive amount".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GigListQuery {
    pub search: Option<String>,
}

impl GigListQuery {
    /// Normalized search text: trimmed, empty meaning "match all".
    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("").trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CreateGig {
        CreateGig {
            title: "Build a landing page".to_string(),
            description: "Single-page site with contact form".to_string(),
            budget: 250.0,
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_blank_title() {
        let mut gig = valid();
        gig.title = "   ".to_string();
        assert!(matches!(gig.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn rejects_blank_description() {
        let mut gig = valid();
        gig.description = String::new();
        assert!(matches!(gig.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_budget() {
        let mut gig = valid();
        gig.budget = 0.0;
        assert!(matches!(gig.validate(), Err(ApiError::Validation(_))));
        gig.budget = -10.0;
        assert!(matches!(gig.validate(), Err(ApiError::Validation(_))));
    }
}
