use sea_orm::*;

use crate::models::users::{self, CreateUserFromClaims};

/// Look up a user by the stable id from their token, creating the row on
/// first sight (called by the auth extractor).
pub async fn find_or_create_from_claims(
    db: &DatabaseConnection,
    input: CreateUserFromClaims,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        display_name: Set(input.display_name),
        created_at: Set(chrono::Utc::now()),
    };

    new_user.insert(db).await
}
