use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheConfig, CacheData};
use crate::db::gigs as gig_db;
use crate::error::ApiError;
use crate::models::gigs::{self, CreateGig, GigListQuery};

/// GET /api/gigs?search= — list open gigs, title matched case-insensitively.
///
/// Public: browsing the marketplace needs no account. Served from the Redis
/// cache when warm; cache problems degrade to a plain database read.
pub async fn get_gigs(
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    cache_config: web::Data<CacheConfig>,
    query: web::Query<GigListQuery>,
) -> Result<HttpResponse, ApiError> {
    let search = query.search();
    let key = cache::keys::gig_list(search);

    match cache.get::<Vec<gigs::Model>>(&key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("gig list cache read failed: {e}"),
    }

    let result = gig_db::list_open_gigs(db.get_ref(), search).await?;

    if let Err(e) = cache.set(&key, &result, cache_config.gig_list_ttl).await {
        tracing::warn!("gig list cache write failed: {e}");
    }

    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/gigs/{id} — get a single gig (requires authentication).
pub async fn get_gig(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let gig = gig_db::get_gig_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {id} not found")))?;
    Ok(HttpResponse::Ok().json(gig))
}

/// POST /api/gigs — create a new gig owned by the caller.
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<CacheData>,
    body: web::Json<CreateGig>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let gig = gig_db::insert_gig(db.get_ref(), input, user.0.id).await?;

    // The new gig belongs in every open listing.
    if let Err(e) = cache.delete_pattern(cache::keys::gig_list_pattern()).await {
        tracing::warn!("gig list cache invalidation failed: {e}");
    }

    Ok(HttpResponse::Created().json(gig))
}
