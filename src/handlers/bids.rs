use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{self, CacheData};
use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::error::ApiError;
use crate::models::bids::{self, BidStatus, CreateBid, UpdateBid, visible_bids};
use crate::models::gigs::{self, GigStatus};
use crate::notify::protocol::Event;
use crate::notify::server::Notifier;
use crate::services::hire;

/// POST /api/bids — place a bid on an open gig.
///
/// One bid per freelancer per gig; bids on an assigned gig are refused.
pub async fn create_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Arc<Notifier>>,
    body: web::Json<CreateBid>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let gig = gig_db::get_gig_by_id(db.get_ref(), input.gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {} not found", input.gig_id)))?;

    ensure_open_for_bidding(&gig)?;

    if bid_db::bid_exists_for_gig_and_freelancer(db.get_ref(), gig.id, user.0.id).await? {
        return Err(ApiError::Conflict(
            "You have already placed a bid on this gig".to_string(),
        ));
    }

    let bid = bid_db::insert_bid(db.get_ref(), input, user.0.id).await?;

    // Best-effort: tell the gig's watchers and its owner about the new bid.
    let event = Event::BidPlaced {
        gig_id: bid.gig_id,
        bid_id: bid.id,
        message: "A new bid was placed on this gig".to_string(),
    };
    notifier.publish(bid.gig_id, event.clone()).await;
    notifier.publish(gig.owner_id, event).await;

    Ok(HttpResponse::Created().json(bid))
}

/// GET /api/bids/gig/{gig_id} — list a gig's bids, scoped to the caller.
///
/// The gig owner sees every bid; anyone else sees only their own. A caller
/// with no bid on the gig gets an empty list, not a 403.
pub async fn get_bids_for_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let gig_id = path.into_inner();

    let gig = gig_db::get_gig_by_id(db.get_ref(), gig_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Gig {gig_id} not found")))?;

    let all_bids = bid_db::get_bids_by_gig_id(db.get_ref(), gig_id).await?;
    let visible = visible_bids(all_bids, user.0.id, gig.owner_id);

    Ok(HttpResponse::Ok().json(visible))
}

/// PATCH /api/bids/{id} — a freelancer edits their own pending bid.
pub async fn update_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBid>,
) -> Result<HttpResponse, ApiError> {
    let bid_id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let bid = fetch_own_bid(db.get_ref(), bid_id, user.0.id).await?;
    ensure_pending(&bid, "updated")?;

    let updated = bid_db::update_bid(db.get_ref(), bid, input).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/bids/{id} — a freelancer withdraws their own pending bid.
pub async fn delete_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let bid_id = path.into_inner();

    let bid = fetch_own_bid(db.get_ref(), bid_id, user.0.id).await?;
    ensure_pending(&bid, "withdrawn")?;

    bid_db::delete_bid(db.get_ref(), bid.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Bid {bid_id} withdrawn"),
    })))
}

/// PATCH /api/bids/{id}/hire — the gig owner hires this bid.
///
/// Runs the atomic hire transition; see `services::hire`.
pub async fn hire_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Arc<Notifier>>,
    cache: web::Data<CacheData>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let bid_id = path.into_inner();

    let outcome = hire::hire(db.get_ref(), notifier.get_ref(), bid_id, user.0.id).await?;

    // The gig just left the open listing.
    if let Err(e) = cache.delete_pattern(cache::keys::gig_list_pattern()).await {
        tracing::warn!("gig list cache invalidation failed: {e}");
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "gig_id": outcome.gig_id,
        "bid_id": outcome.bid_id,
    })))
}

/// Load a bid and verify the caller authored it.
async fn fetch_own_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
    caller_id: Uuid,
) -> Result<bids::Model, ApiError> {
    let bid = bid_db::get_bid_by_id(db, bid_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bid {bid_id} not found")))?;

    ensure_bid_owner(&bid, caller_id)?;

    Ok(bid)
}

/// Bids can only be placed while the gig is open.
fn ensure_open_for_bidding(gig: &gigs::Model) -> Result<(), ApiError> {
    if gig.status != GigStatus::Open {
        return Err(ApiError::Conflict(format!(
            "Gig {} is no longer open for bidding",
            gig.id
        )));
    }
    Ok(())
}

/// Only the freelancer who authored a bid may change or withdraw it.
fn ensure_bid_owner(bid: &bids::Model, caller_id: Uuid) -> Result<(), ApiError> {
    if bid.freelancer_id != caller_id {
        return Err(ApiError::Forbidden(
            "You can only modify your own bids".to_string(),
        ));
    }
    Ok(())
}

/// A bid that has been hired or rejected is part of the hire record and can
/// no longer be changed.
fn ensure_pending(bid: &bids::Model, action: &str) -> Result<(), ApiError> {
    if bid.status != BidStatus::Pending {
        return Err(ApiError::Conflict(format!(
            "Bid {} is no longer pending and cannot be {action}",
            bid.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gig(status: GigStatus) -> gigs::Model {
        gigs::Model {
            id: Uuid::new_v4(),
            title: "API integration".to_string(),
            description: "Wire up a third-party payments API".to_string(),
            budget: 400.0,
            owner_id: Uuid::new_v4(),
            status,
            created_at: chrono::Utc::now(),
        }
    }

    fn bid(freelancer_id: Uuid, status: BidStatus) -> bids::Model {
        bids::Model {
            id: Uuid::new_v4(),
            gig_id: Uuid::new_v4(),
            freelancer_id,
            price: 350.0,
            message: "Done this stack before".to_string(),
            status,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn bidding_allowed_on_open_gig() {
        assert!(ensure_open_for_bidding(&gig(GigStatus::Open)).is_ok());
    }

    #[test]
    fn bidding_on_assigned_gig_is_a_conflict() {
        let result = ensure_open_for_bidding(&gig(GigStatus::Assigned));
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[test]
    fn author_may_touch_their_bid() {
        let freelancer = Uuid::new_v4();
        assert!(ensure_bid_owner(&bid(freelancer, BidStatus::Pending), freelancer).is_ok());
    }

    #[test]
    fn non_author_is_forbidden() {
        let b = bid(Uuid::new_v4(), BidStatus::Pending);
        let result = ensure_bid_owner(&b, Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn pending_bid_is_mutable() {
        let b = bid(Uuid::new_v4(), BidStatus::Pending);
        assert!(ensure_pending(&b, "updated").is_ok());
    }

    #[test]
    fn hired_or_rejected_bid_is_frozen() {
        for status in [BidStatus::Hired, BidStatus::Rejected] {
            let b = bid(Uuid::new_v4(), status);
            assert!(matches!(
                ensure_pending(&b, "withdrawn"),
                Err(ApiError::Conflict(_))
            ));
        }
    }
}
