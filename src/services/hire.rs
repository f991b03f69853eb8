use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::db::bids as bid_db;
use crate::db::gigs as gig_db;
use crate::error::ApiError;
use crate::models::bids::{self, BidStatus};
use crate::models::gigs::{self, GigStatus};
use crate::notify::protocol::Event;
use crate::notify::server::Notifier;

/// Result of a committed hire.
#[derive(Debug, Clone, Copy)]
pub struct HireOutcome {
    pub gig_id: Uuid,
    pub bid_id: Uuid,
    pub freelancer_id: Uuid,
}

/// Hire one bid: atomically reject its siblings, promote it to `Hired`, and
/// move the gig to `Assigned`. All three writes commit together or not at all.
///
/// The gig row is read under an exclusive lock, so of two concurrent hires on
/// the same gig the second waits, re-reads `Assigned`, and fails the guard —
/// it can never see the pre-commit state. Retried requests after a prior
/// success fail the same way.
///
/// Notification happens after the commit and is best-effort: a delivery
/// problem never rolls back a hire.
pub async fn hire(
    db: &DatabaseConnection,
    notifier: &Notifier,
    bid_id: Uuid,
    caller_id: Uuid,
) -> Result<HireOutcome, ApiError> {
    let outcome = db
        .transaction::<_, HireOutcome, ApiError>(move |txn| {
            Box::pin(async move {
                let bid = bid_db::get_bid_by_id(txn, bid_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("Bid {bid_id} not found")))?;

                let gig = gig_db::get_gig_by_id_locked(txn, bid.gig_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("Gig {} not found", bid.gig_id)))?;

                authorize_hire(&gig, caller_id)?;
                ensure_hireable(&bid)?;

                bid_db::reject_all_except(txn, gig.id, bid.id).await?;
                let bid = bid_db::set_status(txn, bid, BidStatus::Hired).await?;
                let gig = gig_db::mark_assigned(txn, gig).await?;

                Ok(HireOutcome {
                    gig_id: gig.id,
                    bid_id: bid.id,
                    freelancer_id: bid.freelancer_id,
                })
            })
        })
        .await
        .map_err(ApiError::from)?;

    publish_hired(notifier, outcome).await;

    Ok(outcome)
}

/// Owner-only, and only while the gig is still open. The assigned check is
/// the idempotency guard against double-hire.
fn authorize_hire(gig: &gigs::Model, caller_id: Uuid) -> Result<(), ApiError> {
    if gig.owner_id != caller_id {
        return Err(ApiError::Forbidden(
            "Only the gig owner can hire a bid".to_string(),
        ));
    }
    if gig.status == GigStatus::Assigned {
        return Err(ApiError::Conflict(format!(
            "Gig {} is already assigned",
            gig.id
        )));
    }
    Ok(())
}

/// A bid that already left `Pending` cannot be hired.
fn ensure_hireable(bid: &bids::Model) -> Result<(), ApiError> {
    if bid.status != BidStatus::Pending {
        return Err(ApiError::Conflict(format!(
            "Bid {} is no longer pending",
            bid.id
        )));
    }
    Ok(())
}

/// Fan the hire event out to the gig's channel and the hired freelancer's
/// own channel. Fire-and-forget.
async fn publish_hired(notifier: &Notifier, outcome: HireOutcome) {
    let event = Event::BidHired {
        gig_id: outcome.gig_id,
        bid_id: outcome.bid_id,
        message: "A bid has been hired for this gig".to_string(),
    };
    notifier.publish(outcome.gig_id, event.clone()).await;
    notifier.publish(outcome.freelancer_id, event).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gig(owner_id: Uuid, status: GigStatus) -> gigs::Model {
        gigs::Model {
            id: Uuid::new_v4(),
            title: "Logo design".to_string(),
            description: "Vector logo with two revisions".to_string(),
            budget: 150.0,
            owner_id,
            status,
            created_at: chrono::Utc::now(),
        }
    }

    fn bid(gig_id: Uuid, status: BidStatus) -> bids::Model {
        bids::Model {
            id: Uuid::new_v4(),
            gig_id,
            freelancer_id: Uuid::new_v4(),
            price: 120.0,
            message: "Portfolio attached".to_string(),
            status,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn owner_can_hire_open_gig() {
        let owner = Uuid::new_v4();
        let g = gig(owner, GigStatus::Open);
        assert!(authorize_hire(&g, owner).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let g = gig(Uuid::new_v4(), GigStatus::Open);
        let result = authorize_hire(&g, Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn assigned_gig_is_a_conflict() {
        let owner = Uuid::new_v4();
        let g = gig(owner, GigStatus::Assigned);
        let result = authorize_hire(&g, owner);
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[test]
    fn ownership_is_checked_before_assignment() {
        // A non-owner probing an assigned gig gets 403, not 409.
        let g = gig(Uuid::new_v4(), GigStatus::Assigned);
        let result = authorize_hire(&g, Uuid::new_v4());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn only_pending_bids_are_hireable() {
        let gig_id = Uuid::new_v4();
        assert!(ensure_hireable(&bid(gig_id, BidStatus::Pending)).is_ok());
        assert!(matches!(
            ensure_hireable(&bid(gig_id, BidStatus::Rejected)),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            ensure_hireable(&bid(gig_id, BidStatus::Hired)),
            Err(ApiError::Conflict(_))
        ));
    }
}
