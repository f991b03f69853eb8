///! Tests for the role-scoped bid listing: the gig owner sees every bid,
///! any other caller sees only the bid(s) they authored.
///!
///! Run with: `cargo test --test bid_visibility_test`
use chrono::Utc;
use uuid::Uuid;

use gigbid_backend::models::bids::{BidStatus, Model as Bid, visible_bids};

fn bid(gig_id: Uuid, freelancer_id: Uuid) -> Bid {
    Bid {
        id: Uuid::new_v4(),
        gig_id,
        freelancer_id,
        price: 100.0,
        message: "Happy to take this on".to_string(),
        status: BidStatus::Pending,
        created_at: Utc::now(),
    }
}

#[test]
fn owner_sees_all_bids() {
    let gig_id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let bids = vec![
        bid(gig_id, Uuid::new_v4()),
        bid(gig_id, Uuid::new_v4()),
        bid(gig_id, Uuid::new_v4()),
    ];

    let visible = visible_bids(bids, owner, owner);
    assert_eq!(visible.len(), 3);
}

#[test]
fn freelancer_sees_only_their_own_bid() {
    // Gig owned by C with bids from A and B: A's listing returns exactly
    // A's bid.
    let gig_id = Uuid::new_v4();
    let owner_c = Uuid::new_v4();
    let freelancer_a = Uuid::new_v4();
    let freelancer_b = Uuid::new_v4();

    let bid_a = bid(gig_id, freelancer_a);
    let bid_a_id = bid_a.id;
    let bids = vec![bid_a, bid(gig_id, freelancer_b)];

    let visible = visible_bids(bids, freelancer_a, owner_c);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, bid_a_id);
    assert_eq!(visible[0].freelancer_id, freelancer_a);
}

#[test]
fn outsider_sees_nothing() {
    let gig_id = Uuid::new_v4();
    let owner = Uuid::new_v4();
    let bids = vec![bid(gig_id, Uuid::new_v4()), bid(gig_id, Uuid::new_v4())];

    let visible = visible_bids(bids, Uuid::new_v4(), owner);
    assert!(visible.is_empty());
}

#[test]
fn empty_gig_yields_empty_list_for_everyone() {
    let owner = Uuid::new_v4();
    assert!(visible_bids(Vec::new(), owner, owner).is_empty());
    assert!(visible_bids(Vec::new(), Uuid::new_v4(), owner).is_empty());
}
