pub mod auth;
pub mod bids;
pub mod gigs;

use actix_web::web;

use crate::notify::session;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Gig routes (listing is public, the rest require a valid token) ──
    cfg.service(
        web::scope("/gigs")
            .route("", web::get().to(gigs::get_gigs))
            .route("", web::post().to(gigs::create_gig))
            .route("/{id}", web::get().to(gigs::get_gig)),
    );

    // ── Bid routes (all protected) ──
    cfg.service(
        web::scope("/bids")
            .route("", web::post().to(bids::create_bid))
            .route("/gig/{gig_id}", web::get().to(bids::get_bids_for_gig))
            .route("/{id}", web::patch().to(bids::update_bid))
            .route("/{id}", web::delete().to(bids::delete_bid))
            .route("/{id}/hire", web::patch().to(bids::hire_bid)),
    );

    // ── Event subscription (token passed as query param) ──
    cfg.route("/ws", web::get().to(session::ws_connect));
}
