use actix_web::{HttpResponse, Responder};

use crate::auth::middleware::AuthenticatedUser;

/// GET /api/auth/me — return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(user.0)
}
