//! Sample content guarded by role, for checking issued tokens end to end.

use actix_web::HttpResponse;
use tracing::warn;

use crate::auth::AuthenticatedIdentity;
use crate::db::RoleName;
use crate::error::AuthError;
use crate::Result;

fn require_any_role(identity: &AuthenticatedIdentity, roles: &[RoleName]) -> Result<()> {
    let names: Vec<&str> = roles.iter().map(RoleName::as_str).collect();
    if identity.has_any_role(&names) {
        return Ok(());
    }

    warn!("{} lacks any of {:?}", identity.username, names);
    Err(AuthError::Forbidden.into())
}

pub async fn all_access() -> HttpResponse {
    HttpResponse::Ok().body("Public Content.")
}

pub async fn user_access(identity: AuthenticatedIdentity) -> Result<HttpResponse> {
    require_any_role(&identity, &RoleName::ALL)?;
    Ok(HttpResponse::Ok().body("User Content."))
}

pub async fn moderator_access(identity: AuthenticatedIdentity) -> Result<HttpResponse> {
    require_any_role(&identity, &[RoleName::Moderator])?;
    Ok(HttpResponse::Ok().body("Moderator Board."))
}

pub async fn admin_access(identity: AuthenticatedIdentity) -> Result<HttpResponse> {
    require_any_role(&identity, &[RoleName::Admin])?;
    Ok(HttpResponse::Ok().body("Admin Board."))
}
