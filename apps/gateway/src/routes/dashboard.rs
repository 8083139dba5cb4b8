use actix_web::{web, HttpResponse};

use crate::dashboard;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::extractors::current_user::CurrentUser;
use crate::state::app_state::AppState;

/// GET /api/seller/dashboard
pub async fn seller_dashboard(
    state: web::Data<AppState>,
    user: CurrentUser,
    token: AuthToken,
) -> Result<HttpResponse, AppError> {
    let summary = dashboard::assemble(&state, user.id, &token.authorization_value()).await?;
    Ok(HttpResponse::Ok().json(summary))
}
