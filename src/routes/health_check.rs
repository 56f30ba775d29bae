use actix_web::{http::StatusCode, web, HttpResponse};

use crate::utils::{get_pooled_connection, json_error_response, DbPool};

// Reports healthy only while a database connection can be checked out
#[tracing::instrument(
    "Checking if api is online",
    skip(pool)
)]
pub async fn health_check(
    pool: web::Data<DbPool>
) -> HttpResponse{
    match get_pooled_connection(&pool).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => {
            tracing::error!(error = ?e, "Database is unreachable");
            json_error_response(StatusCode::SERVICE_UNAVAILABLE, &e)
        }
    }
}
