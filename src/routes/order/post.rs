use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{db_interaction::{place_order, PlaceOrderError}, domain::order_request::OrderRequest, utils::{error_fmt_chain, get_pooled_connection, json_error_response, DbPool, PoolGetError}};

#[derive(Error)]
pub enum PostOrderError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError),
    #[error(transparent)]
    PlaceOrderError(#[from] PlaceOrderError)
}

impl Debug for PostOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostOrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostOrderError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PostOrderError::PoolError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PostOrderError::PlaceOrderError(e) => match e {
                PlaceOrderError::CustomerNotFound(_)
                | PlaceOrderError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                PlaceOrderError::InsufficientStock { .. }
                | PlaceOrderError::InvalidDeliveryDate(_)
                | PlaceOrderError::InvalidLine(_)
                | PlaceOrderError::TotalOverflow(_) => StatusCode::BAD_REQUEST,
                PlaceOrderError::ThreadpoolError(_)
                | PlaceOrderError::RunQueryError(_) => StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        json_error_response(self.status_code(), self)
    }
}

#[tracing::instrument(
    "Posting order",
    skip(pool)
)]
pub async fn post_order(
    pool: web::Data<DbPool>,
    json: web::Json<OrderRequest>
) -> Result<HttpResponse, PostOrderError> {
    let draft = json.0.parse()
                    .map_err(PostOrderError::ValidationError)?;

    let conn = get_pooled_connection(&pool).await?;

    let order = place_order(conn, draft)
        .await
        .inspect_err(|e| {
            if !matches!(e, PlaceOrderError::ThreadpoolError(_) | PlaceOrderError::RunQueryError(_)) {
                tracing::warn!(error = %e, "Order rejected, transaction rolled back");
            }
        })?;

    Ok(HttpResponse::Created().json(order))
}
