use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{db_interaction::get_orders_with_products, utils::{error_fmt_chain, get_pooled_connection, json_error_response, DbPool, PoolGetError}};

#[derive(Error)]
pub enum GetOrdersError {
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError),
    #[error("Failed to get orders")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for GetOrdersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for GetOrdersError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        json_error_response(self.status_code(), self)
    }
}

#[tracing::instrument(
    "Getting list of orders",
    skip(pool)
)]
pub async fn get_order_list(
    pool: web::Data<DbPool>
) -> Result<HttpResponse, GetOrdersError> {
    let conn = get_pooled_connection(&pool).await?;
    let orders = get_orders_with_products(conn).await?;

    Ok(HttpResponse::Ok().json(orders))
}
