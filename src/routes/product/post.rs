use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{db_interaction::{insert_product, ProductInsertError}, domain::new_product::ProductRequest, utils::{error_fmt_chain, get_pooled_connection, json_error_response, DbPool, PoolGetError}};

#[derive(Error)]
pub enum PostProductError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError),
    #[error("Failed to insert product")]
    InsertProductError(#[from] ProductInsertError)
}

impl Debug for PostProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostProductError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostProductError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        json_error_response(self.status_code(), self)
    }
}

#[tracing::instrument(
    "Adding a product to the catalog",
    skip(pool)
)]
pub async fn post_product(
    pool: web::Data<DbPool>,
    json: web::Json<ProductRequest>
) -> Result<HttpResponse, PostProductError>{
    let new_product = json.0.parse()
                        .map_err(PostProductError::ValidationError)?;

    let conn = get_pooled_connection(&pool).await?;
    let product = insert_product(conn, new_product).await?;

    Ok(HttpResponse::Created().json(product))
}
