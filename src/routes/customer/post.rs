use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde::Deserialize;
use thiserror::Error;

use crate::{db_interaction::{insert_customer, CustomerInsertError}, domain::customer_name::CustomerName, utils::{error_fmt_chain, get_pooled_connection, json_error_response, DbPool, PoolGetError}};

#[derive(Deserialize, Debug)]
pub struct CustomerForm{
    name: Option<String>
}

#[derive(Error)]
pub enum PostCustomerError{
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to get connection from pool")]
    PoolError(#[from] PoolGetError),
    #[error("Failed to insert customer")]
    InsertCustomerError(#[from] CustomerInsertError)
}

impl Debug for PostCustomerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for PostCustomerError {
    fn status_code(&self) -> StatusCode {
        match self {
            PostCustomerError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        json_error_response(self.status_code(), self)
    }
}

#[tracing::instrument(
    "Adding a new customer",
    skip(pool)
)]
pub async fn post_customer(
    pool: web::Data<DbPool>,
    json: web::Json<CustomerForm>
) -> Result<HttpResponse, PostCustomerError>{
    let name = CustomerName::parse(json.0.name)
                .map_err(PostCustomerError::ValidationError)?;

    let conn = get_pooled_connection(&pool).await?;
    let customer = insert_customer(conn, name).await?;

    Ok(HttpResponse::Created().json(customer))
}
