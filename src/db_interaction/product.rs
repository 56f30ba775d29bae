use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl, SelectableHelper};
use thiserror::Error;

use crate::{models::{NewProduct, Product}, schema::products, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting products from db",
    skip_all
)]
pub async fn get_products(
    mut conn: DbConnection
) -> Result<Vec<Product>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        products::table
            .select(Product::as_select())
            .order(products::id.asc())
            .load::<Product>(&mut conn)
            .context("Failed to get products")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum ProductInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into products table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for ProductInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Insert a product to db",
    skip(conn)
)]
pub async fn insert_product(
    mut conn: DbConnection,
    new_product: NewProduct
) -> Result<Product, ProductInsertError> {

    let product = spawn_blocking_with_tracing(move || {
        diesel::insert_into(products::table)
            .values(&new_product)
            .returning(Product::as_returning())
            .get_result::<Product>(&mut conn)
    })
    .await??;

    Ok(product)
}
