use std::{error::Error, fmt::Debug};

use anyhow::Context;
use diesel::{QueryDsl, RunQueryDsl, SelectableHelper, ExpressionMethods};
use thiserror::Error;

use crate::{domain::customer_name::CustomerName, models::{Customer, NewCustomer}, schema::customers, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting customers from db",
    skip_all
)]
pub async fn get_customers(
    mut conn: DbConnection
) -> Result<Vec<Customer>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        customers::table
            .select(Customer::as_select())
            .order(customers::id.asc())
            .load::<Customer>(&mut conn)
            .context("Failed to get customers")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum CustomerInsertError{
    #[error("Failed due to threadpool error")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to insert into customers table")]
    InsertError(#[from] diesel::result::Error)
}

impl Debug for CustomerInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

#[tracing::instrument(
    "Inserting customer into the database",
    skip(conn)
)]
pub async fn insert_customer(
    mut conn: DbConnection,
    name: CustomerName
) -> Result<Customer, CustomerInsertError> {
    let new_customer = NewCustomer{
        name: name.inner()
    };

    let customer = spawn_blocking_with_tracing(move || {
        diesel::insert_into(customers::table)
            .values(&new_customer)
            .returning(Customer::as_returning())
            .get_result::<Customer>(&mut conn)
    })
    .await??;

    Ok(customer)
}
