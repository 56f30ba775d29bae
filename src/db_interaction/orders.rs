use std::{error::Error, fmt::Debug};

use anyhow::Context;
use chrono::Utc;
use diesel::{Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{domain::{delivery_date::parse_delivery_date, order_request::OrderDraft}, models::{NewOrder, OrderProduct, OrderProductRow, OrderRow, OrderWithProducts, Product}, schema::{customers, order_products, orders, products}, telemetry::spawn_blocking_with_tracing, utils::{error_fmt_chain, DbConnection}};

#[tracing::instrument(
    "Getting orders along with their products",
    skip_all
)]
pub async fn get_orders_with_products(
    mut conn: DbConnection
) -> Result<Vec<OrderWithProducts>, anyhow::Error> {

    let res = spawn_blocking_with_tracing(move || {
        // One snapshot for every order and line that is read
        conn.build_transaction()
            .read_only()
            .repeatable_read()
            .run::<Vec<OrderWithProducts>, anyhow::Error, _>(|conn|{
                let order_ids = get_order_ids(conn)?;
                let mut ret: Vec<OrderWithProducts> = Vec::with_capacity(order_ids.len());

                for order_id in order_ids{
                    let curr = get_order_with_products_by_id(conn, order_id)
                        .context(format!("Failed to get order {}", order_id))?;
                    ret.push(curr);
                }

                Ok(ret)
            })
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[tracing::instrument(
    "Getting order ids",
    skip_all
)]
pub fn get_order_ids(
    conn: &mut PgConnection
) -> Result<Vec<i32>, anyhow::Error>{
    let result = orders::table
        .select(orders::id)
        .order(orders::id.asc())
        .load::<i32>(conn)
        .context("Failed to load order ids")?;

    Ok(result)
}

/// Reads an order back together with its lines, in the order the client
/// listed them. Line prices are the ones captured when the order was placed.
#[tracing::instrument(
    "Getting joined order with order_products by id",
    skip(conn)
)]
pub fn get_order_with_products_by_id(
    conn: &mut PgConnection,
    target_order_id: i32
) -> Result<OrderWithProducts, diesel::result::Error> {
    let order = orders::table
        .find(target_order_id)
        .select(OrderRow::as_select())
        .get_result::<OrderRow>(conn)?;

    let products = order_products::table
        .inner_join(products::table)
        .filter(order_products::order_id.eq(target_order_id))
        .order(order_products::position.asc())
        .select((
            order_products::product_id,
            products::name,
            order_products::unit_price,
            order_products::quantity,
        ))
        .load::<OrderProduct>(conn)?;

    Ok(OrderWithProducts::from_row(order, products))
}

// Error associated with placing an order and decrementing product stock
#[derive(Error)]
pub enum PlaceOrderError{
    #[error("Customer not found")]
    CustomerNotFound(i32),
    #[error("Product {0} not found")]
    ProductNotFound(i32),
    #[error("Insufficient stock for product {name}. Requested: {requested}, Available: {available}")]
    InsufficientStock{
        name: String,
        requested: i32,
        available: i32
    },
    #[error("{0}")]
    InvalidDeliveryDate(String),
    #[error("{0}")]
    InvalidLine(String),
    #[error("Order total for product {0} exceeds the supported amount")]
    TotalOverflow(i32),
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error)
}

impl Debug for PlaceOrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

/// Places an order as a single transaction.
///
/// The customer must exist, then every line is applied in the order given:
/// the product row is locked, its stock checked and decremented, the line
/// total added to the order and the association row written. Any error rolls
/// back everything done so far, so a failed call leaves no order, no
/// association rows and untouched stock.
#[tracing::instrument(
    "Placing order and updating product stock",
    skip(conn),
    fields(customer_id = draft.customer_id, lines = draft.lines.len())
)]
pub async fn place_order(
    mut conn: DbConnection,
    draft: OrderDraft
) -> Result<OrderWithProducts, PlaceOrderError> {

    let order = spawn_blocking_with_tracing(move || {
        conn.transaction::<OrderWithProducts, PlaceOrderError, _>(|conn|{
            let customer = customers::table
                .find(draft.customer_id)
                .select(customers::id)
                .get_result::<i32>(conn)
                .optional()?;

            if customer.is_none() {
                return Err(PlaceOrderError::CustomerNotFound(draft.customer_id))
            }

            draft.check_lines()
                .map_err(PlaceOrderError::InvalidLine)?;

            let delivery_date = parse_delivery_date(draft.delivery_date.as_deref())
                .map_err(PlaceOrderError::InvalidDeliveryDate)?;

            // Start of creating order, total is filled in once lines are applied

            let order_id = diesel::insert_into(orders::table)
                .values(&NewOrder{
                    order_date: Utc::now().naive_utc(),
                    delivery_date,
                    order_total: Decimal::ZERO,
                    customer_id: draft.customer_id
                })
                .returning(orders::id)
                .get_result::<i32>(conn)?;

            // End of creating order

            let mut order_total = Decimal::ZERO;

            for (position, line) in draft.lines.iter().enumerate() {
                // Row lock keeps concurrent orders from reading the same stock
                let product = products::table
                    .find(line.product_id)
                    .select(Product::as_select())
                    .for_update()
                    .get_result::<Product>(conn)
                    .optional()?
                    .ok_or(PlaceOrderError::ProductNotFound(line.product_id))?;

                let insufficient_stock = || PlaceOrderError::InsufficientStock{
                    name: product.name.clone(),
                    requested: line.quantity,
                    available: product.stock
                };

                if product.stock < line.quantity {
                    return Err(insufficient_stock())
                }

                let affected_rows = diesel::update(products::table.find(product.id))
                    .set(products::stock.eq(products::stock - line.quantity))
                    .filter(products::stock.ge(line.quantity))
                    .execute(conn)?;

                if affected_rows == 0 {
                    return Err(insufficient_stock())
                }

                order_total = product.price
                    .checked_mul(Decimal::from(line.quantity))
                    .and_then(|line_total| order_total.checked_add(line_total))
                    .ok_or(PlaceOrderError::TotalOverflow(product.id))?;

                diesel::insert_into(order_products::table)
                    .values(&OrderProductRow{
                        order_id,
                        product_id: product.id,
                        quantity: line.quantity,
                        unit_price: product.price,
                        position: position as i32
                    })
                    .execute(conn)?;
            }

            diesel::update(orders::table.find(order_id))
                .set(orders::order_total.eq(order_total))
                .execute(conn)?;

            Ok(get_order_with_products_by_id(conn, order_id)?)
        })
    })
    .await??;

    tracing::info!(order_id = order.id, order_total = %order.order_total, "Order placed");

    Ok(order)
}
