use chrono::NaiveDateTime;
use diesel::prelude::{Insertable, Queryable, Selectable};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::schema::customers;
use crate::schema::order_products;
use crate::schema::orders;
use crate::schema::products;

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Customer{
    pub id: i32,
    pub name: String
}

#[derive(Insertable, Debug)]
#[diesel(table_name = customers)]
pub struct NewCustomer{
    pub name: String
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Product{
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
pub struct NewProduct{
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow{
    pub id: i32,
    pub order_date: NaiveDateTime,
    pub delivery_date: Option<NaiveDateTime>,
    pub order_total: Decimal,
    pub customer_id: i32
}

#[derive(Insertable, Debug)]
#[diesel(table_name = orders)]
pub struct NewOrder{
    pub order_date: NaiveDateTime,
    pub delivery_date: Option<NaiveDateTime>,
    pub order_total: Decimal,
    pub customer_id: i32
}

// Association row between an order and one of its products
#[derive(Insertable, Debug)]
#[diesel(table_name = order_products)]
pub struct OrderProductRow{
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub position: i32
}

// A line of an order as it is served back to clients
#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderProduct{
    pub product_id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderWithProducts{
    pub id: i32,
    pub order_date: Option<NaiveDateTime>,
    pub delivery_date: Option<NaiveDateTime>,
    pub customer_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub order_total: Decimal,
    pub products: Vec<OrderProduct>
}

impl OrderWithProducts{
    pub fn from_row(row: OrderRow, products: Vec<OrderProduct>) -> Self{
        OrderWithProducts{
            id: row.id,
            order_date: Some(row.order_date),
            delivery_date: row.delivery_date,
            customer_id: row.customer_id,
            order_total: row.order_total,
            products
        }
    }
}
