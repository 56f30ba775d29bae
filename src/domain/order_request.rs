use std::collections::HashSet;

use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct OrderRequest{
    pub customer_id: Option<i32>,
    pub delivery_date: Option<String>,
    pub products: Option<Vec<OrderLineRequest>>
}

#[derive(Deserialize, Debug)]
pub struct OrderLineRequest{
    pub product_id: Option<i32>,
    pub quantity: Option<i32>
}

/// An order request with every required field present. Whether the customer
/// and products exist, whether the lines are acceptable and whether the
/// delivery date parses is decided while placing the order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft{
    pub customer_id: i32,
    pub delivery_date: Option<String>,
    pub lines: Vec<OrderLineDraft>
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderLineDraft{
    pub product_id: i32,
    pub quantity: i32
}

impl OrderRequest{
    pub fn parse(self) -> Result<OrderDraft, String>{
        let (customer_id, products) = match (self.customer_id, self.products) {
            (Some(customer_id), Some(products)) => (customer_id, products),
            _ => return Err("Customer ID and Products are required".to_string())
        };

        let lines = products.into_iter()
            .map(|line| -> Result<OrderLineDraft, String> {
                let product_id = line.product_id.ok_or("Product ID is required")?;
                Ok(OrderLineDraft{ product_id, quantity: line.quantity.unwrap_or(1) })
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(OrderDraft{
            customer_id,
            delivery_date: self.delivery_date,
            lines
        })
    }
}

impl OrderDraft{
    /// Rejects non-positive quantities and products listed twice. Runs once the
    /// customer is known to exist, so an unknown customer is reported first.
    pub fn check_lines(&self) -> Result<(), String>{
        let mut seen = HashSet::new();

        for line in self.lines.iter() {
            if line.quantity <= 0 {
                return Err(format!("Quantity for product {} must be positive", line.product_id))
            }

            if !seen.insert(line.product_id) {
                return Err(format!("Product {} is listed more than once", line.product_id))
            }
        }

        Ok(())
    }
}
