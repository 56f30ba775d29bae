use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::NewProduct;

use super::{customer_name::check_name_length, loose_number::LooseNumber};

#[derive(Deserialize, Debug)]
pub struct ProductRequest{
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<LooseNumber>,
    pub stock: Option<LooseNumber>
}

impl ProductRequest{
    /// Checks required fields in `name`, `price`, `stock` order and coerces the
    /// numeric ones; the first problem found is reported.
    pub fn parse(self) -> Result<NewProduct, String>{
        let name = match self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => return Err("Name is required".to_string())
        };
        check_name_length(&name)?;

        let price = self.price.ok_or("Price is required")?;
        let stock = self.stock.ok_or("Stock is required")?;

        let price = price.to_decimal("Price")?;
        if price < Decimal::ZERO {
            return Err("Price must not be negative".to_string())
        }

        let stock = stock.to_integer("Stock")?;
        if stock < 0 {
            return Err("Stock must not be negative".to_string())
        }

        Ok(NewProduct{
            name,
            description: self.description,
            price,
            stock
        })
    }
}
