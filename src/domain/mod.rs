pub mod customer_name;
pub mod delivery_date;
pub mod loose_number;
pub mod new_product;
pub mod order_request;
