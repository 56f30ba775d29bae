mod customer;
mod health_check;
mod order;
mod product;

pub use customer::*;
pub use health_check::*;
pub use order::*;
pub use product::*;
