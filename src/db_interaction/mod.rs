mod customer;
mod orders;
mod product;

pub use customer::*;
pub use orders::*;
pub use product::*;
