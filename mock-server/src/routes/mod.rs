pub mod common;
pub mod customer;
pub mod driver;
pub mod partner;
