pub mod cart;
pub mod products;
pub mod requests;
pub mod users;
