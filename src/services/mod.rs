pub mod cart;
pub mod jwt;
pub mod products;
pub mod users;
