pub mod notification;
pub mod ports;
pub mod transaction;
pub mod user;
