pub mod order;

pub use order::{Customer, DeliveryInfo, Order, OrderItem};
