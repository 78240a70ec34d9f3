//! sea-orm entities for the canteen schema.

pub mod meal_type;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod user;

pub use order::OrderStatus;
