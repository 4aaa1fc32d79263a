//! Database and domain models

pub mod catalog;
pub mod order;
pub mod player;

pub use catalog::{InventoryAlert, StringCatalogEntry, StringProduct};
pub use order::{Order, OrderStatus};
pub use player::Player;
