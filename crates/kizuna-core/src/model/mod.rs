pub mod ids;
pub mod item;

pub use ids::{ItemId, ItemIndex};
pub use item::Item;
