pub mod category;
pub mod item;
pub mod user;

pub use category::{Category, CategoryPatch, NewCategory};
pub use item::{Item, ItemFilter, ItemPatch, NewItem};
pub use user::{NewUser, User};
