pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, Store};
pub use models::{
    Category, CategoryPatch, Item, ItemFilter, ItemPatch, NewCategory, NewItem, NewUser, User,
};
