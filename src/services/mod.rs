pub mod catalog_service;
pub mod user_service;

pub use catalog_service::{CatalogError, CatalogService, CategoryInput, ItemInput};
pub use user_service::{UserError, UserService};
