// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Route prefix: /api/category*
// Middleware: bearer_auth_middleware verifies the API token and inserts AuthUser.
// Failures never redirect; they answer with a JSON error envelope.

pub mod body;     // JSON body parsing shared by POST/PUT
pub mod category; // /api/categories, /api/category/:id
pub mod item;     // /api/category/:id/items, /api/category/:id/item/:item_id

pub use category::{categories_get, categories_post, category_delete, category_get, category_put};
pub use item::{item_delete, item_get, item_put, items_post};
