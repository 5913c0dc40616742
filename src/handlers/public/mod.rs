// handlers/public/mod.rs - Public handlers (no bearer token required)
//
// Liveness, account registration and bearer token acquisition. The token
// endpoint authenticates the caller itself (HTTP Basic or a login session).

pub mod health;   // GET /health
pub mod register; // POST /api/users
pub mod token;    // GET /api/token

pub use health::health_get;
pub use register::register_post;
pub use token::token_get;
