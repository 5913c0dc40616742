// handlers/mod.rs - handlers grouped by how the caller is authenticated
//
// public    → no credentials, or credentials checked by the handler itself
// protected → bearer token (JSON API under /api)
// pages     → session cookie (HTML surface)

pub mod pages;
pub mod protected;
pub mod public;
