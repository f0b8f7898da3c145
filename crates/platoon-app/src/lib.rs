// Library root: re-exports the app modules so integration tests can reach
// the config loader, the Stats API client and the renderer.

pub mod config;
pub mod mlb;
pub mod render;
