use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
mod memory;
mod repo;
mod repo_types;
mod services;
mod timestamp;

pub use memory::InMemoryUserStore;
pub use repo::{PgUserStore, UserStore};
pub use services::UserService;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
