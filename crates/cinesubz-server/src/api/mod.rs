mod error;
mod format;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;
