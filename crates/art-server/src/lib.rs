pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use server::{api_config, run_server};
pub use state::AppState;
