// Application wiring: builds every component from config and owns their lifecycle.

pub mod app;
pub mod server;

pub use app::App;
