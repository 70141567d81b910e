// HTTP module: inbound server and outbound client.

pub mod client;
pub mod server;

pub use crate::controller::controller::Controller;
pub use crate::middleware::middleware::Middleware;

pub use server::HttpServer;
