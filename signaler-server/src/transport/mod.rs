mod frame;
mod transport_config;
mod websocket;

pub use frame::*;
pub use transport_config::*;
