mod registry;
mod session;
mod session_hooks;

pub use registry::*;
pub use session::*;
pub use session_hooks::*;
