pub mod response;
pub mod session;
pub mod streamfactory;

// Re-exports for convenience
pub use response::HttpResponse;
pub use session::Session;
pub use streamfactory::{HttpStream, HttpStreamFactory};
