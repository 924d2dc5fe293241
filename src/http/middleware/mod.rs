//! Built-in middleware.
//!
//! Each constructor returns a [`HandlerFunc`](crate::http::HandlerFunc) to
//! attach with `use_handler`:
//!
//! ```ignore
//! let mut v1 = engine.group("/v1");
//! v1.use_handler(middleware::recovery());
//! v1.use_handler(middleware::logger());
//! ```

pub mod inject;
pub mod logger;
pub mod recovery;

pub use inject::inject;
pub use logger::logger;
pub use recovery::recovery;
