//! # Wirebox — name-keyed dependency injection for async Rust
//!
//! Register providers under string names on an immutable [`Registry`],
//! bind a snapshot with [`Registry::finalize`], and let the [`Injector`]
//! build what you ask for: dependencies first, concurrently, each one at
//! most once per build, cacheable ones at most once per injector.
//!
//! ```rust
//! use std::sync::Arc;
//! use wirebox::prelude::*;
//!
//! #[injectable]
//! fn greeting(port: u16) -> String {
//!     format!("listening on {port}")
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let injector = Registry::new()
//!     .constant("port", 8080u16, RegisterOptions::new())?
//!     .function("greeting", greeting_factory(), RegisterOptions::new().cacheable(true))?
//!     .finalize();
//!
//! let text: Arc<String> = injector.resolve("greeting").await?;
//! assert_eq!(*text, "listening on 8080");
//! # Ok(())
//! # }
//! ```

extern crate self as wirebox;

pub use wirebox_container::*;
pub use wirebox_macros::injectable;
pub use wirebox_support::*;

pub mod prelude {
    pub use wirebox_container::prelude::*;
    pub use wirebox_macros::injectable;
}

#[doc(hidden)]
pub mod __private {
    pub use async_trait::async_trait;
}
