//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     "GET" + "/p/:lang/doc"
//!     → pattern.rs (validate, split into segments)
//!     → trie.rs (insert one node per segment under the method's root)
//!     → router.rs (store handler under "GET-/p/:lang/doc")
//!
//! Lookup (per request):
//!     "GET" + "/p/go/doc"
//!     → pattern.rs (split path)
//!     → trie.rs (depth-first search, literal children before wild ones)
//!     → router.rs (bind params from matched pattern, append handler)
//! ```
//!
//! # Design Decisions
//! - One trie per method; methods never see each other's routes
//! - Segments only: no regex, no partial-segment matching
//! - A `*name` segment ends the pattern and captures the rest of the path

pub mod pattern;
pub mod router;
pub mod trie;

pub use router::{Params, Router};
