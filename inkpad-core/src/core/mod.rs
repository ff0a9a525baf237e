//! Internal domain modules for the Inkpad core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod block;
pub mod delete;
pub mod error;
pub mod node;
pub mod storage;
pub mod workspace;

#[doc(inline)]
pub use block::{ContentBlock, NewContentBlock};
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{InkpadError, Result};
#[doc(inline)]
pub use node::{Node, NodeId, NodeKind};
#[doc(inline)]
pub use storage::Storage;
#[doc(inline)]
pub use workspace::{today_string, Workspace};
