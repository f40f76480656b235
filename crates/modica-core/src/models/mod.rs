//! Shared response and identifier types.

mod id;
mod page;
mod upload;

pub use id::ModelId;
pub use page::{Filter, PaginatedResponse};
pub use upload::{UploadEvent, UploadProgress};
