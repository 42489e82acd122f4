//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{HistoryPage, HistoryParams, Paginated, PaginationMeta, PaginationParams};
pub use response::{Accepted, MessageResponse};
