//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `WorkItemState`: lifecycle of a single day's work item
//! - `RequestPacer`: spacing and counting of API requests

mod pacer;
mod work_state;

// Re-export main types
pub use pacer::RequestPacer;
pub use work_state::WorkItemState;
