//! Twitter/X API integration surface.
//!
//! Submodules provide the signed HTTP client wrapper, the search seam used by the
//! collector, and strongly typed v1.1 response models.
pub mod client;
pub mod search;
pub mod types;

pub use client::TwitterApi;
pub use search::TweetSearch;
