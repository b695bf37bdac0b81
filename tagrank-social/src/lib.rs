//! Social network clients used by tagrank.
//!
//! Only the Twitter/X v1.1 search surface is implemented. Callers depend on the
//! [`twitter::TweetSearch`] trait so the collector can run against a fake provider.
pub mod twitter;
