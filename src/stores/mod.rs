//! Stock collaborators for the sampler: a cookie jar adapter, an in-memory
//! cache metadata store, and a redirect-following result processor.
mod cache;
mod cookies;
mod redirect;

#[cfg(test)]
mod tests;

pub use cache::{CacheEntry, MemoryCache};
pub use redirect::RedirectFollower;
