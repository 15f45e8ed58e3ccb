//! Thread storage
//!
//! The store is the single authority over which threads exist and in what
//! order they are listed. It is a plain in-memory structure; callers that
//! share it across threads wrap it in a lock (see `ffi::ChatService`).

mod thread_store;

pub use thread_store::ThreadStore;
