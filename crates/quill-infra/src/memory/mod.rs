//! In-memory repository implementations.
//!
//! These back the server when `DATABASE_URL` is unset and are the substrate
//! for handler-level tests. State lives for the process lifetime only.

mod post;
mod user;

pub use post::InMemoryPostRepository;
pub use user::InMemoryUserRepository;
