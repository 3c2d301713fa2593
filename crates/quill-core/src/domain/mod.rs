//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Post, PostChanges, PostWithAuthor};
pub use user::User;
