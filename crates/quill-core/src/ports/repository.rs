use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, PostChanges, PostWithAuthor, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Mutations are ownership-filtered: they only touch a
/// post whose stored author id matches the caller's.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// A single post with its author's username joined in.
    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError>;

    /// The most recent posts, newest first, capped at `limit`.
    async fn list_recent(&self, limit: u64) -> Result<Vec<PostWithAuthor>, RepoError>;

    /// All posts by one author, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<PostWithAuthor>, RepoError>;

    /// Apply `changes` to the post iff it exists and is owned by `author_id`.
    /// Returns the updated post, or `None` when not found / not owned.
    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError>;

    /// Delete the post iff it exists and is owned by `author_id`.
    /// Returns the deleted post, or `None` when not found / not owned.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError>;
}
