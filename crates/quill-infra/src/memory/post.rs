use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Post, PostChanges, PostWithAuthor};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::InMemoryUserRepository;

/// In-memory post repository. Holds a handle to the user store so read
/// queries can join the author's username the way the SQL adapter does.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryPostRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            users,
        }
    }

    async fn with_author(&self, post: Post) -> Result<PostWithAuthor, RepoError> {
        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| RepoError::Query("post has no author".to_string()))?;

        Ok(PostWithAuthor {
            post,
            author_username: author.username,
        })
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.posts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        let post = self.posts.read().await.get(&id).cloned();
        match post {
            Some(post) => Ok(Some(self.with_author(post).await?)),
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(limit as usize);

        let mut joined = Vec::with_capacity(posts.len());
        for post in posts {
            joined.push(self.with_author(post).await?);
        }
        Ok(joined)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut joined = Vec::with_capacity(posts.len());
        for post in posts {
            joined.push(self.with_author(post).await?);
        }
        Ok(joined)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        author_id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;

        let Some(post) = posts.get_mut(&id).filter(|p| p.author_id == author_id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(summary) = changes.summary {
            post.summary = summary;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(cover_url) = changes.cover_url {
            post.cover_url = cover_url;
        }
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.write().await;

        if posts.get(&id).is_none_or(|p| p.author_id != author_id) {
            return Ok(None);
        }

        Ok(posts.remove(&id))
    }
}
