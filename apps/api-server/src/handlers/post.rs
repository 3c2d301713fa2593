//! Post CRUD - authenticated writes with cover uploads, public reads.
//!
//! Cover bytes go to object storage before the post record is written.
//! When the record write (or ownership check) then fails, the freshly
//! uploaded blob is deleted again, best effort.

use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Post, PostWithAuthor};
use quill_core::ports::{BaseRepository, ObjectStore, PostRepository};
use quill_shared::{ApiResponse, PostAuthor, PostResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::upload::{NewPostForm, UpdatePostForm};
use crate::state::AppState;

/// How many posts the public feed returns.
const RECENT_POSTS_LIMIT: u64 = 20;

/// `POST /api/v1/post` - create a post with a required cover image.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: MultipartForm<NewPostForm>,
) -> AppResult<HttpResponse> {
    let (fields, cover) = form.into_inner().validate(&state.uploads)?;

    let key = cover.object_key();
    let cover_url = state
        .store
        .put_public(&key, &cover.data, &cover.content_type)
        .await?;

    let author = match state.users.find_by_id(identity.author_id).await {
        Ok(Some(author)) => author,
        Ok(None) => {
            discard_upload(&state, &key).await;
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        Err(e) => {
            discard_upload(&state, &key).await;
            return Err(e.into());
        }
    };

    let post = Post::new(
        author.id,
        fields.title,
        fields.summary,
        fields.content,
        cover_url,
    );
    let post = match state.posts.create(post).await {
        Ok(post) => post,
        Err(e) => {
            discard_upload(&state, &key).await;
            return Err(e.into());
        }
    };

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "Post created");

    Ok(HttpResponse::Created().json(post_response(post, author.username)))
}

/// `GET /api/v1/post` - the public feed, newest first.
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_recent(RECENT_POSTS_LIMIT).await?;
    let posts: Vec<PostResponse> = posts.into_iter().map(joined_response).collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// `GET /api/v1/post/{id}` - a single post with its author.
pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "post")?;

    let item = state
        .posts
        .find_with_author(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(joined_response(item)))
}

/// `GET /api/v1/post/author/{id}` - all posts by one author, newest first.
pub async fn by_author(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author_id = parse_id(&path, "author")?;

    let posts = state.posts.find_by_author(author_id).await?;
    let posts: Vec<PostResponse> = posts.into_iter().map(joined_response).collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// `PUT /api/v1/post/{id}` - partial update, owner only. A post that
/// does not exist and a post owned by someone else are both 404.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    form: MultipartForm<UpdatePostForm>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "post")?;
    let (mut changes, cover) = form.into_inner().validate(&state.uploads)?;

    // A replaced cover leaves the old blob behind; keys are timestamped
    // and never reused, so it is merely orphaned.
    let uploaded_key = match cover {
        Some(cover) => {
            let key = cover.object_key();
            let url = state
                .store
                .put_public(&key, &cover.data, &cover.content_type)
                .await?;
            changes.cover_url = Some(url);
            Some(key)
        }
        None => None,
    };

    let updated = match state
        .posts
        .update_owned(id, identity.author_id, changes)
        .await
    {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(key) = &uploaded_key {
                discard_upload(&state, key).await;
            }
            return Err(e.into());
        }
    };

    match updated {
        Some(post) => {
            tracing::info!(post_id = %post.id, "Post updated");
            Ok(HttpResponse::Ok().json(post_response(post, identity.username)))
        }
        None => {
            if let Some(key) = &uploaded_key {
                discard_upload(&state, key).await;
            }
            Err(AppError::NotFound("Post not found".to_string()))
        }
    }
}

/// `DELETE /api/v1/post/{id}` - owner only, same 404 rule as update.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, "post")?;

    let post = state
        .posts
        .delete_owned(id, identity.author_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(post, identity.username),
        "Post deleted successfully",
    )))
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {what} id")))
}

fn post_response(post: Post, author_username: String) -> PostResponse {
    PostResponse {
        id: post.id,
        author: PostAuthor {
            id: post.author_id,
            username: author_username,
        },
        title: post.title,
        summary: post.summary,
        content: post.content,
        cover: post.cover_url,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn joined_response(item: PostWithAuthor) -> PostResponse {
    post_response(item.post, item.author_username)
}

/// Best-effort cleanup of a blob whose post record never materialized.
async fn discard_upload(state: &AppState, key: &str) {
    if let Err(e) = state.store.delete(key).await {
        tracing::warn!(key, error = %e, "Failed to clean up orphaned cover upload");
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use quill_core::domain::{Post, User};
    use quill_core::ports::{BaseRepository, PostRepository, TokenService};

    use crate::handlers::testing::{TestHandles, multipart_body, test_app, test_state};
    use crate::state::AppState;

    const BOUNDARY: &str = "----quill-test-boundary";

    async fn seed_user(handles: &TestHandles, state: &AppState, username: &str) -> (Uuid, String) {
        let user = handles
            .users
            .create(User::new(username.to_string(), "hash".to_string()))
            .await
            .unwrap();
        let token = state.tokens.generate_token(user.id, username).unwrap();
        (user.id, token)
    }

    async fn seed_post(handles: &TestHandles, author_id: Uuid, title: &str) -> Post {
        handles
            .posts
            .create(Post::new(
                author_id,
                title.to_string(),
                "Summary".to_string(),
                "Content".to_string(),
                "memory://uploads/seed.png".to_string(),
            ))
            .await
            .unwrap()
    }

    fn full_form(cover_len: usize) -> Vec<u8> {
        multipart_body(
            BOUNDARY,
            &[
                ("title", "My first post"),
                ("summary", "A short summary"),
                ("content", "Hello, world."),
            ],
            Some(("cover", "cover.png", "image/png", &vec![0u8; cover_len])),
        )
    }

    fn multipart_request(method: test::TestRequest, token: &str, body: Vec<u8>) -> test::TestRequest {
        method
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .insert_header(("x-access-token", token))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn create_requires_token() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/post")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(full_form(16))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }

    #[actix_web::test]
    async fn create_rejects_garbage_token() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let req = multipart_request(
            test::TestRequest::post().uri("/api/v1/post"),
            "not-a-token",
            full_form(16),
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 403);
    }

    #[actix_web::test]
    async fn create_stores_cover_then_post() {
        let (state, handles) = test_state();
        let (author_id, token) = seed_user(&handles, &state, "alice").await;
        let app = test_app(state).await;

        let req = multipart_request(
            test::TestRequest::post().uri("/api/v1/post"),
            &token,
            full_form(16),
        )
        .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), 201);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "My first post");
        assert_eq!(body["author"]["id"], author_id.to_string());
        assert_eq!(body["author"]["username"], "alice");
        assert!(
            body["cover"]
                .as_str()
                .unwrap()
                .starts_with("memory://uploads/")
        );

        assert_eq!(handles.store.object_count().await, 1);
        assert_eq!(handles.posts.list_recent(20).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn create_requires_all_fields() {
        let (state, handles) = test_state();
        let (_, token) = seed_user(&handles, &state, "alice").await;
        let app = test_app(state).await;

        // Missing the content field.
        let body = multipart_body(
            BOUNDARY,
            &[("title", "My first post"), ("summary", "A short summary")],
            Some(("cover", "cover.png", "image/png", &[0u8; 16])),
        );
        let req = multipart_request(test::TestRequest::post().uri("/api/v1/post"), &token, body)
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
        assert_eq!(handles.store.object_count().await, 0);
        assert!(handles.posts.list_recent(20).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_requires_cover() {
        let (state, handles) = test_state();
        let (_, token) = seed_user(&handles, &state, "alice").await;
        let app = test_app(state).await;

        let body = multipart_body(
            BOUNDARY,
            &[
                ("title", "My first post"),
                ("summary", "A short summary"),
                ("content", "Hello, world."),
            ],
            None,
        );
        let req = multipart_request(test::TestRequest::post().uri("/api/v1/post"), &token, body)
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
        assert_eq!(handles.store.object_count().await, 0);
    }

    #[actix_web::test]
    async fn create_rejects_oversized_cover() {
        let (state, handles) = test_state();
        let (_, token) = seed_user(&handles, &state, "alice").await;
        let app = test_app(state).await;

        // One byte over the 1_000_000 byte default.
        let req = multipart_request(
            test::TestRequest::post().uri("/api/v1/post"),
            &token,
            full_form(1_000_001),
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
        assert_eq!(handles.store.object_count().await, 0);
        assert!(handles.posts.list_recent(20).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_non_image() {
        let (state, handles) = test_state();
        let (_, token) = seed_user(&handles, &state, "alice").await;
        let app = test_app(state).await;

        let body = multipart_body(
            BOUNDARY,
            &[
                ("title", "My first post"),
                ("summary", "A short summary"),
                ("content", "Hello, world."),
            ],
            Some(("cover", "notes.txt", "text/plain", &[0u8; 16])),
        );
        let req = multipart_request(test::TestRequest::post().uri("/api/v1/post"), &token, body)
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
        assert_eq!(handles.store.object_count().await, 0);
    }

    #[actix_web::test]
    async fn create_cleans_up_cover_when_author_vanished() {
        let (state, handles) = test_state();
        // Valid token for an author that was never stored.
        let token = state
            .tokens
            .generate_token(Uuid::new_v4(), "ghost")
            .unwrap();
        let app = test_app(state).await;

        let req = multipart_request(
            test::TestRequest::post().uri("/api/v1/post"),
            &token,
            full_form(16),
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);
        assert_eq!(handles.store.object_count().await, 0);
    }

    #[actix_web::test]
    async fn list_caps_at_twenty_newest_first() {
        let (state, handles) = test_state();
        let (author_id, _) = seed_user(&handles, &state, "alice").await;

        let base = Utc::now() - Duration::seconds(100);
        for i in 0..25 {
            let mut post = Post::new(
                author_id,
                format!("post-{i}"),
                "Summary".to_string(),
                "Content".to_string(),
                "memory://uploads/seed.png".to_string(),
            );
            post.created_at = base + Duration::seconds(i);
            post.updated_at = post.created_at;
            handles.posts.create(post).await.unwrap();
        }

        let app = test_app(state).await;
        let req = test::TestRequest::get().uri("/api/v1/post").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let posts = body.as_array().unwrap();
        assert_eq!(posts.len(), 20);
        assert_eq!(posts[0]["title"], "post-24");
        assert_eq!(posts[19]["title"], "post-5");
        assert_eq!(posts[0]["author"]["username"], "alice");
    }

    #[actix_web::test]
    async fn get_returns_post_with_author() {
        let (state, handles) = test_state();
        let (author_id, _) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Readable").await;
        let app = test_app(state).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/post/{}", post.id))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "Readable");
        assert_eq!(body["author"]["username"], "alice");
    }

    #[actix_web::test]
    async fn get_unknown_post_is_404() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/post/{}", Uuid::new_v4()))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);
    }

    #[actix_web::test]
    async fn get_malformed_id_is_400() {
        let (state, _) = test_state();
        let app = test_app(state).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/post/not-a-uuid")
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn by_author_filters_to_one_author() {
        let (state, handles) = test_state();
        let (alice_id, _) = seed_user(&handles, &state, "alice").await;
        let (bob_id, _) = seed_user(&handles, &state, "bobby").await;
        seed_post(&handles, alice_id, "Alice's post").await;
        seed_post(&handles, bob_id, "Bob's post").await;
        let app = test_app(state).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/post/author/{alice_id}"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let posts = body.as_array().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["title"], "Alice's post");
    }

    #[actix_web::test]
    async fn update_by_owner_changes_title() {
        let (state, handles) = test_state();
        let (author_id, token) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Old title").await;
        let app = test_app(state).await;

        let body = multipart_body(BOUNDARY, &[("title", "New title")], None);
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/v1/post/{}", post.id)),
            &token,
            body,
        )
        .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "New title");
        assert_eq!(body["summary"], "Summary");

        let stored = handles.posts.find_with_author(post.id).await.unwrap().unwrap();
        assert_eq!(stored.post.title, "New title");
    }

    #[actix_web::test]
    async fn update_by_other_author_is_404() {
        let (state, handles) = test_state();
        let (alice_id, _) = seed_user(&handles, &state, "alice").await;
        let (_, bob_token) = seed_user(&handles, &state, "bobby").await;
        let post = seed_post(&handles, alice_id, "Alice's post").await;
        let app = test_app(state).await;

        let body = multipart_body(BOUNDARY, &[("title", "Hijacked")], None);
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/v1/post/{}", post.id)),
            &bob_token,
            body,
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);

        let stored = handles.posts.find_with_author(post.id).await.unwrap().unwrap();
        assert_eq!(stored.post.title, "Alice's post");
    }

    #[actix_web::test]
    async fn update_with_new_cover_stores_blob() {
        let (state, handles) = test_state();
        let (author_id, token) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Old title").await;
        let app = test_app(state).await;

        let body = multipart_body(
            BOUNDARY,
            &[],
            Some(("cover", "new-cover.jpg", "image/jpeg", &[0u8; 16])),
        );
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/v1/post/{}", post.id)),
            &token,
            body,
        )
        .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(
            body["cover"]
                .as_str()
                .unwrap()
                .starts_with("memory://uploads/")
        );
        assert_eq!(handles.store.object_count().await, 1);
    }

    #[actix_web::test]
    async fn update_cleans_up_cover_when_not_owner() {
        let (state, handles) = test_state();
        let (alice_id, _) = seed_user(&handles, &state, "alice").await;
        let (_, bob_token) = seed_user(&handles, &state, "bobby").await;
        let post = seed_post(&handles, alice_id, "Alice's post").await;
        let app = test_app(state).await;

        let body = multipart_body(
            BOUNDARY,
            &[],
            Some(("cover", "new-cover.jpg", "image/jpeg", &[0u8; 16])),
        );
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/v1/post/{}", post.id)),
            &bob_token,
            body,
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);
        assert_eq!(handles.store.object_count().await, 0);
    }

    #[actix_web::test]
    async fn update_requires_a_change() {
        let (state, handles) = test_state();
        let (author_id, token) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Old title").await;
        let app = test_app(state).await;

        let body = multipart_body(BOUNDARY, &[], None);
        let req = multipart_request(
            test::TestRequest::put().uri(&format!("/api/v1/post/{}", post.id)),
            &token,
            body,
        )
        .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 400);
    }

    #[actix_web::test]
    async fn delete_by_owner_returns_post() {
        let (state, handles) = test_state();
        let (author_id, token) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Doomed").await;
        let app = test_app(state).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/post/{}", post.id))
            .insert_header(("x-access-token", token.as_str()))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), 200);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Post deleted successfully");
        assert_eq!(body["data"]["title"], "Doomed");

        assert!(
            handles
                .posts
                .find_with_author(post.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[actix_web::test]
    async fn delete_by_other_author_is_404() {
        let (state, handles) = test_state();
        let (alice_id, _) = seed_user(&handles, &state, "alice").await;
        let (_, bob_token) = seed_user(&handles, &state, "bobby").await;
        let post = seed_post(&handles, alice_id, "Alice's post").await;
        let app = test_app(state).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/post/{}", post.id))
            .insert_header(("x-access-token", bob_token.as_str()))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 404);
        assert!(
            handles
                .posts
                .find_with_author(post.id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[actix_web::test]
    async fn delete_requires_token() {
        let (state, handles) = test_state();
        let (author_id, _) = seed_user(&handles, &state, "alice").await;
        let post = seed_post(&handles, author_id, "Staying").await;
        let app = test_app(state).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/post/{}", post.id))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 401);
    }
}
