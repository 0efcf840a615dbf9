//! Post service
//!
//! Any authenticated caller may read posts. Writes are scoped to the
//! owner: an update or delete by someone else is reported as not found.

use crate::error::ApiError;
use crate::repositories::{NewPost, PostChanges, PostRecord, Store};
use blog_shared::types::{CreatePostRequest, UpdatePostRequest};
use tracing::info;

const RESOURCE: &str = "Post";

pub struct PostService;

impl PostService {
    /// Create a post owned by the caller
    pub async fn create(
        store: &Store,
        caller_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostRecord, ApiError> {
        let posts = &store.posts;
        let id = posts
            .create(NewPost {
                user_id: caller_id,
                title: req.title,
                body: req.body,
            })
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "create"))?;

        info!(post_id = id, user_id = caller_id, "Post created");

        posts
            .get(id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    pub async fn get(store: &Store, post_id: i64) -> Result<PostRecord, ApiError> {
        store
            .posts
            .get(post_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    pub async fn list(store: &Store) -> Result<Vec<PostRecord>, ApiError> {
        store
            .posts
            .list()
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "list"))
    }

    /// Update a post the caller owns
    pub async fn update(
        store: &Store,
        caller_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostRecord, ApiError> {
        let post = store
            .posts
            .update(
                post_id,
                caller_id,
                PostChanges {
                    title: req.title,
                    body: req.body,
                },
            )
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "update"))?;

        info!(post_id, user_id = caller_id, "Post updated");
        Ok(post)
    }

    /// Delete a post the caller owns, along with its comments
    pub async fn delete(store: &Store, caller_id: i64, post_id: i64) -> Result<(), ApiError> {
        store
            .posts
            .delete(post_id, caller_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "delete"))?;

        info!(post_id, user_id = caller_id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::NewUser;
    use proptest::prelude::*;

    async fn seed_user(store: &Store, email: &str) -> i64 {
        store
            .users
            .create(NewUser {
                name: "Test".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn create_request(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            body: "Body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner_to_caller() {
        let store = Store::in_memory();
        let alice = seed_user(&store, "a@x.com").await;

        let post = PostService::create(&store, alice, create_request("Hi"))
            .await
            .unwrap();

        assert_eq!(post.user_id, alice);
        assert_eq!(post.title, "Hi");
        assert_eq!(PostService::get(&store, post.id).await.unwrap().id, post.id);
    }

    #[tokio::test]
    async fn test_create_for_missing_user_is_not_found() {
        let store = Store::in_memory();

        let err = PostService::create(&store, 42, create_request("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_unset_fields() {
        let store = Store::in_memory();
        let alice = seed_user(&store, "a@x.com").await;
        let post = PostService::create(&store, alice, create_request("Hi"))
            .await
            .unwrap();

        let updated = PostService::update(
            &store,
            alice,
            post.id,
            UpdatePostRequest {
                title: Some("Hello".to_string()),
                body: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "Hello");
        assert_eq!(updated.body, "Body");
        assert_eq!(updated.user_id, alice);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_modify() {
        let store = Store::in_memory();
        let alice = seed_user(&store, "a@x.com").await;
        let bob = seed_user(&store, "b@x.com").await;
        let post = PostService::create(&store, alice, create_request("Hi"))
            .await
            .unwrap();

        let update = PostService::update(
            &store,
            bob,
            post.id,
            UpdatePostRequest {
                title: Some("Mine now".to_string()),
                body: None,
            },
        )
        .await
        .unwrap_err();
        let delete = PostService::delete(&store, bob, post.id).await.unwrap_err();

        assert!(matches!(update, ApiError::NotFound(_)));
        assert!(matches!(delete, ApiError::NotFound(_)));
        assert_eq!(PostService::get(&store, post.id).await.unwrap().title, "Hi");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = Store::in_memory();
        let alice = seed_user(&store, "a@x.com").await;
        let post = PostService::create(&store, alice, create_request("Hi"))
            .await
            .unwrap();

        PostService::delete(&store, alice, post.id).await.unwrap();

        assert!(matches!(
            PostService::get(&store, post.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(PostService::list(&store).await.unwrap().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Only the owner's writes ever land, whoever attempts them
        #[test]
        fn prop_only_owner_can_update(writer_is_owner in any::<bool>(), title in "[a-zA-Z ]{1,40}") {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let store = Store::in_memory();
                let owner = seed_user(&store, "owner@x.com").await;
                let other = seed_user(&store, "other@x.com").await;
                let post = PostService::create(&store, owner, create_request("Original"))
                    .await
                    .unwrap();

                let writer = if writer_is_owner { owner } else { other };
                let result = PostService::update(
                    &store,
                    writer,
                    post.id,
                    UpdatePostRequest { title: Some(title.clone()), body: None },
                )
                .await;

                let stored = PostService::get(&store, post.id).await.unwrap();
                if writer_is_owner {
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(stored.title, title);
                } else {
                    prop_assert!(matches!(result, Err(ApiError::NotFound(_))));
                    prop_assert_eq!(stored.title, "Original");
                }
                prop_assert_eq!(stored.user_id, owner);
                Ok(())
            })?;
        }
    }
}
