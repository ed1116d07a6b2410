//! API Integration Tests
//!
//! Every scenario runs on the in-memory backend. The Postgres and Redis
//! variants run when `DATABASE_URL` / `REDIS_URL` are set.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_json, assert_status, backend_available, bearer, fixtures::*, test_config, TestServer,
};
use reaction_common::BackendKind;
use reqwest::StatusCode;

const BACKENDS: [BackendKind; 3] = [BackendKind::Memory, BackendKind::Postgres, BackendKind::Redis];

async fn servers() -> Vec<TestServer> {
    let mut servers = Vec::new();
    for backend in BACKENDS {
        if backend_available(backend) {
            servers.push(
                TestServer::start_with_backend(backend)
                    .await
                    .expect("Failed to start server"),
            );
        }
    }
    servers
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_reports_backend() {
    for server in servers().await {
        let response = server.get("/health/ready").await.expect("Request failed");
        let ready: ReadinessBody = assert_json(response, StatusCode::OK).await.unwrap();

        assert_eq!(ready.status, "ready");
        assert_eq!(ready.checks.storage, "healthy");
        assert!(["memory", "postgres", "redis"].contains(&ready.checks.backend.as_str()));
    }
}

// ============================================================================
// Reaction Transitions
// ============================================================================

#[tokio::test]
async fn test_reaction_lifecycle() {
    for server in servers().await {
        let post = server.posts.create_post().await.unwrap();
        let user = unique_user_id();

        let steps = [
            (ReactRequest::like(), ReactionBody::new(1, 0, "like")),
            (ReactRequest::like(), ReactionBody::new(0, 0, "")),
            (ReactRequest::dislike(), ReactionBody::new(0, 1, "dislike")),
            (ReactRequest::like(), ReactionBody::new(1, 0, "like")),
            (ReactRequest::dislike(), ReactionBody::new(0, 1, "dislike")),
            (ReactRequest::dislike(), ReactionBody::new(0, 0, "")),
        ];

        for (request, expected) in steps {
            let response = server.react(user, post, &request).await.unwrap();
            let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
            assert_eq!(body, expected, "after {:?}", request.reaction);
        }
    }
}

#[tokio::test]
async fn test_counters_aggregate_across_users() {
    for server in servers().await {
        let post = server.posts.create_post().await.unwrap();
        let (alice, bob, carol) = (unique_user_id(), unique_user_id(), unique_user_id());

        server.react(alice, post, &ReactRequest::like()).await.unwrap();
        server.react(bob, post, &ReactRequest::like()).await.unwrap();
        let response = server.react(carol, post, &ReactRequest::dislike()).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(2, 1, "dislike"));

        let response = server.reactions(bob, post).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(2, 1, "like"));

        let response = server.reactions(unique_user_id(), post).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(2, 1, ""));
    }
}

#[tokio::test]
async fn test_raw_authorization_header() {
    let server = TestServer::start().await.expect("Failed to start server");
    let post = server.posts.create_post().await.unwrap();

    let response = server
        .post_auth(
            &format!("/api/v1/posts/{post}/react"),
            &access_token(unique_user_id()),
            &ReactRequest::like(),
        )
        .await
        .unwrap();
    let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body, ReactionBody::new(1, 0, "like"));
}

// ============================================================================
// Error Outcomes
// ============================================================================

#[tokio::test]
async fn test_invalid_reaction_leaves_state_unchanged() {
    for server in servers().await {
        let post = server.posts.create_post().await.unwrap();
        let user = unique_user_id();

        for raw in ["", "LIKE", "love"] {
            let response = server.react(user, post, &ReactRequest::raw(raw)).await.unwrap();
            let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
            assert_eq!(err.error.code, "INVALID_REACTION");
        }

        let response = server.reactions(user, post).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(0, 0, ""));
    }
}

#[tokio::test]
async fn test_unknown_post() {
    for server in servers().await {
        let missing = server.posts.create_post().await.unwrap().into_inner() + 1_000_000;
        let response = server
            .post_auth(
                &format!("/api/v1/posts/{missing}/react"),
                &bearer(&access_token(unique_user_id())),
                &ReactRequest::like(),
            )
            .await
            .unwrap();

        let err: ErrorResponse = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
        assert_eq!(err.error.code, "UNKNOWN_ITEM");
    }
}

#[tokio::test]
async fn test_request_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let token = bearer(&access_token(unique_user_id()));

    let response = server
        .post_auth("/api/v1/posts/zero/react", &token, &ReactRequest::like())
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "INVALID_PATH_PARAMETER");

    let response = server
        .post_auth("/api/v1/posts/1/react", &token, &serde_json::json!({"kind": "like"}))
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(err.error.code, "INVALID_BODY");

    let response = server
        .post("/api/v1/posts/1/react", &ReactRequest::like())
        .await
        .unwrap();
    let err: ErrorResponse = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(err.error.code, "MISSING_AUTH");
}

#[tokio::test]
async fn test_malformed_config_is_rejected() {
    let err = test_config(BackendKind::Memory, &[("REACTION_MAX_ATTEMPTS", "many")]).unwrap_err();
    assert!(err.to_string().contains("REACTION_MAX_ATTEMPTS"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_users_all_counted() {
    const USERS: usize = 20;

    for server in servers().await {
        let post = server.posts.create_post().await.unwrap();
        let users: Vec<_> = (0..USERS).map(|_| unique_user_id()).collect();

        let responses = join_all(users.iter().enumerate().map(|(i, user)| {
            let request = if i % 2 == 0 {
                ReactRequest::like()
            } else {
                ReactRequest::dislike()
            };
            let server = &server;
            async move { server.react(*user, post, &request).await }
        }))
        .await;

        for response in responses {
            assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
        }

        let response = server.reactions(users[0], post).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(10, 10, "like"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_users_on_many_posts_all_succeed() {
    const USERS: usize = 60;

    let server = TestServer::start().await.expect("Failed to start server");
    let mut targets = Vec::with_capacity(USERS);
    for _ in 0..USERS {
        targets.push((unique_user_id(), server.posts.create_post().await.unwrap()));
    }

    let like = ReactRequest::like();
    let responses = join_all(
        targets
            .iter()
            .map(|(user, post)| server.react(*user, *post, &like)),
    )
    .await;

    for response in responses {
        let body: ReactionBody = assert_json(response.unwrap(), StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(1, 0, "like"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_user_likes_follow_parity() {
    const REQUESTS: usize = 9;

    for server in servers().await {
        let post = server.posts.create_post().await.unwrap();
        let user = unique_user_id();
        let like = ReactRequest::like();

        let responses = join_all((0..REQUESTS).map(|_| server.react(user, post, &like))).await;

        let succeeded = responses
            .into_iter()
            .filter(|r| r.as_ref().is_ok_and(|r| r.status() == StatusCode::OK))
            .count();
        assert_eq!(succeeded, REQUESTS);

        let response = server.reactions(user, post).await.unwrap();
        let body: ReactionBody = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body, ReactionBody::new(1, 0, "like"));
    }
}
