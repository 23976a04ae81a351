//! End-to-end dispatch behavior.

use bytes::Bytes;
use http::header::ALLOW;
use http::{Method, StatusCode};
use http_body_util::BodyExt;
use proptest::prelude::*;
use trivium_router::{handler_fn, Handler, Request, Response, Router, TRACE_ID_HEADER};

fn request(method: Method, path: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn respond(body: &'static str) -> Handler {
    handler_fn(move |_ctx, _request| async move {
        Response::new(http_body_util::Full::new(Bytes::from(body)))
    })
}

fn echo_param(name: &'static str) -> Handler {
    handler_fn(move |ctx, _request| async move {
        let value = ctx.param(name).unwrap_or_default().to_string();
        Response::new(http_body_util::Full::new(Bytes::from(value)))
    })
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn regex_param_binds_on_full_match() {
    let mut router = Router::new();
    router.get("/users/:id|[0-9]+", echo_param("id")).unwrap();

    let response = router.dispatch(request(Method::GET, "/users/42")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "42");
}

#[tokio::test]
async fn regex_param_mismatch_falls_through_to_404() {
    let mut router = Router::new();
    router.get("/users/:id|[0-9]+", echo_param("id")).unwrap();

    let response = router.dispatch(request(Method::GET, "/users/abc")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plain_param_rejects_empty_segment() {
    let mut router = Router::new();
    router.get("/users/:id", echo_param("id")).unwrap();

    let response = router.dispatch(request(Method::GET, "/users/")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn method_mismatch_reports_allowed_methods() {
    let mut router = Router::new();
    router
        .handle("/items", respond("items"), &[Method::GET, Method::POST])
        .unwrap();

    let response = router.dispatch(request(Method::DELETE, "/items")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.headers().get(ALLOW).unwrap(),
        "GET, HEAD, POST, OPTIONS"
    );
}

#[tokio::test]
async fn allow_header_unions_across_routes() {
    let mut router = Router::new();
    router.get("/items", respond("read")).unwrap();
    router
        .handle("/items", respond("write"), &[Method::PUT])
        .unwrap();
    // Another pattern matching the same path contributes its method too.
    router
        .handle("/:section", respond("section"), &[Method::PATCH])
        .unwrap();

    let response = router.dispatch(request(Method::DELETE, "/items")).await;
    assert_eq!(
        response.headers().get(ALLOW).unwrap(),
        "GET, HEAD, PATCH, PUT, OPTIONS"
    );
}

#[tokio::test]
async fn options_on_matched_path_returns_204_empty() {
    let mut router = Router::new();
    router.get("/items", respond("items")).unwrap();

    let response = router.dispatch(request(Method::OPTIONS, "/items")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.headers().get(ALLOW).is_some());
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn wildcard_binds_joined_tail() {
    let mut router = Router::new();
    router
        .get(
            "/files/...",
            handler_fn(|ctx, _request| async move {
                let tail = ctx.wildcard().unwrap_or_default().to_string();
                Response::new(http_body_util::Full::new(Bytes::from(tail)))
            }),
        )
        .unwrap();

    let response = router.dispatch(request(Method::GET, "/files/a/b/c")).await;
    assert_eq!(body_text(response).await, "a/b/c");
}

#[tokio::test]
async fn wildcard_does_not_match_bare_prefix() {
    let mut router = Router::new();
    router.get("/files/...", respond("files")).unwrap();

    let response = router.dispatch(request(Method::GET, "/files")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wildcard_matches_trailing_slash_with_empty_tail() {
    let mut router = Router::new();
    router
        .get(
            "/files/...",
            handler_fn(|ctx, _request| async move {
                let tail = format!("[{}]", ctx.wildcard().unwrap_or("missing"));
                Response::new(http_body_util::Full::new(Bytes::from(tail)))
            }),
        )
        .unwrap();

    let response = router.dispatch(request(Method::GET, "/files/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn first_registered_route_wins_overlap() {
    let mut router = Router::new();
    router.get("/users/:id", respond("first")).unwrap();
    router.get("/users/:name", respond("second")).unwrap();

    let response = router.dispatch(request(Method::GET, "/users/ada")).await;
    assert_eq!(body_text(response).await, "first");
}

#[tokio::test]
async fn head_is_served_by_get_registration() {
    let mut router = Router::new();
    router.get("/items", respond("items")).unwrap();

    let response = router.dispatch(request(Method::HEAD, "/items")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reregistering_same_regex_is_idempotent() {
    let mut router = Router::new();
    router.get("/users/:id|[0-9]+", echo_param("id")).unwrap();
    router.get("/orders/:id|[0-9]+", echo_param("id")).unwrap();

    let response = router.dispatch(request(Method::GET, "/orders/7")).await;
    assert_eq!(body_text(response).await, "7");

    let response = router.dispatch(request(Method::GET, "/users/9")).await;
    assert_eq!(body_text(response).await, "9");
}

#[tokio::test]
async fn trace_ids_differ_between_requests() {
    let mut router = Router::new();
    router.get("/items", respond("items")).unwrap();

    let first = router.dispatch(request(Method::GET, "/items")).await;
    let second = router.dispatch(request(Method::GET, "/items")).await;

    let a = first.headers().get(&TRACE_ID_HEADER).unwrap();
    let b = second.headers().get(&TRACE_ID_HEADER).unwrap();
    assert_ne!(a, b);
}

proptest! {
    // A non-wildcard route never matches a path with a different number
    // of segments.
    #[test]
    fn segment_count_mismatch_never_matches(
        pattern_segments in proptest::collection::vec("[a-z]{1,8}", 1..5),
        request_segments in proptest::collection::vec("[a-z]{1,8}", 0..7),
    ) {
        prop_assume!(pattern_segments.len() != request_segments.len());

        let pattern = format!("/{}", pattern_segments.join("/"));
        let path = if request_segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", request_segments.join("/"))
        };
        prop_assume!(pattern_segments.len() + 1 != path.split('/').count());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let mut router = Router::new();
            router.get(&pattern, respond("hit")).unwrap();
            let response = router.dispatch(request(Method::GET, &path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        });
    }
}
