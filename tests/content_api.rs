mod common;

use actix_web::{test, web, App};
use chrono::Duration;
use loginregister_server::{configure, AppState, AuthenticatedIdentity, TokenIssuer};
use serde_json::{json, Value};

#[actix_web::test]
async fn test_public_content_needs_no_token() {
    let state = AppState::in_memory(common::test_settings()).unwrap();
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let resp = test::TestRequest::get().uri("/api/test/all").send_request(&app).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(test::read_body(resp).await, "Public Content.");
}

#[actix_web::test]
async fn test_guarded_content_follows_registered_roles() {
    let state = AppState::in_memory(common::test_settings()).unwrap();
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let resp = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "moderator",
            "email": "mod@x.com",
            "password": "secret",
            "role": ["mod"]
        }))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 200);

    let resp = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "moderator", "password": "secret" }))
        .send_request(&app)
        .await;
    let body: Value = test::read_body_json(resp).await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    for (uri, status, text) in [
        ("/api/test/user", 200u16, Some("User Content.")),
        ("/api/test/mod", 200, Some("Moderator Board.")),
        ("/api/test/admin", 403, None),
    ] {
        let resp = test::TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bearer.clone()))
            .send_request(&app)
            .await;
        assert_eq!(resp.status(), status, "unexpected status for {}", uri);

        if let Some(text) = text {
            assert_eq!(test::read_body(resp).await, text);
        }
    }
}

#[actix_web::test]
async fn test_guarded_content_rejects_missing_and_bad_tokens() {
    let state = AppState::in_memory(common::test_settings()).unwrap();
    let app = test::init_service(App::new().app_data(web::Data::new(state)).configure(configure)).await;

    let resp = test::TestRequest::get().uri("/api/test/user").send_request(&app).await;
    assert_eq!(resp.status(), 401);

    let resp = test::TestRequest::get()
        .uri("/api/test/user")
        .insert_header(("Authorization", "Bearer invalid_token"))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);

    let foreign = TokenIssuer::new("another_secret", Duration::hours(1))
        .issue(&AuthenticatedIdentity {
            id: 1,
            username: "mallory".to_string(),
            email: "m@x.com".to_string(),
            roles: vec!["ROLE_ADMIN".to_string()],
        })
        .unwrap();
    let resp = test::TestRequest::get()
        .uri("/api/test/admin")
        .insert_header(("Authorization", format!("Bearer {}", foreign)))
        .send_request(&app)
        .await;
    assert_eq!(resp.status(), 401);
}
