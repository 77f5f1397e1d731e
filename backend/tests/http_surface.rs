//! End-to-end coverage of the HTTP surface over fixture ports.
//!
//! These tests wire the real handlers, session middleware, and trace
//! middleware together the way the server does, substituting fixture ports
//! for persistence so no database is needed.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use backend::domain::ports::{
    FixtureItemsCommand, FixtureLoginService, FixturePantryQuery, FixtureSignupService,
    FIXTURE_PASSWORD, FIXTURE_USERNAME, FIXTURE_USER_ID,
};
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::items::{add_item, remove_item};
use backend::inbound::http::pantry::view_pantry;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{current_user, login, logout, signup};
use backend::Trace;

fn fixture_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(FixtureLoginService),
        Arc::new(FixtureSignupService),
        Arc::new(FixturePantryQuery),
        Arc::new(FixtureItemsCommand),
    ))
}

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    App::new()
        .app_data(fixture_state())
        .app_data(health_state)
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
                .wrap(session)
                .service(signup)
                .service(login)
                .service(logout)
                .service(current_user)
                .service(view_pantry)
                .service(add_item)
                .service(remove_item),
        )
        .service(ready)
        .service(live)
}

#[actix_web::test]
async fn login_pantry_items_logout_flow() {
    let app = test::init_service(test_app()).await;

    // Login with the fixture credentials.
    let login_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({
                "username": FIXTURE_USERNAME,
                "password": FIXTURE_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert!(login_res.status().is_success());
    assert!(login_res.headers().contains_key("trace-id"));
    let cookie = login_res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();

    // The session identifies the fixture user.
    let me_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert!(me_res.status().is_success());
    let me: Value = test::read_body_json(me_res).await;
    assert_eq!(me.get("id").and_then(Value::as_str), Some(FIXTURE_USER_ID));

    // The fixture pantry reconciles to an empty, consistent view.
    let pantry_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/pantry")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert!(pantry_res.status().is_success());
    let pantry: Value = test::read_body_json(pantry_res).await;
    assert_eq!(
        pantry.get("items").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
    assert_eq!(
        pantry.pointer("/stats/total").and_then(Value::as_u64),
        Some(0)
    );

    // Items can be added and removed through the command port.
    let add_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .cookie(cookie.clone())
            .set_json(json!({ "name": "Apples", "expiry": "2030-01-01" }))
            .to_request(),
    )
    .await;
    assert_eq!(add_res.status(), actix_web::http::StatusCode::CREATED);
    let created: Value = test::read_body_json(add_res).await;
    let item_id = created
        .get("id")
        .and_then(Value::as_str)
        .expect("created id")
        .to_owned();

    let delete_res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/items/{item_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(delete_res.status(), actix_web::http::StatusCode::NO_CONTENT);

    // Logout ends the session.
    let logout_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), actix_web::http::StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn signup_establishes_a_session() {
    let app = test::init_service(test_app()).await;

    let signup_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "correct horse battery",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(signup_res.status(), actix_web::http::StatusCode::CREATED);
    let cookie = signup_res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned();

    let pantry_res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/pantry")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert!(pantry_res.status().is_success());
}

#[actix_web::test]
async fn protected_routes_reject_anonymous_requests() {
    let app = test::init_service(test_app()).await;

    for (method, uri) in [
        ("GET", "/api/v1/pantry"),
        ("GET", "/api/v1/me"),
        ("POST", "/api/v1/items"),
    ] {
        let request = match method {
            "GET" => test::TestRequest::get().uri(uri),
            _ => test::TestRequest::post()
                .uri(uri)
                .set_json(json!({ "name": "x", "expiry": "2030-01-01" })),
        }
        .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::UNAUTHORIZED,
            "{method} {uri} must require a session"
        );
    }
}

#[actix_web::test]
async fn health_probes_answer_without_a_session() {
    let app = test::init_service(test_app()).await;

    for uri in ["/health/ready", "/health/live"] {
        let response =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert!(response.status().is_success(), "{uri} should answer 200");
    }
}
