//! Account API handlers.
//!
//! ```text
//! POST /api/v1/signup {"username":"alice","email":"alice@example.com","password":"..."}
//! POST /api/v1/login  {"username":"alice","password":"..."}
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, SignupRequest, SignupValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Signup request body for `POST /api/v1/signup`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupBody {
    /// Requested account username.
    pub username: String,
    /// Contact address for expiry reminders.
    pub email: String,
    /// Plaintext password; hashed before it is stored.
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"username":"alice","password":"hunter2!"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Response body carrying the authenticated account id.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Stable user identifier.
    pub id: String,
}

impl TryFrom<LoginBody> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

impl TryFrom<SignupBody> for SignupRequest {
    type Error = SignupValidationError;

    fn try_from(value: SignupBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.email, &value.password)
    }
}

/// Register a new account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignupBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    let request =
        SignupRequest::try_from(payload.into_inner()).map_err(map_signup_validation_error)?;
    let user_id = state.signup.register(request).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Created().json(AccountResponse {
        id: user_id.to_string(),
    }))
}

/// Authenticate user and establish a session.
///
/// Uses the centralised `Error` type so clients get a consistent
/// error schema across all endpoints.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Return the authenticated account id.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Authenticated account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(session: SessionContext) -> ApiResult<web::Json<AccountResponse>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(AccountResponse {
        id: user_id.to_string(),
    }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn map_signup_validation_error(err: SignupValidationError) -> Error {
    let field = match &err {
        SignupValidationError::InvalidUsername(_) => "username",
        SignupValidationError::InvalidEmail(_) => "email",
        SignupValidationError::EmptyPassword | SignupValidationError::PasswordTooShort { .. } => {
            "password"
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, web, App};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::domain::ports::{
        FixtureItemsCommand, FixtureLoginService, FixturePantryQuery, FixtureSignupService,
        FIXTURE_PASSWORD, FIXTURE_USERNAME, FIXTURE_USER_ID,
    };

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = web::Data::new(HttpState::new(
            Arc::new(FixtureLoginService),
            Arc::new(FixtureSignupService),
            Arc::new(FixturePantryQuery),
            Arc::new(FixtureItemsCommand),
        ));
        App::new()
            .app_data(state)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(signup)
                    .service(login)
                    .service(logout)
                    .service(current_user),
            )
    }

    #[rstest]
    #[case("   ", "password", "username", "empty_username")]
    #[case("alice", "", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_invalid_payloads(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginBody {
                username: username.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("invalid_request")
        );
        let details = value
            .get("details")
            .and_then(|v| v.as_object())
            .expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[actix_web::test]
    async fn login_rejects_wrong_credentials_with_unauthorised_status() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginBody {
                username: FIXTURE_USERNAME.into(),
                password: "wrong-password".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value.get("message").and_then(Value::as_str),
            Some("invalid credentials")
        );
        assert_eq!(
            value.get("code").and_then(Value::as_str),
            Some("unauthorized")
        );
    }

    #[actix_web::test]
    async fn login_establishes_a_session_for_me() {
        let app = actix_test::init_service(test_app()).await;

        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginBody {
                username: FIXTURE_USERNAME.into(),
                password: FIXTURE_PASSWORD.into(),
            })
            .to_request();
        let login_res = actix_test::call_service(&app, login_req).await;
        assert!(login_res.status().is_success());
        let cookie = login_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie");

        let me_req = actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cookie)
            .to_request();
        let me_res = actix_test::call_service(&app, me_req).await;
        assert!(me_res.status().is_success());
        let body: AccountResponse = actix_test::read_body_json(me_res).await;
        assert_eq!(body.id, FIXTURE_USER_ID);
    }

    #[rstest]
    #[case("ab", "alice@example.com", "longpassword", "username")]
    #[case("alice", "not-an-email", "longpassword", "email")]
    #[case("alice", "alice@example.com", "short", "password")]
    #[actix_web::test]
    async fn signup_rejects_invalid_payloads(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(&SignupBody {
                username: username.into(),
                email: email.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value
                .get("details")
                .and_then(|d| d.get("field"))
                .and_then(Value::as_str),
            Some(field)
        );
    }

    #[actix_web::test]
    async fn signup_creates_account_and_session() {
        let app = actix_test::init_service(test_app()).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(&SignupBody {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "correct horse battery".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
        assert!(response
            .response()
            .cookies()
            .any(|c| c.name() == "session"));
        let body: AccountResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.id, FIXTURE_USER_ID);
    }

    #[actix_web::test]
    async fn logout_invalidates_the_session() {
        let app = actix_test::init_service(test_app()).await;

        let login_req = actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginBody {
                username: FIXTURE_USERNAME.into(),
                password: FIXTURE_PASSWORD.into(),
            })
            .to_request();
        let login_res = actix_test::call_service(&app, login_req).await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie");

        let logout_req = actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request();
        let logout_res = actix_test::call_service(&app, logout_req).await;
        assert_eq!(logout_res.status(), actix_web::http::StatusCode::NO_CONTENT);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie rewritten");

        let me_req = actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(cleared)
            .to_request();
        let me_res = actix_test::call_service(&app, me_req).await;
        assert_eq!(me_res.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn me_rejects_without_session() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/me").to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
