//! Account authentication handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"secret1","role":"student"}
//! POST /api/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET  /api/auth/logout
//! POST /api/auth/send-otp {"email":"ada@example.com"}
//! POST /api/auth/verify-otp {"email":"ada@example.com","otp":"482913"}
//! POST /api/auth/reset-password {"email":"ada@example.com","password":"fresh1"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Email, Error, LoginCredentials, Password, Registration, ResetCode, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, ApiResponse};
use crate::inbound::http::schemas::UserResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_field_error, require};

/// Registration body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `student` or `educator`.
    pub role: Option<String>,
}

/// Login body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body for `POST /api/auth/send-otp`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    /// Account to reset.
    pub email: Option<String>,
}

/// Body for `POST /api/auth/verify-otp`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: Option<String>,
    /// Six-digit code from the reset mail.
    pub otp: Option<String>,
}

/// Body for `POST /api/auth/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    /// New password, 6 to 20 characters.
    pub password: Option<String>,
}

fn parse_email(raw: Option<String>) -> Result<Email, Error> {
    let email = require(FieldName::new("email"), raw)?;
    Email::new(&email).map_err(map_user_validation_error)
}

/// Attach the offending field to a user validation failure.
pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyName | UserValidationError::NameTooLong { .. } => "name",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
        UserValidationError::PasswordLength { .. } => "password",
        UserValidationError::UnknownRole => "role",
    };
    invalid_field_error(FieldName::new(field), err)
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let name = require(FieldName::new("name"), value.name)?;
        let email = require(FieldName::new("email"), value.email)?;
        let password = require(FieldName::new("password"), value.password)?;
        let role = require(FieldName::new("role"), value.role)?;
        Self::try_from_parts(&name, &email, &password, &role).map_err(map_user_validation_error)
    }
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let email = require(FieldName::new("email"), value.email)?;
        let password = require(FieldName::new("password"), value.password)?;
        Self::try_from_parts(&email, &password).map_err(map_user_validation_error)
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserResponse>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = envelope::ErrorEnvelope),
        (status = 409, description = "Email already registered", body = envelope::ErrorEnvelope),
        (status = 500, description = "Internal server error", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    session.persist_user(user.id())?;
    Ok(envelope::created(
        "User registered successfully",
        UserResponse::from(&user),
    ))
}

/// Check credentials and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = ApiResponse<UserResponse>,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = envelope::ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = envelope::ErrorEnvelope),
        (status = 500, description = "Internal server error", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user = state.accounts.login(credentials).await?;
    session.persist_user(user.id())?;
    Ok(envelope::ok("Login successful", UserResponse::from(&user)))
}

/// End the session.
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared"),
        (status = 401, description = "Not signed in", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[get("/auth/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    session.clear();
    Ok(envelope::ok("Logged out successfully", ()))
}

/// Mail a one-time reset code to an account.
#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code sent"),
        (status = 400, description = "Invalid request", body = envelope::ErrorEnvelope),
        (status = 404, description = "No account for this email", body = envelope::ErrorEnvelope),
        (status = 502, description = "Mail could not be sent", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "sendOtp",
    security([])
)]
#[post("/auth/send-otp")]
pub async fn send_otp(
    state: web::Data<HttpState>,
    payload: web::Json<SendOtpRequest>,
) -> ApiResult<HttpResponse> {
    let email = parse_email(payload.into_inner().email)?;
    state.password_resets.send_code(&email).await?;
    Ok(envelope::ok("OTP sent successfully", ()))
}

/// Confirm a reset code.
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted"),
        (status = 400, description = "Invalid, expired or unrequested code", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "verifyOtp",
    security([])
)]
#[post("/auth/verify-otp")]
pub async fn verify_otp(
    state: web::Data<HttpState>,
    payload: web::Json<VerifyOtpRequest>,
) -> ApiResult<HttpResponse> {
    let VerifyOtpRequest { email, otp } = payload.into_inner();
    let email = parse_email(email)?;
    let otp = require(FieldName::new("otp"), otp)?;
    let code =
        ResetCode::new(&otp).map_err(|err| invalid_field_error(FieldName::new("otp"), err))?;
    state.password_resets.verify_code(&email, &code).await?;
    Ok(envelope::ok("OTP verified successfully", ()))
}

/// Replace the password once a reset code has been confirmed.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced"),
        (status = 400, description = "Invalid request or code not verified", body = envelope::ErrorEnvelope),
        (status = 500, description = "Internal server error", body = envelope::ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "resetPassword",
    security([])
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ResetPasswordRequest { email, password } = payload.into_inner();
    let email = parse_email(email)?;
    let password = require(FieldName::new("password"), password)?;
    let password = Password::for_registration(&password).map_err(map_user_validation_error)?;
    state.password_resets.reset_password(&email, password).await?;
    Ok(envelope::ok("Password reset successfully", ()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{
        TestBackend, body_json, register as register_user, send, test_app,
    };
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(register)
            .service(login)
            .service(logout)
            .service(send_otp)
            .service(verify_otp)
            .service(reset_password);
    }

    async fn post_json<S>(app: &S, uri: &str, payload: Value) -> (StatusCode, Value)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        send(app, actix_test::TestRequest::post().uri(uri).set_json(payload)).await
    }

    #[actix_web::test]
    async fn register_returns_created_user_without_hash() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "name": "Ada",
                    "email": "Ada@Example.com",
                    "password": "secret123",
                    "role": "educator"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res.response().cookies().any(|c| c.name() == "session"));
        let body = body_json(res).await;
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert_eq!(body["data"]["role"], "educator");
        assert_eq!(body["data"]["enrollCourses"], json!([]));
        assert!(body["data"].get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn duplicate_email_is_conflict() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        register_user(&app, "dup@example.com", "student").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "name": "Other",
                    "email": "dup@example.com",
                    "password": "secret123",
                    "role": "student"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body = body_json(res).await;
        assert_eq!(body["code"], "conflict");
        assert_eq!(body["success"], false);
    }

    #[rstest]
    #[case(json!({"email": "a@example.com", "password": "secret123", "role": "student"}), "name", "missing_field")]
    #[case(json!({"name": "A", "email": "nope", "password": "secret123", "role": "student"}), "email", "invalid_value")]
    #[case(json!({"name": "A", "email": "a@example.com", "password": "123", "role": "student"}), "password", "invalid_value")]
    #[case(json!({"name": "A", "email": "a@example.com", "password": "secret123", "role": "admin"}), "role", "invalid_value")]
    #[actix_web::test]
    async fn register_validation_names_the_field(
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(payload)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn login_checks_password() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        register_user(&app, "ada@example.com", "student").await;

        let bad = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "ada@example.com", "password": "wrong-pass"}))
                .to_request(),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

        let good = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "ADA@example.com", "password": "secret123"}))
                .to_request(),
        )
        .await;
        assert_eq!(good.status(), StatusCode::OK);
        let body = body_json(good).await;
        assert_eq!(body["message"], "Login successful");
        assert_eq!(body["data"]["email"], "ada@example.com");
    }

    #[actix_web::test]
    async fn malformed_json_is_enveloped_bad_request() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["details"]["code"], "malformed_body");
    }

    #[actix_web::test]
    async fn logout_requires_and_clears_session() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let anonymous = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/auth/logout").to_request(),
        )
        .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let (cookie, _) = register_user(&app, "ada@example.com", "student").await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert!(body["data"].is_null());
    }

    #[actix_web::test]
    async fn reset_flow_replaces_the_password() {
        let backend = TestBackend::new();
        let mailer = backend.mailer.clone();
        let app = actix_test::init_service(test_app(backend.state, routes)).await;
        register_user(&app, "ada@example.com", "student").await;

        let (status, body) =
            post_json(&app, "/api/auth/send-otp", json!({"email": "ada@example.com"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "OTP sent successfully");
        assert!(body["data"].is_null());

        let email = Email::new("ada@example.com").expect("email");
        let code = mailer.last_code_for(&email).await.expect("code mailed");
        let (status, _) = post_json(
            &app,
            "/api/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": code.expose()}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(
            &app,
            "/api/auth/reset-password",
            json!({"email": "ada@example.com", "password": "fresh1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Password reset successfully");

        let (old, _) = post_json(
            &app,
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "secret123"}),
        )
        .await;
        assert_eq!(old, StatusCode::UNAUTHORIZED);
        let (new, _) = post_json(
            &app,
            "/api/auth/login",
            json!({"email": "ada@example.com", "password": "fresh1"}),
        )
        .await;
        assert_eq!(new, StatusCode::OK);

        let (again, body) = post_json(
            &app,
            "/api/auth/reset-password",
            json!({"email": "ada@example.com", "password": "another1"}),
        )
        .await;
        assert_eq!(again, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "OTP verification is required");
    }

    #[actix_web::test]
    async fn wrong_code_is_rejected_and_reset_stays_locked() {
        let backend = TestBackend::new();
        let mailer = backend.mailer.clone();
        let app = actix_test::init_service(test_app(backend.state, routes)).await;
        register_user(&app, "ada@example.com", "student").await;
        post_json(&app, "/api/auth/send-otp", json!({"email": "ada@example.com"})).await;

        let email = Email::new("ada@example.com").expect("email");
        let sent = mailer.last_code_for(&email).await.expect("code mailed");
        let wrong = if sent.expose() == "999999" { "100000" } else { "999999" };
        let (status, body) = post_json(
            &app,
            "/api/auth/verify-otp",
            json!({"email": "ada@example.com", "otp": wrong}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid OTP");

        let (status, body) = post_json(
            &app,
            "/api/auth/reset-password",
            json!({"email": "ada@example.com", "password": "fresh1"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "OTP verification is required");
    }

    #[actix_web::test]
    async fn send_otp_to_unknown_email_is_not_found() {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let (status, body) =
            post_json(&app, "/api/auth/send-otp", json!({"email": "nobody@example.com"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[rstest]
    #[case("/api/auth/send-otp", json!({}), "email", "missing_field")]
    #[case("/api/auth/verify-otp", json!({"email": "ada@example.com", "otp": "12ab56"}), "otp", "invalid_value")]
    #[case("/api/auth/reset-password", json!({"email": "ada@example.com", "password": "123"}), "password", "invalid_value")]
    #[actix_web::test]
    async fn reset_validation_names_the_field(
        #[case] uri: &str,
        #[case] payload: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(TestBackend::new().state, routes)).await;
        let (status, body) = post_json(&app, uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }
}
