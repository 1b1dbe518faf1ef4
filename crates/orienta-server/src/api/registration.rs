//! Registration: creates a respondent and opens a `Registered` session.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};

use orienta_core::SessionState;
use orienta_db::NewRespondent;

use crate::middleware::RequestId;
use crate::session::session_cookie_value;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MIN_AGE: i16 = 14;
const MAX_AGE: i16 = 19;

#[derive(Debug, Serialize)]
pub(in crate::api) struct RegisterFormView {
    fields: &'static [&'static str],
    age_min: i16,
    age_max: i16,
}

/// GET /api/v1/register — the registration form descriptor. Also the landing
/// spot for the session-guard redirects, so it must answer GET.
pub(in crate::api) async fn show_register(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RegisterFormView>> {
    Json(ApiResponse {
        data: RegisterFormView {
            fields: &["first_name", "last_name", "age", "email"],
            age_min: MIN_AGE,
            age_max: MAX_AGE,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct RegisterForm {
    first_name: String,
    last_name: String,
    age: String,
    email: String,
}

/// Age must be inside the instrument's target range, boundaries included.
fn validate_age(req_id: &str, raw: &str) -> Result<i16, ApiError> {
    let age: i16 = raw.trim().parse().map_err(|_| {
        ApiError::new(
            req_id,
            "validation_error",
            format!("age must be a whole number, got '{raw}'"),
        )
    })?;
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(ApiError::new(
            req_id,
            "validation_error",
            format!("age must be between {MIN_AGE} and {MAX_AGE}, got {age}"),
        ))
    }
}

fn validate_name(req_id: &str, field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > 100 {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("{field} must be 1-100 characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trim and lower-case the email; registration and the uniqueness check both
/// operate on this normalized form.
fn normalize_email(req_id: &str, raw: &str) -> Result<String, ApiError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "email must be a valid address",
        ));
    }
    Ok(email)
}

/// POST /api/v1/register — validate, insert the respondent, open a session.
pub(in crate::api) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let rid = &req_id.0;

    let first_name = validate_name(rid, "first_name", &form.first_name)?;
    let last_name = validate_name(rid, "last_name", &form.last_name)?;
    let age = validate_age(rid, &form.age)?;
    let email = normalize_email(rid, &form.email)?;

    let row = orienta_db::insert_respondent(
        &state.pool,
        &NewRespondent {
            first_name: first_name.clone(),
            last_name,
            age,
            email: email.clone(),
        },
    )
    .await
    .map_err(|e| match e {
        orienta_db::DbError::DuplicateEmail => {
            ApiError::new(rid, "conflict", "that email is already registered")
        }
        other => map_db_error(rid.clone(), &other),
    })?;

    tracing::info!(respondent_id = row.id, "respondent registered");

    let session_id = state
        .sessions
        .create(SessionState::registered(row.id, first_name, email))
        .await;

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::SET_COOKIE, session_cookie_value(session_id)),
            (
                header::LOCATION,
                header::HeaderValue::from_static("/api/v1/test"),
            ),
        ],
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::api::tests::{body_json, test_state};
    use crate::api::build_app;

    #[test]
    fn age_boundaries_are_inclusive() {
        assert!(validate_age("rid", "14").is_ok());
        assert!(validate_age("rid", "19").is_ok());
        assert!(validate_age("rid", "13").is_err());
        assert!(validate_age("rid", "20").is_err());
    }

    #[test]
    fn age_must_be_numeric() {
        assert!(validate_age("rid", "fifteen").is_err());
        assert!(validate_age("rid", "").is_err());
    }

    #[test]
    fn email_is_trimmed_and_lowercased() {
        let email = normalize_email("rid", "  Ana.Quispe@Example.COM ").expect("valid");
        assert_eq!(email, "ana.quispe@example.com");
    }

    #[test]
    fn email_without_at_sign_is_rejected() {
        assert!(normalize_email("rid", "not-an-address").is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_name("rid", "first_name", "   ").is_err());
        assert_eq!(
            validate_name("rid", "first_name", " Ana ").expect("valid"),
            "Ana"
        );
    }

    async fn post_register(form: &str) -> axum::response::Response {
        let app = build_app(test_state());
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/register")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .expect("request"),
        )
        .await
        .expect("response")
    }

    #[tokio::test]
    async fn register_answers_get_with_the_form_descriptor() {
        // The session guards redirect here, so the path must serve GET.
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/register")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), axum::http::StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["age_min"], 14);
        assert_eq!(json["data"]["age_max"], 19);
        assert_eq!(json["data"]["fields"][3], "email");
    }

    #[tokio::test]
    async fn register_rejects_age_thirteen() {
        let response =
            post_register("first_name=Ana&last_name=Quispe&age=13&email=ana%40example.com").await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("age"));
    }

    #[tokio::test]
    async fn register_rejects_age_twenty() {
        let response =
            post_register("first_name=Ana&last_name=Quispe&age=20&email=ana%40example.com").await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_rejects_bad_email_before_touching_storage() {
        let response = post_register("first_name=Ana&last_name=Quispe&age=16&email=nope").await;
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains("email"));
    }
}
