//! The test itself: form rendering and submission scoring.

use std::collections::HashMap;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::Serialize;

use orienta_core::{score, DeliveryStatus, ScoringError, SessionState};
use orienta_mail::{OutboundAttachment, OutboundMessage};
use orienta_report::{render_pdf, sample_careers, ReportContext};

use crate::middleware::RequestId;

use super::{load_session, map_db_error, see_other, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(in crate::api) struct QuestionView {
    pub index: usize,
    pub text: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct TestFormView {
    pub respondent: String,
    pub questions: Vec<QuestionView>,
}

/// GET /api/v1/test — the question bank, rendered for the registered
/// respondent. Unregistered callers are pushed back to registration.
pub(in crate::api) async fn show_test(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Response {
    let Some((_, session)) = load_session(&state, &headers).await else {
        return see_other("/api/v1/register");
    };

    let questions = state
        .data
        .questions
        .questions
        .iter()
        .enumerate()
        .map(|(index, q)| QuestionView {
            index,
            text: q.text.clone(),
            choices: q.options.keys().cloned().collect(),
        })
        .collect();

    Json(ApiResponse {
        data: TestFormView {
            respondent: session.first_name().to_string(),
            questions,
        },
        meta: ResponseMeta::new(req_id.0),
    })
    .into_response()
}

/// POST /api/v1/test — score the submission, persist the result, attempt
/// report delivery, and move the session to `Scored`.
///
/// Answers arrive form-encoded, keyed positionally as `answer{i}`. An
/// incomplete submission re-renders as a validation error with nothing
/// persisted. Delivery failure is deliberately non-fatal: the result is
/// already committed and the warning is carried into the results view.
pub(in crate::api) async fn submit_test(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let Some((session_id, session)) = load_session(&state, &headers).await else {
        return Ok(see_other("/api/v1/register"));
    };
    let rid = &req_id.0;

    let bank = &state.data.questions.questions;
    let answers: Vec<Option<String>> = (0..bank.len())
        .map(|i| form.get(&format!("answer{i}")).cloned())
        .collect();

    let outcome = match score(bank, &answers) {
        Ok(outcome) => outcome,
        Err(ScoringError::Incomplete { missing }) => {
            return Err(ApiError::new(
                rid,
                "validation_error",
                format!("every question must be answered; missing positions: {missing:?}"),
            ));
        }
    };

    let tally_json = serde_json::to_value(&outcome.tally).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize tally");
        ApiError::new(rid, "internal_error", "failed to serialize tally")
    })?;
    let result = orienta_db::insert_result(
        &state.pool,
        session.respondent_id(),
        outcome.predominant.map(|tag| tag.as_str()),
        &tally_json,
    )
    .await
    .map_err(|e| map_db_error(rid.clone(), &e))?;

    let full_list = state.data.careers.careers_for(outcome.predominant);
    let sampled = sample_careers(full_list, &mut rand::rng());

    let descriptor = outcome
        .predominant
        .and_then(|tag| state.data.profiles.descriptor_for(tag));
    let pdf = render_pdf(&ReportContext {
        respondent_name: session.first_name(),
        predominant: outcome.predominant,
        descriptor,
        tally: &outcome.tally,
        careers: &sampled,
        generated_on: chrono::Utc::now().date_naive(),
    })
    .map_err(|e| {
        tracing::error!(error = %e, "report generation failed");
        ApiError::new(rid, "internal_error", "report generation failed")
    })?;

    let delivery = deliver_report(&state, &session, pdf).await;

    let answers: Vec<String> = answers
        .into_iter()
        .map(|a| a.unwrap_or_default().trim().to_string())
        .collect();
    let next = session.into_scored(
        answers,
        outcome.tally,
        outcome.predominant,
        sampled,
        delivery,
    );
    state.sessions.put(session_id, next).await;

    tracing::info!(result_id = result.id, "submission scored and persisted");
    Ok(see_other("/api/v1/results"))
}

/// Hand the report to the delivery channel under a bounded timeout. The
/// result row is already committed; every failure here degrades to a warning.
async fn deliver_report(state: &AppState, session: &SessionState, pdf: Vec<u8>) -> DeliveryStatus {
    if !state.mailer.is_enabled() {
        return DeliveryStatus::Disabled;
    }

    let message = OutboundMessage {
        to: session.email().to_string(),
        subject: "Vocational Test Results".to_string(),
        body: format!(
            "Hello {},\n\nAttached you will find your vocational test report.\n\nRegards.",
            session.first_name()
        ),
        attachment: Some(OutboundAttachment {
            filename: "test_result.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: pdf,
        }),
    };

    match tokio::time::timeout(state.mail_timeout, state.mailer.send(message)).await {
        Ok(Ok(())) => DeliveryStatus::Sent,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "report delivery failed; continuing to results");
            DeliveryStatus::Failed(e.to_string())
        }
        Err(_) => {
            tracing::warn!("report delivery timed out; continuing to results");
            DeliveryStatus::Failed("delivery timed out".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use orienta_core::SessionState;

    use crate::api::tests::{body_json, test_state};
    use crate::api::{build_app, AppState};

    async fn seeded_session(state: &AppState) -> String {
        let id = state
            .sessions
            .create(SessionState::registered(
                1,
                "Ana".to_string(),
                "ana@example.com".to_string(),
            ))
            .await;
        format!("orienta_session={id}")
    }

    #[tokio::test]
    async fn show_test_redirects_unregistered_callers() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/api/v1/register")
        );
    }

    #[tokio::test]
    async fn show_test_returns_the_full_bank_for_a_session() {
        let state = test_state();
        let cookie = seeded_session(&state).await;
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/test")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["respondent"], "Ana");
        let questions = json["data"]["questions"].as_array().expect("questions");
        assert_eq!(questions.len(), 60);
        assert_eq!(questions[0]["index"], 0);
        let choices = questions[0]["choices"].as_array().expect("choices");
        assert_eq!(choices.len(), 2);
    }

    #[tokio::test]
    async fn submit_without_session_redirects_to_registration() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/test")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from("answer0=Yes"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/api/v1/register")
        );
    }

    #[tokio::test]
    async fn incomplete_submission_is_rejected_and_nothing_persisted() {
        let state = test_state();
        let cookie = seeded_session(&state).await;
        let app = build_app(state);

        // Leave position 5 blank; everything else answered.
        let form: String = (0..60)
            .map(|i| {
                if i == 5 {
                    format!("answer{i}=")
                } else {
                    format!("answer{i}=No")
                }
            })
            .collect::<Vec<_>>()
            .join("&");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/test")
                    .header(header::COOKIE, cookie)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .expect("request"),
            )
            .await
            .expect("response");

        // Validation fires before any storage or delivery work; no live
        // database is needed to reach it.
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
        assert!(json["error"]["message"]
            .as_str()
            .expect("message")
            .contains('5'));
    }

    #[tokio::test]
    async fn complete_submission_reaches_storage() {
        let state = test_state();
        let cookie = seeded_session(&state).await;
        let app = build_app(state);

        let form: String = (0..60)
            .map(|i| format!("answer{i}=No"))
            .collect::<Vec<_>>()
            .join("&");

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/test")
                    .header(header::COOKIE, cookie)
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .expect("request"),
            )
            .await
            .expect("response");

        // The submission passes validation and scoring, then fails at the
        // (deliberately unreachable) database — proving the pipeline order.
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "internal_error");
    }
}
