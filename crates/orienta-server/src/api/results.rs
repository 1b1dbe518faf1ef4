//! Results view, report download, and per-respondent history.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use orienta_core::{DeliveryStatus, ProfileDescriptor, ScoreTally, SessionState};
use orienta_report::{render_pdf, ReportContext};

use crate::middleware::RequestId;

use super::{load_session, map_db_error, see_other, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
struct ResultsView<'a> {
    respondent: &'a str,
    answers: &'a [String],
    predominant: Option<&'static str>,
    descriptor: Option<&'a ProfileDescriptor>,
    tally: &'a ScoreTally,
    careers: &'a [String],
    delivery: &'a DeliveryStatus,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct HistoryEntry {
    id: i64,
    predominant_profile: Option<String>,
    tally: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct HistoryView {
    respondent_id: i64,
    first_name: String,
    results: Vec<HistoryEntry>,
}

/// GET /api/v1/results — the scored outcome held in the session.
///
/// Callers without a session go back to registration; callers who
/// registered but never submitted go back to the test.
pub(in crate::api) async fn show_results(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Response {
    let Some((_, session)) = load_session(&state, &headers).await else {
        return see_other("/api/v1/register");
    };
    let SessionState::Scored {
        first_name,
        answers,
        tally,
        predominant,
        careers,
        delivery,
        ..
    } = &session
    else {
        return see_other("/api/v1/test");
    };

    let descriptor = predominant.and_then(|tag| state.data.profiles.descriptor_for(tag));
    Json(ApiResponse {
        data: ResultsView {
            respondent: first_name,
            answers,
            predominant: predominant.map(|tag| tag.as_str()),
            descriptor,
            tally,
            careers,
            delivery,
        },
        meta: ResponseMeta::new(req_id.0),
    })
    .into_response()
}

/// GET /api/v1/results/report — the same report that was emailed,
/// regenerated from the scored session and returned inline.
pub(in crate::api) async fn download_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some((_, session)) = load_session(&state, &headers).await else {
        return Ok(see_other("/api/v1/register"));
    };
    let SessionState::Scored {
        first_name,
        tally,
        predominant,
        careers,
        ..
    } = &session
    else {
        return Ok(see_other("/api/v1/test"));
    };

    let descriptor = predominant.and_then(|tag| state.data.profiles.descriptor_for(tag));
    let pdf = render_pdf(&ReportContext {
        respondent_name: first_name,
        predominant: *predominant,
        descriptor,
        tally,
        careers,
        generated_on: Utc::now().date_naive(),
    })
    .map_err(|e| {
        tracing::error!(error = %e, "report generation failed");
        ApiError::new(req_id.0, "internal_error", "report generation failed")
    })?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"test_result.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}

/// GET /api/v1/respondents/{id}/results — stored result history for one
/// respondent, newest first. Not tied to the session.
pub(in crate::api) async fn list_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<HistoryView>>, ApiError> {
    let rid = req_id.0;

    let respondent = orienta_db::get_respondent(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| ApiError::new(rid.clone(), "not_found", format!("respondent {id} not found")))?;

    let rows = orienta_db::list_results_for_respondent(&state.pool, id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    let results = rows
        .into_iter()
        .map(|row| HistoryEntry {
            id: row.id,
            predominant_profile: row.predominant_profile,
            tally: row.tally,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: HistoryView {
            respondent_id: respondent.id,
            first_name: respondent.first_name,
            results,
        },
        meta: ResponseMeta::new(rid),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use orienta_core::{DeliveryStatus, ProfileTag, ScoreTally, SessionState};

    use crate::api::tests::{body_json, test_state};
    use crate::api::{build_app, AppState};

    async fn scored_session(state: &AppState) -> String {
        let mut tally = ScoreTally::new();
        tally.insert(ProfileTag::Social, 12);
        tally.insert(ProfileTag::Artistic, 4);
        let session = SessionState::registered(1, "Ana".to_string(), "ana@example.com".to_string())
            .into_scored(
                vec!["Yes".to_string(); 60],
                tally,
                Some(ProfileTag::Social),
                vec!["Psychology".to_string(), "Nursing".to_string()],
                DeliveryStatus::Disabled,
            );
        let id = state.sessions.create(session).await;
        format!("orienta_session={id}")
    }

    #[tokio::test]
    async fn results_redirect_without_any_session() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results")
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
    async fn results_redirect_registered_but_unscored_back_to_test() {
        let state = test_state();
        let id = state
            .sessions
            .create(SessionState::registered(
                1,
                "Ana".to_string(),
                "ana@example.com".to_string(),
            ))
            .await;
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results")
                    .header(header::COOKIE, format!("orienta_session={id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/api/v1/test")
        );
    }

    #[tokio::test]
    async fn scored_session_renders_results() {
        let state = test_state();
        let cookie = scored_session(&state).await;
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["respondent"], "Ana");
        let answers = json["data"]["answers"].as_array().expect("answers");
        assert_eq!(answers.len(), 60);
        assert_eq!(answers[0], "Yes");
        assert_eq!(json["data"]["predominant"], "social");
        assert_eq!(json["data"]["tally"]["social"], 12);
        assert_eq!(json["data"]["careers"][0], "Psychology");
        assert_eq!(json["data"]["delivery"]["status"], "disabled");
        assert!(json["data"]["descriptor"]["title"].is_string());
    }

    #[tokio::test]
    async fn report_download_returns_a_pdf() {
        let state = test_state();
        let cookie = scored_session(&state).await;
        let app = build_app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results/report")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/pdf")
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn report_download_redirects_without_a_session() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results/report")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }
}
