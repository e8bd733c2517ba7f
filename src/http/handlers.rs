//! Axum handlers for the measure REST resource
//!
//! Each handler coerces its inputs and delegates to the measure service.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    domain::measure::{parse_measure_id, Measure},
    errors::AppError,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMeasuresQuery {
    #[serde(default, rename = "type")]
    pub measure_type: Option<String>,
}

impl ListMeasuresQuery {
    /// An empty `type` means no filter.
    fn type_filter(&self) -> Option<&str> {
        self.measure_type
            .as_deref()
            .filter(|measure_type| !measure_type.is_empty())
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_measures(
    State(state): State<AppState>,
    query: Result<Query<ListMeasuresQuery>, QueryRejection>,
) -> Result<Json<Vec<Measure>>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        AppError::bad_request("invalid_query", rejection.body_text())
    })?;
    let measures = state.measure_service.list_alive(query.type_filter()).await?;
    Ok(Json(measures))
}

pub async fn get_measure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Measure>, AppError> {
    let id = parse_measure_id(&id)?;
    let measure = state.measure_service.get_by_id(id).await?;
    Ok(Json(measure))
}

pub async fn delete_measure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_measure_id(&id)?;
    state.measure_service.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_measures(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.measure_service.delete_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_measure(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let measure = decode_measure(&body)?;
    state.measure_service.update(measure).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_measures_by_owner(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<Vec<Measure>>, AppError> {
    let measures = state.measure_service.list_alive_by_owner(&owner).await?;
    Ok(Json(measures))
}

pub async fn create_measure(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Measure>), AppError> {
    let measure = decode_measure(&body)?;
    let created = state.measure_service.create(measure).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

fn decode_measure(body: &[u8]) -> Result<Measure, AppError> {
    serde_json::from_slice(body).map_err(|err| {
        AppError::bad_request("malformed_measure", format!("invalid measure body: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_type_query_means_no_filter() {
        let query = ListMeasuresQuery {
            measure_type: Some(String::new()),
        };
        assert_eq!(query.type_filter(), None);
        assert_eq!(ListMeasuresQuery::default().type_filter(), None);

        let query = ListMeasuresQuery {
            measure_type: Some("griffin".to_string()),
        };
        assert_eq!(query.type_filter(), Some("griffin"));
    }

    #[test]
    fn decode_measure_reports_malformed_json() {
        let err = decode_measure(b"{not json").expect_err("malformed");
        assert!(matches!(
            err,
            AppError::BadRequest {
                code: "malformed_measure",
                ..
            }
        ));
    }
}
