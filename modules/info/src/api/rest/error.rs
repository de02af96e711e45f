use axum::http::StatusCode;

use super::problem::{FieldViolation, Problem};
use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 Problem for the request at `instance`
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::NotFound { .. } => {
            Problem::new(StatusCode::NOT_FOUND, "Not Found", e.to_string())
                .with_code("info.not_found")
        }
        DomainError::Validation { field, message } => Problem::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation Failed",
            e.to_string(),
        )
        .with_code("info.validation")
        .with_errors(vec![FieldViolation {
            field: field.clone(),
            message: message.clone(),
        }]),
        DomainError::Upstream(source) => {
            tracing::warn!(error = %source, "upstream fetch failed");
            Problem::new(
                StatusCode::BAD_GATEWAY,
                "Bad Gateway",
                "The upstream source could not be read",
            )
            .with_code("info.upstream")
        }
        DomainError::Cache(source) => {
            tracing::error!(error = %source, "cache store failed");
            internal_problem("info.cache")
        }
        DomainError::Database(source) => {
            tracing::error!(error = %source, "database error occurred");
            internal_problem("info.database")
        }
    };

    problem.with_instance(instance)
}

fn internal_problem(code: &str) -> Problem {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "An internal error occurred",
    )
    .with_code(code)
}
