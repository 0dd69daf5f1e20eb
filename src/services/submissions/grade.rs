use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_submission};
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::requests::{GradeInput, GradeSubmissionRequest},
};
use crate::services::assignments::load_managed_assignment;
use crate::services::{current_user, internal_error, rows::submission_row};

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    data: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let submission = match load_submission(&storage, submission_id).await {
        Ok(submission) => submission,
        Err(resp) => return Ok(resp),
    };

    let (assignment, _) =
        match load_managed_assignment(&storage, &user, submission.assignment_id).await {
            Ok(found) => found,
            Err(resp) => return Ok(resp),
        };

    if let Err(msg) = validate_score(data.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::GradeInvalid, msg)));
    }

    // 允许重复评分，后一次覆盖前一次
    let grade = GradeInput {
        score: data.score,
        feedback: data.feedback,
        graded_by: user.id,
    };
    let graded = match storage.grade_submission(submission.id, grade).await {
        Ok(Some(graded)) => graded,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Ok(internal_error("Grading failed", e)),
    };
    info!(
        "Submission {} graded {}/{} by user {}",
        graded.id, data.score, assignment.max_score, user.id
    );

    match submission_row(&storage, &graded).await {
        Ok(row) => Ok(HttpResponse::Ok().json(ApiResponse::success(row, "Submission graded"))),
        Err(e) => Ok(internal_error("Failed to load submission details", e)),
    }
}

/// 分数须在 `0..=max_score` 之间
fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if score.is_finite() && (0.0..=max_score).contains(&score) {
        Ok(())
    } else {
        Err(format!("Score must be between 0 and {max_score}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(42.5, 100.0).is_ok());
        assert!(validate_score(-0.5, 100.0).is_err());
        assert!(validate_score(100.5, 100.0).is_err());
        assert!(validate_score(f64::NAN, 100.0).is_err());
    }
}
