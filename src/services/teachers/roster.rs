use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{TeacherService, ensure_teacher_exists};
use crate::models::teachers::{requests::RosterQuery, responses::RosterEntry};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{authorization, storage_error_response};
use crate::utils::date::{date_to_timestamp, parse_absence_date, parse_session};

pub async fn class_roster(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    class_id: i64,
    query: RosterQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_teacher_exists(storage.as_ref(), teacher_id).await {
        return Ok(resp);
    }

    match storage.get_class_by_id(class_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Ok(storage_error_response("Get class", e)),
    }

    match authorization::has_class_access(storage.as_ref(), teacher_id, class_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(
                "Teacher {} denied roster access to class {}",
                teacher_id, class_id
            );
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AssignmentPermissionDenied,
                "Teacher does not have access to this class",
            )));
        }
        Err(e) => return Ok(storage_error_response("Check class access", e)),
    }

    // 日期、时段、科目三者齐全时才计算缺勤标记
    let date = match query.date.as_deref().map(parse_absence_date).transpose() {
        Ok(date) => date,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidDate,
                e.message(),
            )));
        }
    };
    let session = match query.session.as_deref().map(parse_session).transpose() {
        Ok(session) => session,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidSession,
                e.message(),
            )));
        }
    };

    let absent: HashSet<i64> = match (date, session, query.subject_id) {
        (Some(date), Some(session), Some(subject_id)) => {
            match storage
                .list_absent_student_ids(class_id, subject_id, date_to_timestamp(date), session)
                .await
            {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => return Ok(storage_error_response("Load absences", e)),
            }
        }
        _ => HashSet::new(),
    };

    let students = match storage.list_students_by_class(class_id).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_error_response("List class students", e)),
    };

    let roster: Vec<RosterEntry> = students
        .into_iter()
        .map(|s| RosterEntry {
            is_absent: absent.contains(&s.id),
            id: s.id,
            first_name: s.first_name,
            last_name: s.last_name,
        })
        .filter(|entry| !(query.present_only && entry.is_absent))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        roster,
        "Class roster retrieved successfully",
    )))
}
