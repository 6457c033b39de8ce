use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{TeacherService, ensure_teacher_exists};
use crate::models::{
    ApiResponse, ErrorCode,
    absences::requests::NewAbsence,
    assignments::requests::NewAssignment,
    teachers::{requests::MarkAbsencesRequest, responses::MarkAbsencesResponse},
};
use crate::services::{authorization, storage_error_response, validation_response};
use crate::utils::date::{date_to_timestamp, parse_absence_date, parse_session};

pub async fn mark_absences(
    service: &TeacherService,
    request: &HttpRequest,
    teacher_id: i64,
    mark_data: MarkAbsencesRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    // 1. 教师必须存在
    if let Err(resp) = ensure_teacher_exists(storage.as_ref(), teacher_id).await {
        return Ok(resp);
    }

    // 2. 请求校验
    if mark_data.student_ids.is_empty() {
        return Ok(validation_response("At least one student id is required"));
    }

    let date = match parse_absence_date(&mark_data.date) {
        Ok(date) => date,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidDate,
                e.message(),
            )));
        }
    };

    let session = match parse_session(&mark_data.session) {
        Ok(session) => session,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::InvalidSession,
                e.message(),
            )));
        }
    };

    // 3. 授权，先于学生校验
    let (subject_id, class_id) = (mark_data.subject_id, mark_data.class_id);
    match authorization::can_act(storage.as_ref(), teacher_id, subject_id, class_id).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(
                "Teacher {} is not allowed to mark absences for subject {} in class {}",
                teacher_id, subject_id, class_id
            );
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::AssignmentPermissionDenied,
                "Teacher is not assigned to this subject and class",
            )));
        }
        Err(e) => return Ok(storage_error_response("Check assignment", e)),
    }

    // 4. 学生必须全部存在且属于该班级
    let known = match storage.list_students_by_ids(&mark_data.student_ids).await {
        Ok(students) => students,
        Err(e) => return Ok(storage_error_response("Load students", e)),
    };
    let unknown: Vec<i64> = mark_data
        .student_ids
        .iter()
        .copied()
        .filter(|id| !known.iter().any(|s| s.id == *id))
        .collect();
    if !unknown.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidReference,
            format!("Unknown student ids: {}", join_ids(unknown)),
        )));
    }

    let outside: Vec<i64> = known
        .iter()
        .filter(|s| s.class_id != Some(class_id))
        .map(|s| s.id)
        .collect();
    if !outside.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidReference,
            format!(
                "Students not enrolled in class {class_id}: {}",
                join_ids(outside)
            ),
        )));
    }

    // 5. 查找或创建任课分配
    let assignment = match storage
        .find_assignment(teacher_id, subject_id, class_id)
        .await
    {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            let created = storage
                .create_assignment(NewAssignment {
                    teacher_id,
                    subject_id,
                    class_id,
                    academic_period: config.attendance.default_academic_period.clone(),
                })
                .await;
            match created {
                Ok(assignment) => {
                    info!(
                        "Created assignment {} for teacher {} (subject {}, class {})",
                        assignment.id, teacher_id, subject_id, class_id
                    );
                    assignment
                }
                Err(e) => return Ok(storage_error_response("Create assignment", e)),
            }
        }
        Err(e) => return Ok(storage_error_response("Find assignment", e)),
    };

    // 6. 批量写入
    let timestamp = date_to_timestamp(date);
    let rows = mark_data
        .student_ids
        .iter()
        .map(|&student_id| NewAbsence {
            date: timestamp,
            session,
            student_id,
            teacher_subject_class_id: assignment.id,
            is_justified: false,
            justification_note: None,
        })
        .collect();

    match storage
        .record_absences(rows, config.attendance.dedupe_marks)
        .await
    {
        Ok(count) => {
            info!(
                "Teacher {} marked {} absences on {} {} (assignment {})",
                teacher_id, count, date, session, assignment.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkAbsencesResponse {
                    count,
                    teacher_subject_class_id: assignment.id,
                    date,
                    session,
                },
                "Absences recorded successfully",
            )))
        }
        Err(e) => Ok(storage_error_response("Record absences", e)),
    }
}

fn join_ids(mut ids: Vec<i64>) -> String {
    ids.sort_unstable();
    ids.dedup();
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
