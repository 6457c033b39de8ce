//! 教师操作授权
//!
//! 以 (教师, 科目, 班级) 三元组为单位判断教师能否对该科目班级执行写操作。
//! 返回 false 不是错误，由调用方决定拒绝方式。

use crate::errors::Result;
use crate::storage::Storage;

/// 严格检查：科目由该教师负责且属于该班级
pub async fn can_act_strict(
    storage: &dyn Storage,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
) -> Result<bool> {
    storage
        .subject_owned_by(teacher_id, subject_id, class_id)
        .await
}

/// 宽松检查：存在对应的任课分配
pub async fn can_act_loose(
    storage: &dyn Storage,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
) -> Result<bool> {
    Ok(storage
        .find_assignment(teacher_id, subject_id, class_id)
        .await?
        .is_some())
}

/// 先严格检查，失败时回退到任课分配
pub async fn can_act(
    storage: &dyn Storage,
    teacher_id: i64,
    subject_id: i64,
    class_id: i64,
) -> Result<bool> {
    if can_act_strict(storage, teacher_id, subject_id, class_id).await? {
        return Ok(true);
    }
    can_act_loose(storage, teacher_id, subject_id, class_id).await
}

/// 教师是否可以查看班级（拥有任一科目或任课分配）
pub async fn has_class_access(
    storage: &dyn Storage,
    teacher_id: i64,
    class_id: i64,
) -> Result<bool> {
    storage.teacher_has_class_access(teacher_id, class_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::NewAssignment;
    use crate::services::test_support::{Fixture, memory_storage};

    #[actix_web::test]
    async fn test_owner_can_act() {
        let storage = memory_storage().await;
        let fx = Fixture::build(storage.as_ref()).await;

        let (owner, other) = (fx.teacher.id, fx.other_teacher.id);
        let (s, c) = (fx.subject.id, fx.class.id);
        assert!(can_act(storage.as_ref(), owner, s, c).await.unwrap());
        assert!(!can_act(storage.as_ref(), other, s, c).await.unwrap());
        assert!(!has_class_access(storage.as_ref(), other, c).await.unwrap());
    }

    #[actix_web::test]
    async fn test_assignment_grants_loose_access() {
        let storage = memory_storage().await;
        let fx = Fixture::build(storage.as_ref()).await;

        storage
            .create_assignment(NewAssignment {
                teacher_id: fx.other_teacher.id,
                subject_id: fx.subject.id,
                class_id: fx.class.id,
                academic_period: "2024".into(),
            })
            .await
            .unwrap();

        let (t, s, c) = (fx.other_teacher.id, fx.subject.id, fx.class.id);
        assert!(!can_act_strict(storage.as_ref(), t, s, c).await.unwrap());
        assert!(can_act_loose(storage.as_ref(), t, s, c).await.unwrap());
        assert!(can_act(storage.as_ref(), t, s, c).await.unwrap());
        assert!(has_class_access(storage.as_ref(), t, c).await.unwrap());
    }
}
