//! 测试辅助：内存数据库与基础数据

use std::sync::Arc;

use crate::models::{
    classes::{entities::Class, requests::CreateClassRequest},
    students::{entities::Student, requests::CreateStudentRequest},
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    teachers::{entities::Teacher, requests::CreateTeacherRequest},
};
use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

pub async fn memory_storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory storage should initialize");
    Arc::new(storage)
}

/// 一个班级、两名教师、一个科目（归 teacher 所有）和三名学生
pub struct Fixture {
    pub teacher: Teacher,
    pub other_teacher: Teacher,
    pub class: Class,
    pub subject: Subject,
    pub students: Vec<Student>,
}

impl Fixture {
    pub async fn build(storage: &dyn Storage) -> Self {
        let teacher = storage
            .create_teacher(CreateTeacherRequest {
                first_name: "Jean".into(),
                last_name: "Martin".into(),
            })
            .await
            .unwrap();
        let other_teacher = storage
            .create_teacher(CreateTeacherRequest {
                first_name: "Claire".into(),
                last_name: "Bernard".into(),
            })
            .await
            .unwrap();
        let class = storage
            .create_class(CreateClassRequest {
                name: "6B".into(),
                description: Some("Sixth grade".into()),
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject(CreateSubjectRequest {
                name: "Mathematics".into(),
                teacher_id: teacher.id,
                class_id: class.id,
            })
            .await
            .unwrap();

        let mut students = Vec::new();
        for (first, last) in [("Alice", "Durand"), ("Bob", "Petit"), ("Chloe", "Moreau")] {
            students.push(
                storage
                    .create_student(CreateStudentRequest {
                        first_name: first.into(),
                        last_name: last.into(),
                        class_id: Some(class.id),
                    })
                    .await
                    .unwrap(),
            );
        }

        Self {
            teacher,
            other_teacher,
            class,
            subject,
            students,
        }
    }

    pub fn student_ids(&self) -> Vec<i64> {
        self.students.iter().map(|s| s.id).collect()
    }
}
