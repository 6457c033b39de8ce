//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod absences;
mod assignments;
mod classes;
mod students;
mod subjects;
mod teachers;

use crate::config::AppConfig;
use crate::errors::{AbsenceTrackerError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 测试用的内存 SQLite 存储（单连接，已运行迁移）
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AbsenceTrackerError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        // 内存库随连接销毁，必须保持唯一连接常驻
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| AbsenceTrackerError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AbsenceTrackerError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| {
                AbsenceTrackerError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| AbsenceTrackerError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AbsenceTrackerError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    absences::{
        entities::{Absence, Session},
        requests::NewAbsence,
        responses::{AbsenceListItem, StudentAbsenceItem},
    },
    assignments::{entities::Assignment, requests::NewAssignment},
    classes::{
        entities::Class,
        requests::{CreateClassRequest, UpdateClassRequest},
        responses::ClassDetailResponse,
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, UpdateStudentRequest},
        responses::StudentResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
        responses::{SubjectDetailResponse, TeacherSubjectItem},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, UpdateTeacherRequest},
        responses::{TeacherAbsenceItem, TeacherClassItem, TeacherSubjectGroup},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_detail(&self, id: i64) -> Result<Option<StudentResponse>> {
        self.get_student_detail_impl(id).await
    }

    async fn list_students(&self) -> Result<Vec<StudentResponse>> {
        self.list_students_impl().await
    }

    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>> {
        self.list_students_by_ids_impl(ids).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        expected_version: i32,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update, expected_version).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn move_students_to_class(&self, class_id: i64, student_ids: &[i64]) -> Result<u64> {
        self.move_students_to_class_impl(class_id, student_ids).await
    }

    async fn count_students(&self) -> Result<u64> {
        self.count_students_impl().await
    }

    // 教师模块
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn find_teacher_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Teacher>> {
        self.find_teacher_by_name_impl(first_name, last_name).await
    }

    async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.list_teachers_impl().await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
        expected_version: i32,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update, expected_version).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    async fn count_teachers(&self) -> Result<u64> {
        self.count_teachers_impl().await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(id).await
    }

    async fn get_class_detail(&self, id: i64) -> Result<Option<ClassDetailResponse>> {
        self.get_class_detail_impl(id).await
    }

    async fn list_classes(&self) -> Result<Vec<Class>> {
        self.list_classes_impl().await
    }

    async fn update_class(
        &self,
        id: i64,
        update: UpdateClassRequest,
        expected_version: i32,
    ) -> Result<Option<Class>> {
        self.update_class_impl(id, update, expected_version).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    async fn count_classes(&self) -> Result<u64> {
        self.count_classes_impl().await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_detail(&self, id: i64) -> Result<Option<SubjectDetailResponse>> {
        self.get_subject_detail_impl(id).await
    }

    async fn list_subjects(&self) -> Result<Vec<SubjectDetailResponse>> {
        self.list_subjects_impl().await
    }

    async fn list_subjects_by_teacher(&self, teacher_id: i64) -> Result<Vec<TeacherSubjectItem>> {
        self.list_subjects_by_teacher_impl(teacher_id).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
        expected_version: i32,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update, expected_version).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn count_subjects(&self) -> Result<u64> {
        self.count_subjects_impl().await
    }

    // 任课分配模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn find_assignment(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<Assignment>> {
        self.find_assignment_impl(teacher_id, subject_id, class_id)
            .await
    }

    async fn subject_owned_by(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<bool> {
        self.subject_owned_by_impl(teacher_id, subject_id, class_id)
            .await
    }

    async fn teacher_has_class_access(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        self.teacher_has_class_access_impl(teacher_id, class_id)
            .await
    }

    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<TeacherClassItem>> {
        self.list_teacher_classes_impl(teacher_id).await
    }

    async fn list_teacher_subject_groups(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherSubjectGroup>> {
        self.list_teacher_subject_groups_impl(teacher_id).await
    }

    // 缺勤模块
    async fn create_absence(&self, absence: NewAbsence) -> Result<Absence> {
        self.create_absence_impl(absence).await
    }

    async fn record_absences(&self, absences: Vec<NewAbsence>, dedupe: bool) -> Result<u64> {
        self.record_absences_impl(absences, dedupe).await
    }

    async fn get_absence_by_id(&self, id: i64) -> Result<Option<Absence>> {
        self.get_absence_by_id_impl(id).await
    }

    async fn list_absences(&self) -> Result<Vec<AbsenceListItem>> {
        self.list_absences_impl().await
    }

    async fn list_student_absences(&self, student_id: i64) -> Result<Vec<StudentAbsenceItem>> {
        self.list_student_absences_impl(student_id).await
    }

    async fn list_teacher_absences(&self, teacher_id: i64) -> Result<Vec<TeacherAbsenceItem>> {
        self.list_teacher_absences_impl(teacher_id).await
    }

    async fn list_absent_student_ids(
        &self,
        class_id: i64,
        subject_id: i64,
        date: i64,
        session: Session,
    ) -> Result<Vec<i64>> {
        self.list_absent_student_ids_impl(class_id, subject_id, date, session)
            .await
    }

    async fn update_absence_justification(
        &self,
        id: i64,
        is_justified: bool,
        justification_note: Option<String>,
        expected_version: i32,
    ) -> Result<Option<Absence>> {
        self.update_absence_justification_impl(
            id,
            is_justified,
            justification_note,
            expected_version,
        )
        .await
    }

    async fn delete_absence(&self, id: i64) -> Result<bool> {
        self.delete_absence_impl(id).await
    }

    async fn count_absences(&self) -> Result<u64> {
        self.count_absences_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::date_to_timestamp;

    async fn seed(storage: &SeaOrmStorage) -> (Teacher, Class, Subject, Student) {
        let teacher = storage
            .create_teacher(CreateTeacherRequest {
                first_name: "Marie".into(),
                last_name: "Curie".into(),
            })
            .await
            .unwrap();
        let class = storage
            .create_class(CreateClassRequest {
                name: "3A".into(),
                description: None,
            })
            .await
            .unwrap();
        let subject = storage
            .create_subject(CreateSubjectRequest {
                name: "Physics".into(),
                teacher_id: teacher.id,
                class_id: class.id,
            })
            .await
            .unwrap();
        let student = storage
            .create_student(CreateStudentRequest {
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                class_id: Some(class.id),
            })
            .await
            .unwrap();
        (teacher, class, subject, student)
    }

    fn mark(student_id: i64, assignment_id: i64) -> NewAbsence {
        NewAbsence {
            date: date_to_timestamp(chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            session: Session::Morning,
            student_id,
            teacher_subject_class_id: assignment_id,
            is_justified: false,
            justification_note: None,
        }
    }

    #[actix_web::test]
    async fn test_update_with_stale_version_conflicts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (_, class, _, _) = seed(&storage).await;

        let update = |name: &str| UpdateClassRequest {
            id: None,
            name: name.into(),
            description: None,
            version: None,
        };

        let updated = storage
            .update_class(class.id, update("3B"), 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.name, "3B");

        let err = storage
            .update_class(class.id, update("3C"), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");

        storage.delete_class(class.id).await.unwrap();
        let missing = storage.update_class(class.id, update("3D"), 2).await.unwrap();
        assert!(missing.is_none());
    }

    #[actix_web::test]
    async fn test_record_absences_dedupe() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (teacher, class, subject, student) = seed(&storage).await;
        let assignment = storage
            .create_assignment(NewAssignment {
                teacher_id: teacher.id,
                subject_id: subject.id,
                class_id: class.id,
                academic_period: "2024".into(),
            })
            .await
            .unwrap();

        let first = storage
            .record_absences(vec![mark(student.id, assignment.id)], false)
            .await
            .unwrap();
        let second = storage
            .record_absences(vec![mark(student.id, assignment.id)], false)
            .await
            .unwrap();
        assert_eq!((first, second), (1, 1));
        assert_eq!(storage.count_absences().await.unwrap(), 2);

        let deduped = storage
            .record_absences(
                vec![mark(student.id, assignment.id), mark(student.id, assignment.id)],
                true,
            )
            .await
            .unwrap();
        assert_eq!(deduped, 0);
        assert_eq!(storage.count_absences().await.unwrap(), 2);
    }

    #[actix_web::test]
    async fn test_deleting_class_detaches_students_and_cascades() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (teacher, class, subject, student) = seed(&storage).await;
        storage
            .create_assignment(NewAssignment {
                teacher_id: teacher.id,
                subject_id: subject.id,
                class_id: class.id,
                academic_period: "2024".into(),
            })
            .await
            .unwrap();

        assert!(storage.delete_class(class.id).await.unwrap());

        let student = storage.get_student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(student.class_id, None);
        assert!(storage.get_subject_by_id(subject.id).await.unwrap().is_none());
        assert!(storage.list_teacher_classes(teacher.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_teacher_subject_groups_and_names() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (teacher, class, subject, _) = seed(&storage).await;
        let other_class = storage
            .create_class(CreateClassRequest {
                name: "4A".into(),
                description: None,
            })
            .await
            .unwrap();
        for class_id in [class.id, other_class.id, class.id] {
            storage
                .create_assignment(NewAssignment {
                    teacher_id: teacher.id,
                    subject_id: subject.id,
                    class_id,
                    academic_period: "2024".into(),
                })
                .await
                .unwrap();
        }

        let groups = storage.list_teacher_subject_groups(teacher.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].subject_name, "Physics");
        assert_eq!(groups[0].classes.len(), 2);

        let found = storage.find_teacher_by_name("MARIE", "curie").await.unwrap();
        assert_eq!(found.map(|t| t.id), Some(teacher.id));
        assert!(storage.teacher_has_class_access(teacher.id, other_class.id).await.unwrap());
        assert!(
            storage
                .subject_owned_by(teacher.id, subject.id, class.id)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .subject_owned_by(teacher.id, subject.id, other_class.id)
                .await
                .unwrap()
        );
    }

    #[actix_web::test]
    async fn test_move_students_ignores_unknown_ids() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (_, _, _, student) = seed(&storage).await;
        let target = storage
            .create_class(CreateClassRequest {
                name: "5C".into(),
                description: Some("annex".into()),
            })
            .await
            .unwrap();

        let moved = storage
            .move_students_to_class(target.id, &[student.id, 9_999])
            .await
            .unwrap();
        assert_eq!(moved, 1);

        let student = storage.get_student_by_id(student.id).await.unwrap().unwrap();
        assert_eq!(student.class_id, Some(target.id));
        assert_eq!(student.version, 2);
    }
}
