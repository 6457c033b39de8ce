use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 更新操作统一使用乐观锁：`expected_version` 不匹配时返回 Conflict 错误，
/// 行不存在时返回 `Ok(None)`。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 学生管理方法
    // 创建学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    // 通过ID获取学生
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 通过ID获取学生及其班级
    async fn get_student_detail(&self, id: i64) -> Result<Option<StudentResponse>>;
    // 列出全部学生（附带班级）
    async fn list_students(&self) -> Result<Vec<StudentResponse>>;
    // 按ID批量获取学生
    async fn list_students_by_ids(&self, ids: &[i64]) -> Result<Vec<Student>>;
    // 列出班级内的学生
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    // 更新学生
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
        expected_version: i32,
    ) -> Result<Option<Student>>;
    // 删除学生
    async fn delete_student(&self, id: i64) -> Result<bool>;
    // 批量把学生移入班级，返回实际移动的人数
    async fn move_students_to_class(&self, class_id: i64, student_ids: &[i64]) -> Result<u64>;
    // 学生总数
    async fn count_students(&self) -> Result<u64>;

    /// 教师管理方法
    // 创建教师
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    // 通过ID获取教师
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    // 按名和姓查找教师（大小写不敏感）
    async fn find_teacher_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<Teacher>>;
    // 列出全部教师
    async fn list_teachers(&self) -> Result<Vec<Teacher>>;
    // 更新教师
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
        expected_version: i32,
    ) -> Result<Option<Teacher>>;
    // 删除教师
    async fn delete_teacher(&self, id: i64) -> Result<bool>;
    // 教师总数
    async fn count_teachers(&self) -> Result<u64>;

    /// 班级管理方法
    // 创建班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级
    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>>;
    // 获取班级详情（学生与任课分配）
    async fn get_class_detail(&self, id: i64) -> Result<Option<ClassDetailResponse>>;
    // 列出全部班级
    async fn list_classes(&self) -> Result<Vec<Class>>;
    // 更新班级
    async fn update_class(
        &self,
        id: i64,
        update: UpdateClassRequest,
        expected_version: i32,
    ) -> Result<Option<Class>>;
    // 删除班级
    async fn delete_class(&self, id: i64) -> Result<bool>;
    // 班级总数
    async fn count_classes(&self) -> Result<u64>;

    /// 科目管理方法
    // 创建科目
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    // 通过ID获取科目
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    // 获取科目详情（教师姓名与班级名称）
    async fn get_subject_detail(&self, id: i64) -> Result<Option<SubjectDetailResponse>>;
    // 列出全部科目
    async fn list_subjects(&self) -> Result<Vec<SubjectDetailResponse>>;
    // 列出教师名下的科目
    async fn list_subjects_by_teacher(&self, teacher_id: i64) -> Result<Vec<TeacherSubjectItem>>;
    // 更新科目
    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
        expected_version: i32,
    ) -> Result<Option<Subject>>;
    // 删除科目
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    // 科目总数
    async fn count_subjects(&self) -> Result<u64>;

    /// 任课分配与授权查询
    // 创建分配
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    // 通过ID获取分配
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 查找 (教师, 科目, 班级) 对应的分配
    async fn find_assignment(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Option<Assignment>>;
    // 科目是否属于该教师且位于该班级
    async fn subject_owned_by(
        &self,
        teacher_id: i64,
        subject_id: i64,
        class_id: i64,
    ) -> Result<bool>;
    // 教师在班级中是否拥有任一科目或分配
    async fn teacher_has_class_access(&self, teacher_id: i64, class_id: i64) -> Result<bool>;
    // 教师任课班级（扁平列表）
    async fn list_teacher_classes(&self, teacher_id: i64) -> Result<Vec<TeacherClassItem>>;
    // 教师任课科目（按科目分组）
    async fn list_teacher_subject_groups(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherSubjectGroup>>;

    /// 缺勤管理方法
    // 创建单条缺勤
    async fn create_absence(&self, absence: NewAbsence) -> Result<Absence>;
    // 在一个事务中批量写入缺勤，dedupe 为 true 时跳过已存在的记录，返回新增条数
    async fn record_absences(&self, absences: Vec<NewAbsence>, dedupe: bool) -> Result<u64>;
    // 通过ID获取缺勤
    async fn get_absence_by_id(&self, id: i64) -> Result<Option<Absence>>;
    // 列出全部缺勤（附带学生与科目）
    async fn list_absences(&self) -> Result<Vec<AbsenceListItem>>;
    // 列出学生的缺勤
    async fn list_student_absences(&self, student_id: i64) -> Result<Vec<StudentAbsenceItem>>;
    // 列出教师记录的缺勤
    async fn list_teacher_absences(&self, teacher_id: i64) -> Result<Vec<TeacherAbsenceItem>>;
    // 指定日期、时段、科目与班级下缺勤的学生ID
    async fn list_absent_student_ids(
        &self,
        class_id: i64,
        subject_id: i64,
        date: i64,
        session: Session,
    ) -> Result<Vec<i64>>;
    // 更新缺勤说明
    async fn update_absence_justification(
        &self,
        id: i64,
        is_justified: bool,
        justification_note: Option<String>,
        expected_version: i32,
    ) -> Result<Option<Absence>>;
    // 删除缺勤
    async fn delete_absence(&self, id: i64) -> Result<bool>;
    // 缺勤总数
    async fn count_absences(&self) -> Result<u64>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
