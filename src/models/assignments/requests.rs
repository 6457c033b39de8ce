// 存储层使用的分配创建参数
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub teacher_id: i64,
    pub subject_id: i64,
    pub class_id: i64,
    pub academic_period: String,
}
