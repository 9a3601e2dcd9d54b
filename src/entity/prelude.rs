//! 预导入模块，方便使用

pub use super::activity_logs::{
    ActiveModel as ActivityLogActiveModel, Entity as ActivityLogs, Model as ActivityLogModel,
};
pub use super::grade_submissions::{
    ActiveModel as GradeSubmissionActiveModel, Entity as GradeSubmissions,
    Model as GradeSubmissionModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
