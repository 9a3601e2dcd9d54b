//! 测试辅助：内存或文件 SQLite 与数据准备
//!
//! 提交记录由教师侧功能创建，不属于本服务的对外操作，测试中直接写表。

use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};

use crate::config::DatabaseConfig;
use crate::entity::{grade_submissions, users};
use crate::storage::SeaOrmStorage;
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::UserRole;

/// 单连接的内存数据库，已执行迁移
pub(crate) async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("connect in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// 走生产连接路径的文件数据库（WAL、忙等待、多连接池），目录随值一起删除
pub(crate) struct FileDb {
    pub db: DatabaseConnection,
    _dir: tempfile::TempDir,
}

pub(crate) async fn file_db(pool_size: u32) -> FileDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = DatabaseConfig {
        url: dir.path().join("gradebook.db").to_string_lossy().into_owned(),
        pool_size,
        timeout: 30,
    };
    let storage = SeaOrmStorage::new_async(&config)
        .await
        .expect("open file database");

    FileDb {
        db: storage.connection().clone(),
        _dir: dir,
    }
}

pub(crate) async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    full_name: Option<&str>,
    role: UserRole,
) -> i64 {
    let now = Utc::now().timestamp();
    users::ActiveModel {
        username: Set(username.to_string()),
        full_name: Set(full_name.map(str::to_string)),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert user")
    .id
}

/// 待插入的提交
pub(crate) struct NewSubmission {
    pub student_id: i64,
    pub faculty_id: i64,
    pub subject: &'static str,
    pub grade: f64,
    pub semester: Option<&'static str>,
    pub school_year: Option<&'static str>,
    pub submitted_at: DateTime<Utc>,
}

impl NewSubmission {
    pub(crate) fn new(student_id: i64, faculty_id: i64, subject: &'static str, grade: f64) -> Self {
        Self {
            student_id,
            faculty_id,
            subject,
            grade,
            semester: Some("1st Semester"),
            school_year: Some("2024-2025"),
            submitted_at: Utc::now(),
        }
    }

    pub(crate) fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = at;
        self
    }

    pub(crate) fn term(mut self, semester: Option<&'static str>, year: Option<&'static str>) -> Self {
        self.semester = semester;
        self.school_year = year;
        self
    }
}

pub(crate) async fn insert_submission(db: &DatabaseConnection, new: NewSubmission) -> i64 {
    grade_submissions::ActiveModel {
        student_id: Set(new.student_id),
        faculty_id: Set(new.faculty_id),
        subject: Set(new.subject.to_string()),
        grade: Set(new.grade),
        semester: Set(new.semester.map(str::to_string)),
        school_year: Set(new.school_year.map(str::to_string)),
        remarks: Set(None),
        status: Set(SubmissionStatus::PENDING.to_string()),
        submitted_at: Set(new.submitted_at.timestamp()),
        reviewed_at: Set(None),
        reviewed_by: Set(None),
        registrar_comments: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert submission")
    .id
}

/// 常用的初始数据：一名学生、一名教师、一名审核员
pub(crate) struct Seed {
    pub student_id: i64,
    pub faculty_id: i64,
    pub registrar_id: i64,
}

pub(crate) async fn seed_people(db: &DatabaseConnection) -> Seed {
    Seed {
        student_id: insert_user(db, "jdelacruz", Some("Juan Dela Cruz"), UserRole::Student).await,
        faculty_id: insert_user(db, "mreyes", Some("Maria Reyes"), UserRole::Faculty).await,
        registrar_id: insert_user(db, "registrar", None, UserRole::Registrar).await,
    }
}
