use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};

use super::*;
use crate::entity::{activity_logs, grades};
use crate::errors::GradebookError;
use crate::models::grades::entities::{GradeRecord, LedgerKey};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::users::entities::UserRole;
use crate::storage::sea_orm_storage::testing::{
    NewSubmission, file_db, insert_submission, insert_user, memory_db, seed_people,
};

fn engine(db: &DatabaseConnection) -> SeaOrmApprovalEngine {
    ApprovalEngine::new(
        db.clone(),
        SeaOrmSubmissionStore,
        SeaOrmGradeLedgerStore,
        Arc::new(ActivityLogNotifier::new(db.clone())),
        ApprovalPolicy::default(),
    )
}

async fn ledger_rows(db: &DatabaseConnection) -> u64 {
    grades::Entity::find().count(db).await.expect("count grades")
}

async fn submission(db: &DatabaseConnection, id: i64) -> GradeSubmission {
    SeaOrmSubmissionStore
        .get_by_id(db, id)
        .await
        .expect("load submission")
        .expect("submission exists")
}

#[tokio::test]
async fn test_approve_creates_then_updates_ledger_record() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);

    let first = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus I", 95.0),
    )
    .await;
    let receipt = engine
        .approve(first, seed.registrar_id, None)
        .await
        .expect("approve first");

    assert_eq!(receipt.record.grade, 95.0);
    assert_eq!(receipt.classification.letter, "A−");
    assert_eq!(receipt.submission.status, SubmissionStatus::Approved);
    assert_eq!(receipt.submission.reviewed_by, Some(seed.registrar_id));
    assert!(receipt.submission.reviewed_at.is_some());
    assert_eq!(ledger_rows(&db).await, 1);

    let second = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus I", 97.0),
    )
    .await;
    let receipt = engine
        .approve(second, seed.registrar_id, Some("corrected final exam".into()))
        .await
        .expect("approve second");

    assert_eq!(receipt.record.grade, 97.0);
    assert_eq!(ledger_rows(&db).await, 1);

    let stored = SeaOrmGradeLedgerStore
        .find_by_natural_key(
            &db,
            &LedgerKey::new(seed.student_id, "Calculus I", Some("1st Semester"), Some("2024-2025")),
        )
        .await
        .expect("find record")
        .expect("record exists");
    assert_eq!(stored.grade, 97.0);
    assert_eq!(
        submission(&db, second).await.registrar_comments.as_deref(),
        Some("corrected final exam")
    );
}

#[tokio::test]
async fn test_approve_blank_comments_are_not_stored() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Physics", 88.0),
    )
    .await;

    engine(&db)
        .approve(id, seed.registrar_id, Some("   ".into()))
        .await
        .expect("approve");

    assert_eq!(submission(&db, id).await.registrar_comments, None);
}

#[tokio::test]
async fn test_approve_twice_conflicts_without_ledger_change() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Chemistry", 81.0),
    )
    .await;

    let first = engine.approve(id, seed.registrar_id, None).await.expect("approve");
    let err = engine
        .approve(id, seed.registrar_id, None)
        .await
        .expect_err("second approval must fail");

    assert!(matches!(err, GradebookError::Conflict(_)));
    assert_eq!(ledger_rows(&db).await, 1);

    let records = SeaOrmGradeLedgerStore
        .list_by_student(&db, seed.student_id)
        .await
        .expect("list");
    assert_eq!(records[0].updated_at, first.record.updated_at);
}

#[tokio::test]
async fn test_approve_rejected_submission_conflicts() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "History", 70.0),
    )
    .await;

    engine
        .reject(id, seed.registrar_id, "attendance records missing")
        .await
        .expect("reject");
    let err = engine
        .approve(id, seed.registrar_id, None)
        .await
        .expect_err("rejected submission cannot be approved");

    assert!(matches!(err, GradebookError::Conflict(_)));
    assert_eq!(ledger_rows(&db).await, 0);
    assert_eq!(submission(&db, id).await.status, SubmissionStatus::Rejected);
}

#[tokio::test]
async fn test_missing_submission_is_not_found() {
    let db = memory_db().await;
    let engine = engine(&db);

    let err = engine.approve(999, 1, None).await.expect_err("approve");
    assert!(matches!(err, GradebookError::NotFound(_)));

    let err = engine
        .reject(999, 1, "insufficient documentation provided")
        .await
        .expect_err("reject");
    assert!(matches!(err, GradebookError::NotFound(_)));

    let err = engine.get_pending(999).await.expect_err("get");
    assert!(matches!(err, GradebookError::NotFound(_)));
}

const RACE_SUBJECTS: [&str; 5] = ["Calculus I", "Physics", "Biology", "History", "Economics"];

fn shared_engine(db: &DatabaseConnection) -> Arc<SeaOrmApprovalEngine> {
    Arc::new(engine(db))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_of_same_submission() {
    let file = file_db(4).await;
    let db = &file.db;
    let seed = seed_people(db).await;
    let other = insert_user(db, "registrar2", None, UserRole::Registrar).await;
    let engine = shared_engine(db);

    for (round, subject) in RACE_SUBJECTS.into_iter().enumerate() {
        let id = insert_submission(
            db,
            NewSubmission::new(seed.student_id, seed.faculty_id, subject, 92.0),
        )
        .await;

        let a = tokio::spawn({
            let engine = engine.clone();
            let reviewer = seed.registrar_id;
            async move { engine.approve(id, reviewer, None).await }
        });
        let b = tokio::spawn({
            let engine = engine.clone();
            async move { engine.approve(id, other, None).await }
        });

        let outcomes = [a.await.expect("join a"), b.await.expect("join b")];
        let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
        let conflicted = outcomes
            .iter()
            .filter(|r| matches!(r, Err(GradebookError::Conflict(_))))
            .count();

        assert_eq!(succeeded, 1, "round {round}: {outcomes:?}");
        assert_eq!(conflicted, 1, "round {round}: {outcomes:?}");
        assert_eq!(submission(db, id).await.status, SubmissionStatus::Approved);
    }

    assert_eq!(ledger_rows(db).await, RACE_SUBJECTS.len() as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approve_and_reject_of_same_submission() {
    let file = file_db(4).await;
    let db = &file.db;
    let seed = seed_people(db).await;
    let other = insert_user(db, "registrar2", None, UserRole::Registrar).await;
    let engine = shared_engine(db);
    let id = insert_submission(
        db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Chemistry", 81.0),
    )
    .await;

    let approve = tokio::spawn({
        let engine = engine.clone();
        let reviewer = seed.registrar_id;
        async move { engine.approve(id, reviewer, None).await }
    });
    let reject = tokio::spawn({
        let engine = engine.clone();
        async move { engine.reject(id, other, "Lab marks missing").await }
    });

    let approved = approve.await.expect("join approve");
    let rejected = reject.await.expect("join reject");
    let stored = submission(db, id).await;

    match (&approved, &rejected) {
        (Ok(_), Err(GradebookError::Conflict(_))) => {
            assert_eq!(stored.status, SubmissionStatus::Approved);
            assert_eq!(ledger_rows(db).await, 1);
        }
        (Err(GradebookError::Conflict(_)), Ok(_)) => {
            assert_eq!(stored.status, SubmissionStatus::Rejected);
            assert_eq!(ledger_rows(db).await, 0);
        }
        other => panic!("expected one success and one conflict, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_share_one_ledger_row() {
    let file = file_db(4).await;
    let db = &file.db;
    let seed = seed_people(db).await;
    let engine = shared_engine(db);

    for subject in RACE_SUBJECTS {
        let first = insert_submission(
            db,
            NewSubmission::new(seed.student_id, seed.faculty_id, subject, 85.0),
        )
        .await;
        let second = insert_submission(
            db,
            NewSubmission::new(seed.student_id, seed.faculty_id, subject, 90.0),
        )
        .await;

        let a = tokio::spawn({
            let engine = engine.clone();
            let reviewer = seed.registrar_id;
            async move { engine.approve(first, reviewer, None).await }
        });
        let b = tokio::spawn({
            let engine = engine.clone();
            let reviewer = seed.registrar_id;
            async move { engine.approve(second, reviewer, None).await }
        });

        a.await.expect("join a").expect("first approval");
        b.await.expect("join b").expect("second approval");
    }

    assert_eq!(ledger_rows(db).await, RACE_SUBJECTS.len() as u64);
    let records = SeaOrmGradeLedgerStore
        .list_by_student(db, seed.student_id)
        .await
        .expect("list");
    assert_eq!(records.len(), RACE_SUBJECTS.len());
    assert!(
        records
            .iter()
            .all(|r| r.grade == 85.0 || r.grade == 90.0)
    );
}

#[tokio::test]
async fn test_missing_term_shares_ledger_key() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);

    for grade in [78.0, 83.0] {
        let id = insert_submission(
            &db,
            NewSubmission::new(seed.student_id, seed.faculty_id, "PE", grade).term(None, None),
        )
        .await;
        engine.approve(id, seed.registrar_id, None).await.expect("approve");
    }

    let records = SeaOrmGradeLedgerStore
        .list_by_student(&db, seed.student_id)
        .await
        .expect("list");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].grade, 83.0);
    assert_eq!(records[0].semester, None);
    assert_eq!(records[0].school_year, None);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Algebra", 65.0),
    )
    .await;

    for reason in ["", "   ", "too short"] {
        let err = engine
            .reject(id, seed.registrar_id, reason)
            .await
            .expect_err("invalid reason");
        assert!(matches!(err, GradebookError::Validation(_)), "reason {reason:?}");
    }

    assert_eq!(submission(&db, id).await.status, SubmissionStatus::Pending);
}

#[tokio::test]
async fn test_reject_stores_reason_and_leaves_ledger_untouched() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Algebra", 65.0),
    )
    .await;

    let rejected = engine
        .reject(id, seed.registrar_id, "insufficient documentation provided")
        .await
        .expect("reject");

    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    let stored = submission(&db, id).await;
    assert_eq!(stored.status, SubmissionStatus::Rejected);
    assert_eq!(
        stored.registrar_comments.as_deref(),
        Some("insufficient documentation provided")
    );
    assert_eq!(stored.reviewed_by, Some(seed.registrar_id));
    assert!(stored.reviewed_at.is_some());
    assert_eq!(ledger_rows(&db).await, 0);

    let err = engine
        .reject(id, seed.registrar_id, "insufficient documentation provided")
        .await
        .expect_err("already rejected");
    assert!(matches!(err, GradebookError::Conflict(_)));
}

/// 台账写入总是失败的存储
struct FailingLedgerStore;

#[async_trait]
impl GradeLedgerStore for FailingLedgerStore {
    async fn find_by_natural_key<C: ConnectionTrait>(
        &self,
        conn: &C,
        key: &LedgerKey,
    ) -> crate::errors::Result<Option<GradeRecord>> {
        SeaOrmGradeLedgerStore.find_by_natural_key(conn, key).await
    }

    async fn upsert<C: ConnectionTrait>(
        &self,
        _conn: &C,
        _key: &LedgerKey,
        _grade: f64,
        _now: DateTime<Utc>,
    ) -> crate::errors::Result<GradeRecord> {
        Err(GradebookError::database_operation("ledger unavailable"))
    }

    async fn list_by_student<C: ConnectionTrait>(
        &self,
        conn: &C,
        student_id: i64,
    ) -> crate::errors::Result<Vec<GradeRecord>> {
        SeaOrmGradeLedgerStore.list_by_student(conn, student_id).await
    }
}

#[tokio::test]
async fn test_ledger_failure_rolls_back_status_update() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = ApprovalEngine::new(
        db.clone(),
        SeaOrmSubmissionStore,
        FailingLedgerStore,
        Arc::new(TracingAuditNotifier),
        ApprovalPolicy::default(),
    );
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Statistics", 91.0),
    )
    .await;

    let err = engine
        .approve(id, seed.registrar_id, None)
        .await
        .expect_err("ledger failure");

    assert!(matches!(err, GradebookError::DatabaseOperation(_)));
    assert_eq!(ledger_rows(&db).await, 0);

    let stored = submission(&db, id).await;
    assert_eq!(stored.status, SubmissionStatus::Pending);
    assert_eq!(stored.reviewed_by, None);
    assert_eq!(stored.reviewed_at, None);

    // 回滚后仍可正常审核
    engine
        .approve(id, seed.registrar_id, None)
        .await
        .expect_err("ledger still failing");
    engine
        .reject(id, seed.registrar_id, "Grade needs recheck")
        .await
        .expect("reject after rollback");
}

struct FailingNotifier;

#[async_trait]
impl AuditNotifier for FailingNotifier {
    async fn notify(&self, _event: &AuditEvent) -> crate::errors::Result<()> {
        Err(GradebookError::database_operation("activity log unavailable"))
    }
}

#[tokio::test]
async fn test_audit_failure_keeps_approval() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = ApprovalEngine::new(
        db.clone(),
        SeaOrmSubmissionStore,
        SeaOrmGradeLedgerStore,
        Arc::new(FailingNotifier),
        ApprovalPolicy::default(),
    );
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Economics", 77.0),
    )
    .await;

    engine
        .approve(id, seed.registrar_id, None)
        .await
        .expect("approval survives audit failure");

    assert_eq!(submission(&db, id).await.status, SubmissionStatus::Approved);
    assert_eq!(ledger_rows(&db).await, 1);
}

#[tokio::test]
async fn test_review_writes_activity_log() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let approved = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Art", 93.0),
    )
    .await;
    let rejected = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Music", 60.0),
    )
    .await;

    engine.approve(approved, seed.registrar_id, None).await.expect("approve");
    engine
        .reject(rejected, seed.registrar_id, "grade sheet not signed")
        .await
        .expect("reject");

    let logs = activity_logs::Entity::find().all(&db).await.expect("logs");
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| l.actor_id == seed.registrar_id));
    assert!(logs.iter().any(|l| l.event_type == "grade_submission_approved"));
    assert!(logs.iter().any(|l| l.event_type == "grade_submission_rejected"));
}

#[tokio::test]
async fn test_stats_overdue_boundary() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();

    let at = |offset: Duration| {
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus I", 90.0)
            .submitted_at(now - offset)
    };
    insert_submission(&db, at(Duration::days(3))).await;
    insert_submission(&db, at(Duration::days(3) + Duration::seconds(1))).await;
    insert_submission(&db, at(Duration::hours(2))).await;
    insert_submission(&db, at(Duration::hours(13))).await;
    let reviewed = insert_submission(&db, at(Duration::hours(1))).await;
    engine.approve(reviewed, seed.registrar_id, None).await.expect("approve");

    let stats = engine.stats_at(now).await.expect("stats");

    assert_eq!(stats.total_pending, 4);
    assert_eq!(stats.today_submissions, 1);
    assert_eq!(stats.overdue_count, 1);
}

#[tokio::test]
async fn test_list_pending_filters_and_order() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let other_student = insert_user(&db, "asantos", Some("Ana Santos"), UserRole::Student).await;
    let other_faculty = insert_user(&db, "jlim", None, UserRole::Faculty).await;
    let engine = engine(&db);
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

    let newest = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus I", 90.0)
            .submitted_at(base + Duration::hours(2)),
    )
    .await;
    let oldest = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus II", 80.0)
            .submitted_at(base),
    )
    .await;
    let santos = insert_submission(
        &db,
        NewSubmission::new(other_student, other_faculty, "Physics", 70.0)
            .submitted_at(base + Duration::hours(1))
            .term(Some("2nd Semester"), Some("2024-2025")),
    )
    .await;
    let done = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "History", 99.0),
    )
    .await;
    engine.approve(done, seed.registrar_id, None).await.expect("approve");

    let all = engine
        .list_pending(PendingSubmissionQuery::default())
        .await
        .expect("list");
    let ids: Vec<i64> = all.items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![oldest, santos, newest]);
    assert_eq!(all.pagination.total, 3);
    assert_eq!(all.items[0].student.username, "jdelacruz");
    assert_eq!(all.items[0].classification.letter, "C");

    let by_subject = engine
        .list_pending(PendingSubmissionQuery {
            subject: Some("calculus".into()),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(by_subject.items.len(), 2);

    let by_faculty = engine
        .list_pending(PendingSubmissionQuery {
            faculty_id: Some(other_faculty),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(by_faculty.items.len(), 1);
    assert_eq!(by_faculty.items[0].id, santos);

    let by_semester = engine
        .list_pending(PendingSubmissionQuery {
            semester: Some("2nd Semester".into()),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(by_semester.items.len(), 1);

    let by_student = engine
        .list_pending(PendingSubmissionQuery {
            student: Some("Santos".into()),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(by_student.items.len(), 1);
    assert_eq!(by_student.items[0].student.id, other_student);

    let page_two = engine
        .list_pending(PendingSubmissionQuery {
            page: Some(2),
            size: Some(2),
            ..Default::default()
        })
        .await
        .expect("list");
    assert_eq!(page_two.items.len(), 1);
    assert_eq!(page_two.items[0].id, newest);
    assert_eq!(page_two.pagination.total_pages, 2);
    assert!(page_two.pagination.has_prev);
    assert!(!page_two.pagination.has_next);
}

#[tokio::test]
async fn test_student_grades_include_classification() {
    let db = memory_db().await;
    let seed = seed_people(&db).await;
    let engine = engine(&db);
    let id = insert_submission(
        &db,
        NewSubmission::new(seed.student_id, seed.faculty_id, "Calculus I", 74.5),
    )
    .await;
    engine.approve(id, seed.registrar_id, None).await.expect("approve");

    let grades = engine.student_grades(seed.student_id).await.expect("grades");
    assert_eq!(grades.student_id, seed.student_id);
    assert_eq!(grades.items.len(), 1);
    assert_eq!(grades.items[0].classification.letter, "D");
    assert_eq!(grades.items[0].classification.rating, "Conditional");

    let empty = engine.student_grades(seed.faculty_id).await.expect("grades");
    assert!(empty.items.is_empty());
}
