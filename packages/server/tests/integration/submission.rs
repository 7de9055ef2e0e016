use arena_server::consumers::apply_judge_result;
use arena_server::entity::submission;
use arena_server::judging::stuck::{
    STUCK_MESSAGE, finalize_stuck_submissions, redispatch_stranded_submissions,
};
use arena_server::judging::{PREPARE_FAILED_MESSAGE, dispatch_submission};
use chrono::{Duration, Utc};
use common::judge_result::{JudgeResult, VerdictResult};
use common::{SubmissionStatus, Verdict};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use serde_json::json;

use crate::common::{TestApp, routes};

fn battle_submission(battle_id: &str, code: &str) -> serde_json::Value {
    json!({"battle_id": battle_id, "language": "python", "code": code})
}

mod judging {
    use super::*;

    #[tokio::test]
    async fn wrong_answer_reports_second_sample() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let id = app.submit(1, battle_submission(&battle_id, "print(4)")).await;
        let result = app.wait_for_verdict(1, id).await;

        assert_eq!(result["verdict"], "WA");
        assert_eq!(result["failing_sample"], 2);
        assert_eq!(result["stdout"], "4");
        assert_eq!(result["message"], "Wrong answer on sample 2");
        assert_eq!(result["battle_id"], battle_id);
        assert_eq!(result["exec_time_ms"], 12);
        assert_eq!(result["memory_kb"], 2048);
        assert!(result["judged_at"].is_string());
    }

    #[tokio::test]
    async fn compile_error_wins_over_output() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let id = app
            .submit(2, battle_submission(&battle_id, "print(4) // syntax error"))
            .await;
        let result = app.wait_for_verdict(2, id).await;

        assert_eq!(result["verdict"], "CE");
        assert_eq!(result["failing_sample"], 1);
        assert!(
            result["compile_output"]
                .as_str()
                .unwrap()
                .contains("expected ';'")
        );
    }

    #[tokio::test]
    async fn matching_output_is_accepted() {
        let app = TestApp::spawn().await;
        let echo = app
            .add_problem("Echo", &[("ping", "ping"), ("pong\n", "pong")])
            .await;

        let id = app
            .submit(
                1,
                json!({"problem_id": echo, "language": "python", "code": "cat"}),
            )
            .await;
        let result = app.wait_for_verdict(1, id).await;

        assert_eq!(result["verdict"], "AC");
        assert!(result["failing_sample"].is_null());
        assert!(result["battle_id"].is_null());
    }

    #[tokio::test]
    async fn stderr_is_a_runtime_error_on_first_sample() {
        let app = TestApp::spawn().await;

        let id = app
            .submit(
                1,
                json!({"problem_id": app.problem_id, "language": "python", "code": "crash"}),
            )
            .await;
        let result = app.wait_for_verdict(1, id).await;

        assert_eq!(result["verdict"], "RE");
        assert_eq!(result["failing_sample"], 1);
        assert_eq!(result["stderr"], "Traceback: boom");
    }

    #[tokio::test]
    async fn sandbox_rejection_is_internal_error() {
        let app = TestApp::spawn().await;

        let id = app
            .submit(
                1,
                json!({"problem_id": app.problem_id, "language": "python", "code": "unavailable"}),
            )
            .await;
        let result = app.wait_for_verdict(1, id).await;

        assert_eq!(result["verdict"], "IE");
        assert!(result["failing_sample"].is_null());
    }
}

mod intake {
    use super::*;

    #[tokio::test]
    async fn accepted_submission_starts_queued() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({"problem_id": app.problem_id, "language": "python", "code": "print(4)"}),
                &app.token(1),
            )
            .await;

        assert_eq!(res.status, 202, "{}", res.text);
        assert_eq!(res.body["status"], "queued");
        assert_eq!(res.body["user_id"], 1);
        assert!(res.body["verdict"].is_null());
    }

    #[tokio::test]
    async fn outsiders_cannot_submit_to_a_battle() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &battle_submission(&battle_id, "print(4)"),
                &app.token(3),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn ended_battle_rejects_submissions() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;
        app.post_with_token(
            &routes::battle_complete(&battle_id),
            &json!({}),
            &app.operator_token(),
        )
        .await;

        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &battle_submission(&battle_id, "print(4)"),
                &app.token(1),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "ALREADY_DONE");
    }

    #[tokio::test]
    async fn exactly_one_target_is_required() {
        let app = TestApp::spawn().await;

        let neither = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({"language": "python", "code": "print(4)"}),
                &app.token(1),
            )
            .await;
        assert_eq!(neither.status, 400);

        let both = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({"battle_id": "b", "problem_id": app.problem_id, "language": "python", "code": "print(4)"}),
                &app.token(1),
            )
            .await;
        assert_eq!(both.status, 400);
        assert_eq!(both.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn empty_code_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({"problem_id": app.problem_id, "language": "python", "code": "   "}),
                &app.token(1),
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_problem_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                routes::SUBMISSIONS,
                &json!({"problem_id": 9999, "language": "python", "code": "print(4)"}),
                &app.token(1),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn submissions_are_private() {
        let app = TestApp::spawn().await;
        let id = app
            .submit(
                1,
                json!({"problem_id": app.problem_id, "language": "python", "code": "print(4)"}),
            )
            .await;

        let other = app
            .get_with_token(&routes::submission(id), &app.token(2))
            .await;
        assert_eq!(other.status, 404);

        let operator = app
            .get_with_token(&routes::submission(id), &app.operator_token())
            .await;
        assert_eq!(operator.status, 200);
    }
}

mod results {
    use super::*;

    async fn insert_submission(
        app: &TestApp,
        status: SubmissionStatus,
        age: Duration,
    ) -> submission::Model {
        let created_at = Utc::now() - age;
        submission::ActiveModel {
            user_id: Set(1),
            problem_id: Set(app.problem_id),
            language: Set("python".into()),
            code: Set("print(4)".into()),
            status: Set(status),
            created_at: Set(created_at),
            dispatched_at: Set((status == SubmissionStatus::Running).then_some(created_at)),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap()
    }

    async fn insert_pending(app: &TestApp, status: SubmissionStatus, age: Duration) -> i32 {
        insert_submission(app, status, age).await.id
    }

    async fn load(app: &TestApp, id: i32) -> submission::Model {
        submission::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap()
    }

    fn result_for(submission_id: i32, verdict: VerdictResult) -> JudgeResult {
        JudgeResult {
            job_id: "job-1".into(),
            submission_id,
            result: verdict,
        }
    }

    #[tokio::test]
    async fn stuck_running_submissions_become_internal_errors() {
        let app = TestApp::spawn().await;
        let running = insert_pending(&app, SubmissionStatus::Running, Duration::minutes(10)).await;
        let queued = insert_pending(&app, SubmissionStatus::Queued, Duration::minutes(10)).await;
        let fresh = insert_pending(&app, SubmissionStatus::Running, Duration::zero()).await;

        let finalized = finalize_stuck_submissions(&app.db, 300).await.unwrap();

        assert_eq!(finalized, 1);
        let sub = load(&app, running).await;
        assert_eq!(sub.status, SubmissionStatus::Done);
        assert_eq!(sub.verdict, Some(Verdict::InternalError));
        assert_eq!(sub.message.as_deref(), Some(STUCK_MESSAGE));
        assert!(sub.judged_at.is_some());

        // Never queued -> done.
        assert_eq!(load(&app, queued).await.status, SubmissionStatus::Queued);
        assert_eq!(load(&app, fresh).await.status, SubmissionStatus::Running);
    }

    #[tokio::test]
    async fn stranded_queued_submission_is_dispatched_again() {
        let app = TestApp::spawn().await;
        let stranded = insert_pending(&app, SubmissionStatus::Queued, Duration::minutes(10)).await;
        let fresh = insert_pending(&app, SubmissionStatus::Queued, Duration::zero()).await;

        let dispatched = redispatch_stranded_submissions(&app.state, 300).await.unwrap();

        assert_eq!(dispatched, 1);
        let result = app.wait_for_verdict(1, stranded).await;
        assert_eq!(result["verdict"], "WA");
        assert_eq!(result["failing_sample"], 2);
        assert!(load(&app, stranded).await.dispatched_at.is_some());
        assert_eq!(load(&app, fresh).await.status, SubmissionStatus::Queued);
    }

    #[tokio::test]
    async fn failed_job_preparation_is_finalized_from_running() {
        let app = TestApp::spawn().await;
        let model = insert_submission(&app, SubmissionStatus::Queued, Duration::zero()).await;
        app.db
            .execute_unprepared("DROP TABLE sample_case CASCADE")
            .await
            .unwrap();

        assert!(dispatch_submission(&app.state, &model).await.is_err());

        let sub = load(&app, model.id).await;
        assert_eq!(sub.status, SubmissionStatus::Done);
        assert_eq!(sub.verdict, Some(Verdict::InternalError));
        assert_eq!(sub.message.as_deref(), Some(PREPARE_FAILED_MESSAGE));
        assert!(sub.dispatched_at.is_some());
    }

    #[tokio::test]
    async fn late_result_after_timeout_is_ignored() {
        let app = TestApp::spawn().await;
        let id = insert_pending(&app, SubmissionStatus::Running, Duration::minutes(10)).await;
        finalize_stuck_submissions(&app.db, 300).await.unwrap();

        let applied = apply_judge_result(&app.db, result_for(id, VerdictResult::accepted()))
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(load(&app, id).await.verdict, Some(Verdict::InternalError));
    }

    #[tokio::test]
    async fn verdict_is_written_once() {
        let app = TestApp::spawn().await;
        let id = insert_pending(&app, SubmissionStatus::Running, Duration::zero()).await;

        let first = VerdictResult::failed_on(Verdict::WrongAnswer, 2);
        assert!(apply_judge_result(&app.db, result_for(id, first)).await.unwrap());
        assert!(
            !apply_judge_result(&app.db, result_for(id, VerdictResult::accepted()))
                .await
                .unwrap()
        );

        let sub = load(&app, id).await;
        assert_eq!(sub.verdict, Some(Verdict::WrongAnswer));
        assert_eq!(sub.failing_sample, Some(2));
    }

    #[tokio::test]
    async fn queued_submission_ignores_results() {
        let app = TestApp::spawn().await;
        let id = insert_pending(&app, SubmissionStatus::Queued, Duration::zero()).await;

        let applied = apply_judge_result(&app.db, result_for(id, VerdictResult::accepted()))
            .await
            .unwrap();

        assert!(!applied);
        assert_eq!(load(&app, id).await.status, SubmissionStatus::Queued);
    }
}
