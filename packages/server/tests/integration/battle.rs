use crate::common::{TestApp, routes};
use serde_json::json;

mod entering {
    use super::*;

    #[tokio::test]
    async fn participants_see_the_battle_problem_and_samples() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        for user_id in [1, 2] {
            let res = app
                .get_with_token(&routes::battle(&battle_id), &app.token(user_id))
                .await;

            assert_eq!(res.status, 200, "{}", res.text);
            let battle = &res.body["battle"];
            assert_eq!(battle["id"], battle_id);
            assert_eq!(battle["user_a_id"], 1);
            assert_eq!(battle["user_b_id"], 2);
            assert_eq!(battle["status"], "live");
            assert_eq!(battle["problem_id"], app.problem_id);
            assert!(battle["ended_at"].is_null());

            assert_eq!(res.body["problem"]["id"], app.problem_id);
            assert_eq!(res.body["problem"]["title"], "Sum of Two");
            assert_eq!(res.body["problem"]["difficulty"], "easy");

            let samples = res.body["samples"].as_array().unwrap();
            assert_eq!(samples.len(), 2);
            assert_eq!(samples[0]["input"], "2 2");
            assert_eq!(samples[0]["expected_output"], "4");
            assert_eq!(samples[1]["input"], "3 3");
            assert_eq!(samples[1]["expected_output"], "5");
        }
    }

    #[tokio::test]
    async fn outsiders_get_not_found() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let res = app
            .get_with_token(&routes::battle(&battle_id), &app.token(3))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_battle_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_token(&routes::battle("missing"), &app.token(1))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod completing {
    use super::*;

    #[tokio::test]
    async fn completed_battle_is_already_done() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;
        let operator = app.operator_token();

        let res = app
            .post_with_token(
                &routes::battle_complete(&battle_id),
                &json!({"winner_id": 2}),
                &operator,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "done");
        assert_eq!(res.body["winner_id"], 2);
        assert!(res.body["ended_at"].is_string());

        let enter = app
            .get_with_token(&routes::battle(&battle_id), &app.token(1))
            .await;
        assert_eq!(enter.status, 409);
        assert_eq!(enter.body["code"], "ALREADY_DONE");

        let again = app
            .post_with_token(&routes::battle_complete(&battle_id), &json!({}), &operator)
            .await;
        assert_eq!(again.status, 409);
        assert_eq!(again.body["code"], "ALREADY_DONE");
    }

    #[tokio::test]
    async fn battle_can_end_without_a_winner() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let res = app
            .post_with_token(
                &routes::battle_complete(&battle_id),
                &json!({}),
                &app.operator_token(),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["winner_id"].is_null());
    }

    #[tokio::test]
    async fn winner_must_be_a_participant() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let res = app
            .post_with_token(
                &routes::battle_complete(&battle_id),
                &json!({"winner_id": 3}),
                &app.operator_token(),
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        // Still live.
        let enter = app
            .get_with_token(&routes::battle(&battle_id), &app.token(1))
            .await;
        assert_eq!(enter.status, 200);
    }

    #[tokio::test]
    async fn players_cannot_complete_battles() {
        let app = TestApp::spawn().await;
        let battle_id = app.create_battle(1, 2).await;

        let res = app
            .post_with_token(
                &routes::battle_complete(&battle_id),
                &json!({"winner_id": 1}),
                &app.token(1),
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn completing_unknown_battle_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(
                &routes::battle_complete("missing"),
                &json!({}),
                &app.operator_token(),
            )
            .await;

        assert_eq!(res.status, 404);
    }
}
