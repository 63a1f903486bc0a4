use crate::helpers::spawn_app;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use foodgram_backend::schema::subscriptions;
use uuid::Uuid;

#[tokio::test]
async fn subscribe_then_unsubscribe_returns_to_the_prior_state() {
    let test_app = spawn_app().await;
    let author = test_app.store_additional_user().await;
    let path = format!("/api/users/{}/subscribe", author.user_id);

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(201, response.status().as_u16());

    let response = test_app
        .delete_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(204, response.status().as_u16());

    let response = test_app
        .delete_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn duplicate_subscribe_is_a_conflict_and_keeps_a_single_row() {
    let test_app = spawn_app().await;
    let author = test_app.store_additional_user().await;
    let path = format!("/api/users/{}/subscribe", author.user_id);

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(201, response.status().as_u16());

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(409, response.status().as_u16());

    let mut connection = test_app.connection().await;
    let count: i64 = subscriptions::table
        .filter(subscriptions::user_id.eq(test_app.test_user.user_id))
        .count()
        .get_result(&mut connection)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn self_subscription_always_fails_validation() {
    let test_app = spawn_app().await;

    let response = test_app
        .post_authed(
            &format!("/api/users/{}/subscribe", test_app.test_user.user_id),
            &test_app.test_user.token,
        )
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn subscribing_to_an_unknown_user_is_404() {
    let test_app = spawn_app().await;

    let response = test_app
        .post_authed(
            &format!("/api/users/{}/subscribe", Uuid::now_v7()),
            &test_app.test_user.token,
        )
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn subscriptions_list_carries_authors_with_their_recipes() {
    let test_app = spawn_app().await;
    let author = test_app.store_additional_user().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    test_app
        .create_recipe(&author.token, "Bread", &[(flour, 500)])
        .await;
    test_app
        .post_authed(
            &format!("/api/users/{}/subscribe", author.user_id),
            &test_app.test_user.token,
        )
        .await;

    let response = test_app
        .get_authed("/api/users/subscriptions", &test_app.test_user.token)
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["count"], serde_json::json!(1));
    let entry = &body["results"][0];
    assert_eq!(entry["is_subscribed"], serde_json::json!(true));
    assert_eq!(entry["recipes_count"], serde_json::json!(1));
    assert_eq!(entry["recipes"][0]["name"], serde_json::json!("Bread"));
}

#[tokio::test]
async fn recipes_limit_caps_the_embedded_recipe_list() {
    let test_app = spawn_app().await;
    let author = test_app.store_additional_user().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    for i in 0..3 {
        test_app
            .create_recipe(&author.token, &format!("Bread {}", i), &[(flour, 500)])
            .await;
    }
    test_app
        .post_authed(
            &format!("/api/users/{}/subscribe", author.user_id),
            &test_app.test_user.token,
        )
        .await;

    let response = test_app
        .get_authed(
            "/api/users/subscriptions?recipes_limit=2",
            &test_app.test_user.token,
        )
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    let entry = &body["results"][0];
    assert_eq!(entry["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(entry["recipes_count"], serde_json::json!(3));
}
