use crate::helpers::spawn_app;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use foodgram_backend::schema::favorites;
use uuid::Uuid;

#[tokio::test]
async fn add_then_remove_returns_the_set_to_its_prior_state() {
    let test_app = spawn_app().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    let recipe_id = test_app
        .create_recipe(&test_app.test_user.token, "Bread", &[(flour, 500)])
        .await;
    let path = format!("/api/recipes/{}/favorite", recipe_id);

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(201, response.status().as_u16());

    let response = test_app
        .delete_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(204, response.status().as_u16());

    let mut connection = test_app.connection().await;
    let count: i64 = favorites::table
        .filter(favorites::user_id.eq(test_app.test_user.user_id))
        .count()
        .get_result(&mut connection)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // A second remove without an intervening add is a request error.
    let response = test_app
        .delete_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn duplicate_add_is_a_conflict_and_keeps_a_single_row() {
    let test_app = spawn_app().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    let recipe_id = test_app
        .create_recipe(&test_app.test_user.token, "Bread", &[(flour, 500)])
        .await;
    let path = format!("/api/recipes/{}/favorite", recipe_id);

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(201, response.status().as_u16());

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(409, response.status().as_u16());

    let mut connection = test_app.connection().await;
    let count: i64 = favorites::table
        .filter(favorites::recipe_id.eq(recipe_id))
        .count()
        .get_result(&mut connection)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn favoriting_an_unknown_recipe_is_404() {
    let test_app = spawn_app().await;

    let response = test_app
        .post_authed(
            &format!("/api/recipes/{}/favorite", Uuid::now_v7()),
            &test_app.test_user.token,
        )
        .await;

    assert_eq!(404, response.status().as_u16());
}
