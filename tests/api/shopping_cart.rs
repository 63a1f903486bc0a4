use crate::helpers::spawn_app;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use foodgram_backend::schema::shopping_cart;

#[tokio::test]
async fn cart_add_and_remove_follow_the_relation_set_contract() {
    let test_app = spawn_app().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    let recipe_id = test_app
        .create_recipe(&test_app.test_user.token, "Bread", &[(flour, 500)])
        .await;
    let path = format!("/api/recipes/{}/shopping_cart", recipe_id);

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["name"], serde_json::json!("Bread"));

    let response = test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;
    assert_eq!(409, response.status().as_u16());

    let mut connection = test_app.connection().await;
    let count: i64 = shopping_cart::table
        .filter(shopping_cart::recipe_id.eq(recipe_id))
        .count()
        .get_result(&mut connection)
        .await
        .unwrap();
    assert_eq!(count, 1);

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
async fn cart_membership_is_per_user() {
    let test_app = spawn_app().await;
    let flour = test_app.seed_ingredient("flour", "g").await;
    let recipe_id = test_app
        .create_recipe(&test_app.test_user.token, "Bread", &[(flour, 500)])
        .await;
    let other_user = test_app.store_additional_user().await;
    let path = format!("/api/recipes/{}/shopping_cart", recipe_id);

    test_app
        .post_authed(&path, &test_app.test_user.token)
        .await;

    // The other user's cart is untouched, so their remove fails.
    let response = test_app.delete_authed(&path, &other_user.token).await;
    assert_eq!(400, response.status().as_u16());
}
