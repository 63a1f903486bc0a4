use crate::helpers::{png_data_url, spawn_app};

#[tokio::test]
async fn own_profile_requires_authentication() {
    let test_app = spawn_app().await;

    let response = test_app.get("/api/users/me").await;

    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn own_profile_returns_the_stored_fields() {
    let test_app = spawn_app().await;

    let response = test_app
        .get_authed("/api/users/me", &test_app.test_user.token)
        .await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["username"],
        serde_json::json!(test_app.test_user.username)
    );
    assert_eq!(body["email"], serde_json::json!(test_app.test_user.email));
    assert_eq!(body["is_subscribed"], serde_json::json!(false));
    assert_eq!(body["avatar"], serde_json::Value::Null);
}

#[tokio::test]
async fn profile_carries_the_viewer_relative_subscription_flag() {
    let test_app = spawn_app().await;
    let author = test_app.store_additional_user().await;
    test_app
        .post_authed(
            &format!("/api/users/{}/subscribe", author.user_id),
            &test_app.test_user.token,
        )
        .await;

    let response = test_app
        .get_authed(
            &format!("/api/users/{}", author.user_id),
            &test_app.test_user.token,
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["is_subscribed"], serde_json::json!(true));

    // Anonymous viewers never see a subscription.
    let response = test_app
        .get(&format!("/api/users/{}", author.user_id))
        .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["is_subscribed"], serde_json::json!(false));
}

#[tokio::test]
async fn avatar_can_be_set_and_removed() {
    let test_app = spawn_app().await;
    let payload = serde_json::json!({ "avatar": png_data_url() });

    let response = test_app
        .put_json_authed(
            "/api/users/me/avatar",
            &payload,
            &test_app.test_user.token,
        )
        .await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let avatar_url = body["avatar"].as_str().unwrap();
    assert!(avatar_url.starts_with("/media/avatars/"));

    let response = test_app
        .get_authed("/api/users/me", &test_app.test_user.token)
        .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["avatar"], serde_json::json!(avatar_url));

    let response = test_app
        .delete_authed("/api/users/me/avatar", &test_app.test_user.token)
        .await;
    assert_eq!(204, response.status().as_u16());

    let response = test_app
        .get_authed("/api/users/me", &test_app.test_user.token)
        .await;
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["avatar"], serde_json::Value::Null);
}

#[tokio::test]
async fn a_non_image_avatar_payload_is_400() {
    let test_app = spawn_app().await;
    let payload = serde_json::json!({ "avatar": "not a data url" });

    let response = test_app
        .put_json_authed(
            "/api/users/me/avatar",
            &payload,
            &test_app.test_user.token,
        )
        .await;

    assert_eq!(400, response.status().as_u16());
}
