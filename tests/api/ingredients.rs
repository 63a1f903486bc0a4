use crate::helpers::spawn_app;

#[tokio::test]
async fn search_is_case_insensitive_and_prefix_only() {
    let test_app = spawn_app().await;
    test_app.seed_ingredient("tomato paste", "g").await;
    test_app.seed_ingredient("Tofu", "g").await;
    test_app.seed_ingredient("egg", "pcs").await;
    test_app.seed_ingredient("potato", "kg").await;

    let response = test_app.get("/api/ingredients?name=to").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .expect("Expected a plain array, not a paginated envelope")
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    // "potato" contains "to" but does not start with it.
    assert_eq!(names, vec!["Tofu", "tomato paste"]);
}

#[tokio::test]
async fn cyrillic_prefix_matches_only_names_starting_with_it() {
    let test_app = spawn_app().await;
    test_app.seed_ingredient("томат", "шт").await;
    test_app.seed_ingredient("тофу", "г").await;
    test_app.seed_ingredient("картофель", "кг").await;

    let response =
        test_app.get("/api/ingredients?name=%D1%82%D0%BE").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["томат", "тофу"]);
}

#[tokio::test]
async fn missing_prefix_returns_the_full_catalog_ordered_by_name() {
    let test_app = spawn_app().await;
    test_app.seed_ingredient("salt", "g").await;
    test_app.seed_ingredient("butter", "g").await;
    test_app.seed_ingredient("flour", "g").await;

    let response = test_app.get("/api/ingredients").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["butter", "flour", "salt"]);
}

#[tokio::test]
async fn like_metacharacters_in_the_prefix_match_literally() {
    let test_app = spawn_app().await;
    test_app.seed_ingredient("sugar", "g").await;

    let response = test_app.get("/api/ingredients?name=%25").await;

    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}
