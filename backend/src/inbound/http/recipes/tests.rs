//! Tests for the recipe handlers.

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::IngredientId;
use crate::inbound::http::test_utils::{
    GIF_BASE64, PNG_DATA_URL, SignedUp, TestBackend, init_app, send,
};
use crate::test_support::cap_fs::path_exists;

struct Kitchen {
    backend: TestBackend,
    flour: IngredientId,
    sugar: IngredientId,
}

impl Kitchen {
    fn new() -> Self {
        let backend = TestBackend::new();
        let flour = backend.store().add_ingredient("flour", "g");
        let sugar = backend.store().add_ingredient("sugar", "g");
        Self {
            backend,
            flour,
            sugar,
        }
    }

    fn recipe(&self, name: &str) -> Value {
        json!({
            "name": name,
            "text": "Mix and bake.",
            "cooking_time": 40,
            "image": PNG_DATA_URL,
            "ingredients": [
                { "id": self.flour.get(), "amount": 200 },
                { "id": self.sugar.get(), "amount": 50 },
            ],
        })
    }
}

fn create(author: &SignedUp, payload: Value) -> actix_http::Request {
    TestRequest::post()
        .uri("/api/recipes/")
        .insert_header(author.authorization())
        .insert_header(("Host", "foodgram.test"))
        .set_json(payload)
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn create_returns_the_full_view() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;

    let (status, body) = send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Shortbread");
    assert_eq!(body["cooking_time"], 40);
    assert_eq!(body["author"]["username"], "cook");
    assert_eq!(body["author"]["is_subscribed"], false);
    assert_eq!(body["is_favorited"], false);
    assert_eq!(body["is_in_shopping_cart"], false);
    assert_eq!(
        body["ingredients"][0],
        json!({ "id": kitchen.flour.get(), "amount": 200, "name": "flour", "measurement_unit": "g" })
    );
    let image = body["image"].as_str().expect("image url");
    let relative = image
        .strip_prefix("http://foodgram.test/media/")
        .expect("absolute media url");
    assert!(relative.starts_with("recipes/images/"));
    assert!(path_exists(&kitchen.backend.media_root().join(relative)));
}

#[rstest]
#[case("name", json!(null), "name")]
#[case("cooking_time", json!(0), "cooking_time")]
#[case("cooking_time", json!(-3), "cooking_time")]
#[case("ingredients", json!([]), "ingredients")]
#[case("ingredients", json!([{ "id": 999, "amount": 1 }]), "ingredients")]
#[case("image", json!(null), "image")]
#[case("image", json!("aGVsbG8="), "image")]
#[case("text", json!("   "), "text")]
#[actix_web::test]
async fn create_reports_the_offending_field(
    #[case] key: &str,
    #[case] value: Value,
    #[case] field: &str,
) {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    let mut payload = kitchen.recipe("Shortbread");
    if value.is_null() {
        payload.as_object_mut().expect("object").remove(key);
    } else {
        payload[key] = value;
    }

    let (status, body) = send(&app, create(&cook, payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn duplicate_ingredients_are_rejected() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    let mut payload = kitchen.recipe("Shortbread");
    payload["ingredients"] = json!([
        { "id": kitchen.flour.get(), "amount": 1 },
        { "id": kitchen.flour.get(), "amount": 2 },
    ]);

    let (status, _) = send(&app, create(&cook, payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn anonymous_callers_cannot_create() {
    let kitchen = Kitchen::new();
    let app = init_app(&kitchen.backend).await;

    let (status, _) = send(
        &app,
        TestRequest::post()
            .uri("/api/recipes/")
            .set_json(kitchen.recipe("Shortbread"))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn list_is_newest_first_and_filterable() {
    let kitchen = Kitchen::new();
    let ann = kitchen.backend.sign_up("ann").await;
    let bob = kitchen.backend.sign_up("bob").await;
    let app = init_app(&kitchen.backend).await;
    send(&app, create(&ann, kitchen.recipe("Apple pie"))).await;
    send(&app, create(&bob, kitchen.recipe("Banana bread"))).await;
    send(&app, create(&ann, kitchen.recipe("Cherry tart"))).await;

    let names = |body: &Value| -> Vec<String> {
        body["results"]
            .as_array()
            .expect("results")
            .iter()
            .filter_map(|recipe| recipe["name"].as_str().map(str::to_owned))
            .collect()
    };

    let (status, all) = send(&app, TestRequest::get().uri("/api/recipes/").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 3);
    assert_eq!(names(&all), ["Cherry tart", "Banana bread", "Apple pie"]);

    let (_, by_ann) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/recipes/?author={}", ann.id))
            .to_request(),
    )
    .await;
    assert_eq!(names(&by_ann), ["Cherry tart", "Apple pie"]);

    let (_, searched) = send(
        &app,
        TestRequest::get().uri("/api/recipes/?search=BREAD").to_request(),
    )
    .await;
    assert_eq!(names(&searched), ["Banana bread"]);
}

#[rstest]
#[actix_web::test]
async fn invalid_author_filter_is_a_bad_request() {
    let kitchen = Kitchen::new();
    let app = init_app(&kitchen.backend).await;

    let (status, body) = send(
        &app,
        TestRequest::get().uri("/api/recipes/?author=me").to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_integer");
}

#[rstest]
#[case("/api/recipes/?is_favorited=1")]
#[case("/api/recipes/?is_in_shopping_cart=1")]
#[actix_web::test]
async fn anonymous_mark_filters_return_an_empty_page(#[case] uri: &str) {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;

    let (status, body) = send(&app, TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0, "next": null, "previous": null, "results": [] }));
}

#[rstest]
#[actix_web::test]
async fn only_the_author_may_edit_or_delete() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let critic = kitchen.backend.sign_up("critic").await;
    let app = init_app(&kitchen.backend).await;
    let (_, created) = send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;
    let uri = format!("/api/recipes/{}/", created["id"]);

    let (status, _) = send(
        &app,
        TestRequest::patch()
            .uri(&uri)
            .insert_header(critic.authorization())
            .set_json(kitchen.recipe("Stolen"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        TestRequest::delete()
            .uri(&uri)
            .insert_header(critic.authorization())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        TestRequest::delete()
            .uri(&uri)
            .insert_header(cook.authorization())
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn update_keeps_the_image_when_omitted() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    let (_, created) = send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;
    let mut edit = kitchen.recipe("Better shortbread");
    edit.as_object_mut().expect("object").remove("image");
    edit["ingredients"] = json!([{ "id": kitchen.sugar.get(), "amount": 75 }]);

    let (status, updated) = send(
        &app,
        TestRequest::put()
            .uri(&format!("/api/recipes/{}/", created["id"]))
            .insert_header(cook.authorization())
            .insert_header(("Host", "foodgram.test"))
            .set_json(edit)
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Better shortbread");
    assert_eq!(updated["image"], created["image"]);
    assert_eq!(updated["ingredients"].as_array().map(Vec::len), Some(1));
    assert_eq!(updated["ingredients"][0]["amount"], 75);
}

#[rstest]
#[actix_web::test]
async fn update_replaces_the_image_when_given() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    let (_, created) = send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;
    let mut edit = kitchen.recipe("Shortbread");
    edit["image"] = json!(GIF_BASE64);

    let (status, updated) = send(
        &app,
        TestRequest::patch()
            .uri(&format!("/api/recipes/{}/", created["id"]))
            .insert_header(cook.authorization())
            .set_json(edit)
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(updated["image"].as_str().is_some_and(|url| url.ends_with(".gif")));
}

#[rstest]
#[actix_web::test]
async fn get_link_points_at_the_front_end() {
    let kitchen = Kitchen::new();
    let cook = kitchen.backend.sign_up("cook").await;
    let app = init_app(&kitchen.backend).await;
    let (_, created) = send(&app, create(&cook, kitchen.recipe("Shortbread"))).await;

    let (status, body) = send(
        &app,
        TestRequest::get()
            .uri(&format!("/api/recipes/{}/get-link/", created["id"]))
            .insert_header(("Host", "foodgram.test"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["short-link"],
        format!("http://foodgram.test/recipes/{}/", created["id"]).as_str()
    );

    let (status, _) = send(
        &app,
        TestRequest::get().uri("/api/recipes/4040/get-link/").to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
