//! Shopping list download.
//!
//! ```text
//! GET /api/recipes/download_shopping_cart/   (Authorization: Token <key>)
//! ```

use actix_web::http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, SHOPPING_LIST_FILE_NAME};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::state::HttpState;

/// Aggregated ingredients of every recipe in the caller's cart, as a text
/// attachment with one `<name> (<unit>) — <total>` line per ingredient.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (
            status = 200,
            description = "Shopping list",
            content_type = "text/plain",
            body = String,
            headers(("Content-Disposition" = String, description = "attachment; filename=\"shopping_cart.txt\""))
        ),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["shopping cart"],
    operation_id = "downloadShoppingCart",
    security(("token" = []))
)]
#[get("/api/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let list = state.shopping_list.shopping_list(auth.user_id()).await?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(
                SHOPPING_LIST_FILE_NAME.to_owned(),
            )],
        })
        .body(list.render()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
    use actix_web::test::{self as actix_test, TestRequest};
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::IngredientId;
    use crate::inbound::http::test_utils::{GIF_BASE64, SignedUp, TestBackend, init_app, send};

    const DOWNLOAD: &str = "/api/recipes/download_shopping_cart/";

    async fn cart_recipe<S>(app: &S, cook: &SignedUp, lines: &[(IngredientId, u32)])
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let ingredients: Vec<_> = lines
            .iter()
            .map(|(id, amount)| json!({ "id": id.get(), "amount": amount }))
            .collect();
        let (status, recipe) = send(
            app,
            TestRequest::post()
                .uri("/api/recipes/")
                .insert_header(cook.authorization())
                .set_json(json!({
                    "name": "Bake",
                    "text": "Bake it.",
                    "cooking_time": 30,
                    "image": GIF_BASE64,
                    "ingredients": ingredients,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(
            app,
            TestRequest::post()
                .uri(&format!("/api/recipes/{}/shopping_cart/", recipe["id"]))
                .insert_header(cook.authorization())
                .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    #[rstest]
    #[actix_web::test]
    async fn download_aggregates_the_cart_as_an_attachment() {
        let backend = TestBackend::new();
        let flour = backend.store().add_ingredient("Flour", "g");
        let sugar = backend.store().add_ingredient("Sugar", "g");
        let egg = backend.store().add_ingredient("Egg", "pcs");
        let cook = backend.sign_up("cook").await;
        let app = init_app(&backend).await;
        cart_recipe(&app, &cook, &[(flour, 200), (sugar, 50)]).await;
        cart_recipe(&app, &cook, &[(flour, 100), (egg, 2)]).await;

        let response = actix_test::call_service(
            &app,
            TestRequest::get()
                .uri(DOWNLOAD)
                .insert_header(cook.authorization())
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(
            headers.get(CONTENT_DISPOSITION).and_then(|v| v.to_str().ok()),
            Some("attachment; filename=\"shopping_cart.txt\"")
        );
        let body = actix_test::read_body(response).await;
        assert_eq!(
            std::str::from_utf8(&body).expect("utf-8"),
            "Flour (g) — 300\nSugar (g) — 50\nEgg (pcs) — 2"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_cart_downloads_an_empty_file() {
        let backend = TestBackend::new();
        let cook = backend.sign_up("cook").await;
        let app = init_app(&backend).await;

        let response = actix_test::call_service(
            &app,
            TestRequest::get()
                .uri(DOWNLOAD)
                .insert_header(cook.authorization())
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(actix_test::read_body(response).await.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_download_is_unauthorised() {
        let backend = TestBackend::new();
        let app = init_app(&backend).await;

        let (status, body) = send(&app, TestRequest::get().uri(DOWNLOAD).to_request()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[rstest]
    #[actix_web::test]
    async fn storage_outage_is_service_unavailable() {
        let backend = TestBackend::new();
        let cook = backend.sign_up("cook").await;
        let app = init_app(&backend).await;
        backend.store().set_unavailable(true);

        let (status, body) = send(
            &app,
            TestRequest::get()
                .uri(DOWNLOAD)
                .insert_header(cook.authorization())
                .to_request(),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "service_unavailable");
    }
}
