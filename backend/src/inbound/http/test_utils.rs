//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use serde_json::Value;

pub(crate) use crate::test_support::harness::{SignedUp, TestBackend};

/// Base64 GIF header, enough to pass signature detection.
pub(crate) const GIF_BASE64: &str = "R0lGODlhAQABAAAAADs=";

/// Data URL wrapping a PNG signature.
pub(crate) const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==";

/// Every API route over `backend`'s state.
pub(crate) async fn init_app(
    backend: &TestBackend,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(backend.data())
            .configure(super::configure),
    )
    .await
}

/// Issue `req` and decode the JSON body, using `Value::Null` for empty
/// bodies.
pub(crate) async fn send<S>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = actix_test::call_service(app, req).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|err| panic!("response is not JSON ({err}): {body:?}"));
    (status, value)
}
