use actix_web::{post, web, HttpResponse};
use serde::Deserialize;

use super::error::{guarded, ApiError};
use crate::detection;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub message: String,
}

/// Classifies a message and returns its category alongside the warning text.
#[post("/v1/classify")]
pub async fn classify_message(
    request: web::Json<ClassifyRequest>,
) -> Result<HttpResponse, ApiError> {
    let verdict = guarded("classification", || detection::classify(&request.message))?;
    tracing::debug!(
        target: "http",
        category = verdict.category.label(),
        "classified via api"
    );
    Ok(HttpResponse::Ok().json(verdict))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(classify_message);
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::api::{configure, testing};

    #[actix_web::test]
    async fn returns_category_and_warning() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/classify")
            .set_json(json!({ "message": "Congratulations you have won a lottery prize! Visit bit.ly/xyz now" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "generic_scam");
        assert!(body["warning"]
            .as_str()
            .unwrap()
            .contains("Do not click any links"));
    }

    #[actix_web::test]
    async fn empty_message_is_safe() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/classify")
            .set_json(json!({}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["category"], "safe");
    }

    #[actix_web::test]
    async fn invalid_json_uses_api_error_format() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/v1/classify")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"message\": 7}")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "malformed_request");
    }
}
