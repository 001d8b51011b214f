//! Inbound SMS webhooks.
//!
//! `/sms` speaks the JSON gateway protocol and is strict about its input;
//! `/sms/markup` answers form-encoded gateways with an inline `<Message>` reply.

use actix_web::{
    http::{header, StatusCode},
    post, web, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    error::{guarded, ApiError},
    markup::{self, MarkupResponse},
};
use crate::{detection, domain::Verdict};

const NOT_JSON: &str = "Request Content-Type was not application/json";
const RAW_BODY_LOG_LIMIT: usize = 512;

#[derive(Debug, Serialize)]
pub struct GatewayReply {
    pub payload: GatewayPayload,
}

#[derive(Debug, Serialize)]
pub struct GatewayPayload {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<OutboundSms>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutboundSms {
    pub to: String,
    pub message: String,
}

/// [`ApiError`] rendered inside the gateway's `payload` envelope.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct GatewayError(#[from] ApiError);

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        self.0.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        self.0.log();
        HttpResponse::build(self.status_code()).json(GatewayReply {
            payload: GatewayPayload {
                success: false,
                messages: None,
                error: Some(self.0.public_message()),
            },
        })
    }
}

#[post("/sms")]
pub async fn gateway_webhook(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    if !is_json_content_type(&req) {
        let raw = String::from_utf8_lossy(&body);
        tracing::warn!(
            target: "sms",
            content_type = ?req.headers().get(header::CONTENT_TYPE),
            raw_body = %truncate(&raw, RAW_BODY_LOG_LIMIT),
            "request is not JSON"
        );
        return Err(ApiError::MalformedRequest(NOT_JSON.to_string()).into());
    }

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|err| ApiError::MalformedRequest(format!("Request body is not valid JSON: {err}")))?;
    let Value::Object(fields) = payload else {
        return Err(ApiError::MalformedRequest("Request body must be a JSON object".to_string()).into());
    };

    let message = string_field(&fields, "message")?;
    let sender = string_field(&fields, "from")?;

    let verdict = classify_logged(&sender, &message)?;

    Ok(HttpResponse::Ok().json(GatewayReply {
        payload: GatewayPayload {
            success: true,
            messages: Some(vec![OutboundSms {
                to: sender,
                message: verdict.warning.to_string(),
            }]),
            error: None,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct MarkupSmsForm {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
}

pub async fn markup_webhook(form: web::Form<MarkupSmsForm>) -> HttpResponse {
    let MarkupSmsForm { body, from } = form.into_inner();
    match classify_logged(&from, &body) {
        Ok(verdict) => MarkupResponse::new().message(verdict.warning).into_response(),
        Err(err) => {
            err.log();
            MarkupResponse::new()
                .message(err.public_message())
                .into_response_with_status(err.status_code())
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(gateway_webhook).service(
        web::resource("/sms/markup")
            .app_data(markup::form_config(rejected_form))
            .route(web::post().to(markup_webhook)),
    );
}

fn rejected_form(err: &ApiError, _req: &HttpRequest) -> MarkupResponse {
    MarkupResponse::new().message(err.public_message())
}

fn classify_logged(sender: &str, message: &str) -> Result<Verdict, ApiError> {
    tracing::info!(target: "sms", from = %sender, body = %message, "received message");
    let verdict = guarded("classification", || detection::classify(message))?;
    tracing::info!(
        target: "sms",
        from = %sender,
        category = verdict.category.label(),
        tier = ?verdict.category.tier(),
        "message classified"
    );
    Ok(verdict)
}

/// Missing or null fields read as empty; any other non-string value is rejected.
fn string_field(fields: &Map<String, Value>, key: &'static str) -> Result<String, ApiError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ApiError::MalformedRequest(format!(
            "field '{key}' must be a string"
        ))),
    }
}

fn is_json_content_type(req: &HttpRequest) -> bool {
    let Some(value) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let mime = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::{
        api::{configure, testing},
        domain::ScamCategory,
    };

    use super::*;

    #[actix_web::test]
    async fn json_webhook_replies_to_sender() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms")
            .set_json(json!({
                "message": "Please share your OTP to authorize the transaction",
                "from": "+919876543210"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["payload"]["success"], true);
        assert_eq!(body["payload"]["messages"][0]["to"], "+919876543210");
        assert_eq!(
            body["payload"]["messages"][0]["message"],
            ScamCategory::OtpScam.warning()
        );
        assert!(body["payload"].get("error").is_none());
    }

    #[actix_web::test]
    async fn missing_fields_default_to_empty_and_safe() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/sms").set_json(json!({})).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["payload"]["messages"][0]["to"], "");
        assert_eq!(
            body["payload"]["messages"][0]["message"],
            ScamCategory::Safe.warning()
        );

        let req = test::TestRequest::post()
            .uri("/sms")
            .set_json(json!({ "message": null, "from": "+15550001111" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["payload"]["messages"][0]["to"], "+15550001111");
        assert_eq!(
            body["payload"]["messages"][0]["message"],
            ScamCategory::Safe.warning()
        );
    }

    #[actix_web::test]
    async fn non_json_request_is_rejected() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("message=hello")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["payload"]["success"], false);
        assert_eq!(body["payload"]["error"], NOT_JSON);
    }

    #[actix_web::test]
    async fn structurally_wrong_json_is_rejected() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        for payload in [
            "{not json",
            "[\"message\", \"from\"]",
            "{\"message\": 42}",
            "{\"message\": \"hi\", \"from\": [1]}",
        ] {
            let req = test::TestRequest::post()
                .uri("/sms")
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .set_payload(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["payload"]["success"], false);
            assert!(body["payload"]["error"].as_str().is_some());
        }
    }

    #[actix_web::test]
    async fn vendor_json_content_type_is_accepted() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms")
            .insert_header((header::CONTENT_TYPE, "application/vnd.gateway+json; charset=utf-8"))
            .set_payload(r#"{"message": "URGENT ACT NOW", "from": "x"}"#)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["payload"]["messages"][0]["message"],
            ScamCategory::GenericScam.warning()
        );
    }

    #[actix_web::test]
    async fn markup_webhook_embeds_warning() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms/markup")
            .set_form([
                ("Body", "URGENT: enter your UPI pin to receive money from a friend"),
                ("From", "+15550001111"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let xml = std::str::from_utf8(&body).unwrap();
        assert!(xml.contains(&format!(
            "<Message>{}</Message>",
            ScamCategory::UpiPinScam.warning()
        )));
    }

    #[actix_web::test]
    async fn markup_webhook_rejects_non_form_in_markup() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms/markup")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("Body=hello")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/xml"), "{content_type}");
        let body = test::read_body(resp).await;
        let xml = std::str::from_utf8(&body).unwrap();
        assert!(xml.contains("<Message>"));
        assert!(xml.ends_with("</Response>"));
    }

    #[actix_web::test]
    async fn markup_webhook_tolerates_missing_body() {
        let app = test::init_service(App::new().app_data(testing::state()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/sms/markup")
            .set_form([("From", "+15550001111")])
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        let xml = std::str::from_utf8(&body).unwrap();
        assert!(xml.contains(ScamCategory::Safe.warning()));
    }
}
