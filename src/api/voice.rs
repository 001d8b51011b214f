//! Keypad voice menu for checking and reporting phone numbers.
//!
//! No state is held between steps: each prompt names the URL the gateway
//! should post the next keypresses to.

use actix_web::{post, web, HttpRequest, HttpResponse, ResponseError};
use serde::Deserialize;

use super::{
    error::{guarded, ApiError},
    markup::{self, MarkupResponse},
    AppState,
};

const MENU_PATH: &str = "/voice";
const CHOICE_PATH: &str = "/voice/menu";
const CHECK_PATH: &str = "/voice/check";
const REPORT_PATH: &str = "/voice/report";

const WELCOME: &str = "Welcome to the scam number checker. Press 1 to check a phone number. Press 2 to report a scam number.";
const INVALID_CHOICE: &str = "Sorry, that is not a valid choice.";
const NO_INPUT: &str = "We did not receive any input.";
const KNOWN_SCAM: &str = "Warning. This number has been reported as a scam. Do not share any personal or banking information with this caller.";
const NOT_REPORTED: &str = "This number has not been reported as a scam. Still, be careful with unknown callers.";
const REPORTED: &str = "Thank you. The number has been reported and will help protect others.";
const FAILURE: &str = "Sorry, something went wrong. Please try again later.";

#[derive(Debug, Deserialize)]
pub struct VoiceForm {
    #[serde(rename = "Digits", default)]
    pub digits: Option<String>,
    #[serde(rename = "From", default)]
    pub from: Option<String>,
    #[serde(rename = "CallSid", default)]
    pub call_sid: Option<String>,
}

impl VoiceForm {
    fn entered_digits(&self) -> Option<&str> {
        self.digits
            .as_deref()
            .map(str::trim)
            .filter(|digits| !digits.is_empty())
    }
}

#[post("")]
pub async fn menu(state: web::Data<AppState>, form: web::Form<VoiceForm>) -> HttpResponse {
    let language = state.config.voice.language.as_str();
    tracing::info!(
        target: "voice",
        from = form.from.as_deref().unwrap_or_default(),
        call_sid = form.call_sid.as_deref().unwrap_or_default(),
        "call started"
    );
    MarkupResponse::new()
        .gather(CHOICE_PATH, 1, language, WELCOME)
        .redirect(MENU_PATH)
        .into_response()
}

#[post("/menu")]
pub async fn choice(state: web::Data<AppState>, form: web::Form<VoiceForm>) -> HttpResponse {
    let voice = &state.config.voice;
    let next = match form.entered_digits() {
        Some("1") => Some((CHECK_PATH, "check")),
        Some("2") => Some((REPORT_PATH, "report")),
        _ => None,
    };

    match next {
        Some((action, verb)) => {
            let prompt = format!(
                "Please enter the {} digit phone number you want to {verb}.",
                voice.phone_digits
            );
            MarkupResponse::new()
                .gather(action, voice.phone_digits, &voice.language, prompt)
                .redirect(MENU_PATH)
                .into_response()
        }
        None => {
            tracing::debug!(target: "voice", digits = ?form.digits, "invalid menu choice");
            let text = if form.entered_digits().is_some() { INVALID_CHOICE } else { NO_INPUT };
            MarkupResponse::new()
                .say(&voice.language, text)
                .redirect(MENU_PATH)
                .into_response()
        }
    }
}

#[post("/check")]
pub async fn check(state: web::Data<AppState>, form: web::Form<VoiceForm>) -> HttpResponse {
    let language = state.config.voice.language.as_str();
    let Some(digits) = form.entered_digits() else {
        return no_input(language);
    };

    match guarded("registry lookup", || state.registry.is_known_scam(digits)) {
        Ok(known) => {
            tracing::info!(
                target: "voice",
                number = %state.registry.normalize(digits),
                known,
                "number checked"
            );
            let text = if known { KNOWN_SCAM } else { NOT_REPORTED };
            MarkupResponse::new()
                .say(language, text)
                .hangup()
                .into_response()
        }
        Err(err) => failure(language, err),
    }
}

#[post("/report")]
pub async fn report(state: web::Data<AppState>, form: web::Form<VoiceForm>) -> HttpResponse {
    let language = state.config.voice.language.as_str();
    let Some(digits) = form.entered_digits() else {
        return no_input(language);
    };

    match guarded("registry report", || state.registry.report(digits)) {
        Ok(_) => MarkupResponse::new()
            .say(language, REPORTED)
            .hangup()
            .into_response(),
        Err(err) => failure(language, err),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(MENU_PATH)
            .app_data(markup::form_config(rejected_form))
            .service(menu)
            .service(choice)
            .service(check)
            .service(report),
    );
}

fn rejected_form(_err: &ApiError, req: &HttpRequest) -> MarkupResponse {
    let markup = MarkupResponse::new();
    let markup = match req.app_data::<web::Data<AppState>>() {
        Some(state) => markup.say(&state.config.voice.language, FAILURE),
        None => markup,
    };
    markup.hangup()
}

fn no_input(language: &str) -> HttpResponse {
    MarkupResponse::new()
        .say(language, NO_INPUT)
        .redirect(MENU_PATH)
        .into_response()
}

fn failure(language: &str, err: ApiError) -> HttpResponse {
    err.log();
    MarkupResponse::new()
        .say(language, FAILURE)
        .hangup()
        .into_response_with_status(err.status_code())
}
