//! Minimal builder for the XML reply markup spoken by voice/SMS gateways.

use std::fmt::Write;

use actix_web::{error::InternalError, http::StatusCode, web, HttpRequest, HttpResponse, ResponseError};

use super::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Verb {
    Say {
        language: String,
        text: String,
    },
    Gather {
        action: String,
        num_digits: usize,
        language: String,
        prompt: String,
    },
    Redirect(String),
    Message(String),
    Hangup,
}

#[derive(Debug, Clone, Default)]
pub struct MarkupResponse {
    verbs: Vec<Verb>,
}

impl MarkupResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, language: &str, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            language: language.to_string(),
            text: text.into(),
        });
        self
    }

    /// Collects `num_digits` keypresses, playing `prompt` while waiting, and posts them to `action`.
    pub fn gather(
        mut self,
        action: &str,
        num_digits: usize,
        language: &str,
        prompt: impl Into<String>,
    ) -> Self {
        self.verbs.push(Verb::Gather {
            action: action.to_string(),
            num_digits,
            language: language.to_string(),
            prompt: prompt.into(),
        });
        self
    }

    pub fn redirect(mut self, url: &str) -> Self {
        self.verbs.push(Verb::Redirect(url.to_string()));
        self
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.verbs.push(Verb::Message(body.into()));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            match verb {
                Verb::Say { language, text } => write_say(&mut out, language, text),
                Verb::Gather {
                    action,
                    num_digits,
                    language,
                    prompt,
                } => {
                    let _ = write!(
                        out,
                        r#"<Gather action="{}" method="POST" numDigits="{}">"#,
                        escape(action),
                        num_digits
                    );
                    write_say(&mut out, language, prompt);
                    out.push_str("</Gather>");
                }
                Verb::Redirect(url) => {
                    let _ = write!(out, r#"<Redirect method="POST">{}</Redirect>"#, escape(url));
                }
                Verb::Message(body) => {
                    let _ = write!(out, "<Message>{}</Message>", escape(body));
                }
                Verb::Hangup => out.push_str("<Hangup/>"),
            }
        }
        out.push_str("</Response>");
        out
    }

    pub fn into_response(self) -> HttpResponse {
        self.into_response_with_status(StatusCode::OK)
    }

    pub fn into_response_with_status(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status)
            .content_type("text/xml; charset=utf-8")
            .body(self.render())
    }
}

/// Form extractor config that answers rejected payloads in markup instead of JSON.
pub fn form_config(render: fn(&ApiError, &HttpRequest) -> MarkupResponse) -> web::FormConfig {
    web::FormConfig::default().error_handler(move |err, req| {
        let rejection = ApiError::MalformedRequest(err.to_string());
        rejection.log();
        let response = render(&rejection, req).into_response_with_status(rejection.status_code());
        InternalError::from_response(err, response).into()
    })
}

fn write_say(out: &mut String, language: &str, text: &str) {
    let _ = write!(
        out,
        r#"<Say language="{}">{}</Say>"#,
        escape(language),
        escape(text)
    );
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
