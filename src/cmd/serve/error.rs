// Copyright 2026 The norsk-drill Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Json;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use maud::html;
use norsk_drill_core::SelectError;
use serde::Serialize;

use crate::cmd::serve::template::page_template;
use crate::error::ErrorReport;

/// A failed request: the status to send and a message for the user.
#[derive(Debug, PartialEq)]
pub struct ServerError {
    pub status: StatusCode,
    pub message: String,
}

impl ServerError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }
}

impl From<ErrorReport> for ServerError {
    fn from(value: ErrorReport) -> Self {
        log::error!("{value}");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal Server Error".to_string(),
        }
    }
}

impl From<SelectError> for ServerError {
    fn from(value: SelectError) -> Self {
        Self::not_found(value.to_string())
    }
}

/// Rendered as an HTML page.
#[derive(Debug)]
pub struct PageError(pub ServerError);

/// Rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub ServerError);

impl From<ServerError> for PageError {
    fn from(value: ServerError) -> Self {
        Self(value)
    }
}

impl From<ErrorReport> for PageError {
    fn from(value: ErrorReport) -> Self {
        Self(value.into())
    }
}

impl From<SelectError> for PageError {
    fn from(value: SelectError) -> Self {
        Self(value.into())
    }
}

impl From<ServerError> for ApiError {
    fn from(value: ServerError) -> Self {
        Self(value)
    }
}

impl From<ErrorReport> for ApiError {
    fn from(value: ErrorReport) -> Self {
        Self(value.into())
    }
}

impl From<SelectError> for ApiError {
    fn from(value: SelectError) -> Self {
        Self(value.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let ServerError { status, message } = self.0;
        let body = html! {
            div.error {
                h1 { (status.canonical_reason().unwrap_or("Error")) }
                p { (message) }
                a href="/" { "Back to the menu" }
            }
        };
        (status, Html(page_template(body).into_string())).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ServerError { status, message } = self.0;
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
