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

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::from_fn_with_state;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use maud::html;
use norsk_drill_core::Category;
use norsk_drill_core::TinyRng;
use tokio::net::TcpListener;
use tokio::signal;

use crate::cmd::serve::admin;
use crate::cmd::serve::api;
use crate::cmd::serve::error::PageError;
use crate::cmd::serve::error::ServerError;
use crate::cmd::serve::grammar::grammar_handler;
use crate::cmd::serve::practice;
use crate::cmd::serve::search::search_page_handler;
use crate::cmd::serve::state::ServerState;
use crate::cmd::serve::template::page_template;
use crate::db::Database;
use crate::error::Fallible;
use crate::utils::CACHE_CONTROL_IMMUTABLE;
use crate::utils::clock_seed;

pub struct ServerConfig {
    pub database: PathBuf,
    pub host: String,
    pub port: u16,
    pub window_size: usize,
    /// Fixed RNG seed. `None` seeds from the clock.
    pub seed: Option<u64>,
    pub admin_localhost_only: bool,
}

pub async fn start_server(config: ServerConfig) -> Fallible<()> {
    let db = Database::new(&config.database)?;
    let seed = config.seed.unwrap_or_else(clock_seed);
    log::debug!(
        "Opened {} (window size {}, seed {seed})",
        config.database.display(),
        config.window_size
    );

    let state = ServerState {
        db: Arc::new(Mutex::new(db)),
        rng: Arc::new(Mutex::new(TinyRng::from_seed(seed))),
        window_size: config.window_size,
        admin_localhost_only: config.admin_localhost_only,
    };

    let admin_routes = Router::new();
    let admin_routes = admin_routes.route("/admin", get(admin::admin_index_handler));
    let admin_routes = admin_routes.route("/admin/grammar/add", post(admin::add_lesson_handler));
    let admin_routes = admin_routes.route(
        "/admin/grammar/{id}/delete",
        post(admin::delete_lesson_handler),
    );
    let admin_routes =
        admin_routes.route("/admin/{category}", get(admin::admin_category_handler));
    let admin_routes = admin_routes.route(
        "/admin/{category}/import-csv",
        post(admin::import_csv_handler),
    );
    let admin_routes = admin_routes.route(
        "/admin/{category}/import-text",
        post(admin::import_text_handler),
    );
    let admin_routes = admin_routes.route("/admin/{category}/add", post(admin::add_word_handler));
    let admin_routes = admin_routes.route(
        "/admin/{category}/{id}/edit",
        get(admin::edit_word_page_handler).post(admin::edit_word_handler),
    );
    let admin_routes = admin_routes.route(
        "/admin/{category}/{id}/delete",
        post(admin::delete_word_handler),
    );
    let admin_routes = admin_routes.layer(from_fn_with_state(state.clone(), admin::admin_guard));

    let app = Router::new();
    let app = app.route("/", get(menu_handler));
    let app = app.route(
        "/practice/{category}",
        get(practice::practice_handler).post(practice::check_handler),
    );
    let app = app.route("/search", get(search_page_handler));
    let app = app.route("/grammar", get(grammar_handler));
    let app = app.route("/api/search", get(api::search_handler));
    let app = app.route("/api/{category}/random", get(api::random_handler));
    let app = app.route("/api/{category}/{id}/check", post(api::check_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.merge(admin_routes);
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("{}:{}", config.host, config.port);

    // Start the server with graceful shutdown on Ctrl+C.
    let listener = TcpListener::bind(&bind).await?;
    log::info!("Serving on http://{bind}/");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn menu_handler(State(state): State<ServerState>) -> Result<Html<String>, PageError> {
    let db = state.db()?;
    let mut counts = Vec::new();
    for category in Category::ALL {
        counts.push((category, db.count(category)?));
    }
    drop(db);
    let body = html! {
        h1 { "Norsk drill" }
        ul.menu {
            @for (category, count) in counts.iter() {
                li {
                    @if *count > 0 {
                        a href={ "/practice/" (category.slug()) } { (category.title()) }
                    } @else {
                        (category.title())
                    }
                    " (" (count) ")"
                }
            }
        }
    };
    Ok(Html(page_template(body).into_string()))
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> PageError {
    PageError(ServerError::not_found("There is nothing here."))
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => log::debug!("Received Ctrl+C, shutting down gracefully"),
        Err(e) => {
            log::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
