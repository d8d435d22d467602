use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::controllers::paste;
use crate::storage::{AnyStore, Store};
use crate::types::form::Submission;
use crate::App;

/// The manual for the program in man page form.
const MAN_PAGE: &str = include_str!("../../assets/man.txt");

const FORM_PAGE: &str = include_str!("../../assets/form.html");

pub async fn run(app: App) -> anyhow::Result<()> {
    let addr = SocketAddr::new(app.config.bind, app.config.port);

    if let Some(secs) = app.config.storage.purge_interval_secs {
        tokio::spawn(reap_expired(app.store.clone(), Duration::from_secs(secs)));
    }

    info!("listening on {addr}");
    axum::Server::bind(&addr)
        .serve(router(app).into_make_service())
        .await?;

    Ok(())
}

pub fn router(app: App) -> Router {
    let max_upload_size = app.config.limits.max_upload_size;

    Router::new()
        .route("/", get(index).post(upload_paste))
        .route("/form", get(form))
        .route("/:id", get(get_paste))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

async fn reap_expired(mut store: AnyStore, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        match store.purge_expired().await {
            Ok(0) => {}
            Ok(count) => info!("deleted {count} expired pastes"),
            Err(err) => warn!("failed to purge expired pastes: {err}"),
        }
    }
}

async fn index(State(config): State<Config>) -> String {
    MAN_PAGE.replace("{base_url}", config.base_url())
}

async fn form() -> Html<&'static str> {
    Html(FORM_PAGE)
}

async fn upload_paste(
    State(mut app): State<App>,
    submission: Submission,
) -> crate::ApiResult<impl IntoResponse> {
    let (id, paste) = paste::create(&mut app, submission).await?;
    let path = format!("/{id}");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, path)],
        Json(paste::receipt(&app, id, &paste)),
    ))
}

async fn get_paste(
    State(mut app): State<App>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> crate::ApiResult<Response> {
    let paste = paste::fetch(&mut app, &id).await?;

    if params.get("json").map(String::as_str) == Some("true") {
        Ok(Json(paste::document(id, paste)).into_response())
    } else {
        Ok(paste.content.into_response())
    }
}
