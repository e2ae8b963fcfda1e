use anyhow::{anyhow, Context, Result};
use std::{
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};

use tracing::info;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use super::http_layers::{
    log_requests, rate_limit_error_handler, IpKeyExtractor, EVENTS_PER_MINUTE, LOGIN_PER_MINUTE,
    SEARCH_PER_MINUTE,
};
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::*;
use super::ServerConfig;
use crate::admin::NewAdmin;
use crate::catalog_store::{
    FieldUpdate, NewSong, SearchCriteria, SongListItem, SongUpdate,
};
use crate::errors::ServiceError;
use crate::pagination::{resolve_pagination, resolve_sort};

/// Sortable columns on the admin song listing. Anything else falls back
/// to the default title ordering.
const SONG_SORT_FIELDS: &[&str] = &["title", "code"];

#[derive(Serialize)]
struct HealthResponse {
    name: &'static str,
    status: &'static str,
    db: &'static str,
    uptime: String,
    hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct PagedResponse<T> {
    page: i64,
    limit: i64,
    items: Vec<T>,
}

#[derive(Deserialize, Debug)]
struct SearchSongsQuery {
    title: Option<String>,
    artist: Option<String>,
    lyrics: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PageQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct PopularQuery {
    limit: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct SearchEventBody {
    term: String,
    found: bool,
    song_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CategoryClickBody {
    category_id: String,
}

#[derive(Deserialize, Debug)]
struct LoginBody {
    email: String,
    password: String,
}

#[derive(Deserialize, Debug)]
struct ForgotPasswordBody {
    email: String,
}

#[derive(Deserialize, Debug)]
struct ResetPasswordBody {
    token: String,
    new_password: String,
}

#[derive(Deserialize, Debug)]
struct CreateAdminBody {
    name: String,
    email: String,
    password: String,
    address: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreateSongBody {
    title: String,
    code: String,
    lyrics: Option<String>,
    performer: Option<String>,
    #[serde(default)]
    artist_ids: Vec<String>,
    #[serde(default)]
    category_ids: Vec<String>,
}

/// Distinguishes an absent JSON field from an explicit null: absent maps
/// to the outer None, null to Some(None).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Default)]
struct UpdateSongBody {
    title: Option<String>,
    code: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    lyrics: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    performer: Option<Option<String>>,
    artist_ids: Option<Vec<String>>,
    category_ids: Option<Vec<String>>,
}

impl From<UpdateSongBody> for SongUpdate {
    fn from(body: UpdateSongBody) -> Self {
        fn tri_state(field: Option<Option<String>>) -> FieldUpdate<String> {
            match field {
                None => FieldUpdate::Keep,
                Some(None) => FieldUpdate::Clear,
                Some(Some(value)) => FieldUpdate::Set(value),
            }
        }

        SongUpdate {
            title: body.title,
            code: body.code,
            lyrics: tri_state(body.lyrics),
            performer: tri_state(body.performer),
            artist_ids: body.artist_ids,
            category_ids: body.category_ids,
        }
    }
}

#[derive(Deserialize, Debug)]
struct AdminSongsQuery {
    page: Option<i64>,
    limit: Option<i64>,
    sort: Option<String>,
    order: Option<String>,
}

async fn health(State(state): State<ServerState>) -> Response {
    let db_up = state.catalog_store.ping().is_ok();
    let response = HealthResponse {
        name: "catalog-server",
        status: if db_up { "ok" } else { "degraded" },
        db: if db_up { "up" } else { "down" },
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    if db_up {
        Json(response).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
    }
}

async fn search_songs(
    State(catalog_store): State<GuardedCatalogStore>,
    Query(query): Query<SearchSongsQuery>,
) -> Response {
    let criteria = match SearchCriteria::from_inputs(
        query.title.as_deref(),
        query.artist.as_deref(),
        query.lyrics.as_deref(),
    ) {
        Some(criteria) => criteria,
        None => {
            return ServiceError::Validation(
                "At least one of title, artist or lyrics is required".into(),
            )
            .into_response()
        }
    };
    let page = resolve_pagination(query.page, query.limit);
    match catalog_store.search_songs(&criteria, &page) {
        Ok(items) => paged_response(page.page, page.limit, items),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

fn paged_response(page: i64, limit: i64, items: Vec<SongListItem>) -> Response {
    Json(PagedResponse { page, limit, items }).into_response()
}

async fn get_song(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> Response {
    match catalog_store.get_song_detail(&id) {
        Ok(Some(detail)) => Json(detail).into_response(),
        Ok(None) => ServiceError::NotFound.into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn popular_songs(
    State(event_recorder): State<GuardedEventRecorder>,
    Query(query): Query<PopularQuery>,
) -> Response {
    match event_recorder.popular(query.limit) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_categories(State(catalog_store): State<GuardedCatalogStore>) -> Response {
    match catalog_store.list_categories() {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn list_category_songs(
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = resolve_pagination(query.page, query.limit);
    match catalog_store.list_songs_by_category(&id, &page) {
        Ok(items) => paged_response(page.page, page.limit, items),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn post_search_event(
    State(event_recorder): State<GuardedEventRecorder>,
    Json(body): Json<SearchEventBody>,
) -> Response {
    match event_recorder.record_search(&body.term, body.found, body.song_id.as_deref()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn post_category_click(
    State(event_recorder): State<GuardedEventRecorder>,
    Json(body): Json<CategoryClickBody>,
) -> Response {
    match event_recorder.record_category_click(&body.category_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn login(
    State(admin_manager): State<GuardedAdminManager>,
    jar: CookieJar,
    Json(body): Json<LoginBody>,
) -> Response {
    match admin_manager.login(&body.email, &body.password) {
        Ok(session) => {
            let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, session.token.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .build();
            (jar.add(cookie), Json(session)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// Sessions are stateless JWTs; logout just clears the cookie and lets the
/// token age out.
async fn logout(jar: CookieJar) -> Response {
    let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .build();
    (jar.remove(cookie), StatusCode::NO_CONTENT).into_response()
}

async fn forgot_password(
    State(admin_manager): State<GuardedAdminManager>,
    Json(body): Json<ForgotPasswordBody>,
) -> Response {
    // 204 regardless of whether the email is known
    match admin_manager.forgot_password(&body.email) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn reset_password(
    State(admin_manager): State<GuardedAdminManager>,
    Json(body): Json<ResetPasswordBody>,
) -> Response {
    match admin_manager.reset_password(&body.token, &body.new_password) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_admin(
    _session: Session,
    State(admin_manager): State<GuardedAdminManager>,
    Json(body): Json<CreateAdminBody>,
) -> Response {
    let new_admin = NewAdmin {
        name: body.name,
        email: body.email,
        password: body.password,
        address: body.address,
    };
    match admin_manager.create_admin(&new_admin) {
        Ok(id) => (StatusCode::CREATED, Json(json!({"id": id}))).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn admin_create_song(
    _session: Session,
    State(catalog_store): State<GuardedCatalogStore>,
    Json(body): Json<CreateSongBody>,
) -> Response {
    if body.title.trim().is_empty() || body.code.trim().is_empty() {
        return ServiceError::Validation("Title and code must not be empty".into())
            .into_response();
    }
    let new_song = NewSong {
        title: body.title,
        code: body.code,
        lyrics: body.lyrics,
        performer: body.performer,
        artist_ids: body.artist_ids,
        category_ids: body.category_ids,
    };
    match catalog_store.create_song(&new_song) {
        Ok(id) => (StatusCode::CREATED, Json(json!({"id": id}))).into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn admin_update_song(
    _session: Session,
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
    Json(body): Json<UpdateSongBody>,
) -> Response {
    let update = SongUpdate::from(body);
    if update.is_empty() {
        return ServiceError::Validation("Update carries no fields".into()).into_response();
    }
    match catalog_store.update_song(&id, &update) {
        Ok(true) => Json(json!({"updated": true})).into_response(),
        Ok(false) => ServiceError::NotFound.into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn admin_delete_song(
    _session: Session,
    State(catalog_store): State<GuardedCatalogStore>,
    Path(id): Path<String>,
) -> Response {
    match catalog_store.delete_song(&id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => ServiceError::NotFound.into_response(),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

async fn admin_list_songs(
    _session: Session,
    State(catalog_store): State<GuardedCatalogStore>,
    Query(query): Query<AdminSongsQuery>,
) -> Response {
    let page = resolve_pagination(query.page, query.limit);
    let sort = resolve_sort(
        query.sort.as_deref(),
        SONG_SORT_FIELDS,
        query.order.as_deref(),
    );
    match catalog_store.list_songs(&page, sort) {
        Ok(items) => paged_response(page.page, page.limit, items),
        Err(err) => ServiceError::from(err).into_response(),
    }
}

/// Wraps a router in a per-IP governor allowing `per_minute` requests with
/// matching burst capacity.
fn with_ip_rate_limit(router: Router, per_minute: u32) -> Result<Router> {
    let config = GovernorConfigBuilder::default()
        .key_extractor(IpKeyExtractor)
        .period(Duration::from_secs(60) / per_minute)
        .burst_size(per_minute)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit configuration"))?;
    Ok(router.layer(
        GovernorLayer::new(Arc::new(config)).error_handler(rate_limit_error_handler),
    ))
}

pub fn make_app(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    admin_manager: GuardedAdminManager,
    event_recorder: GuardedEventRecorder,
) -> Result<Router> {
    let state = ServerState::new(
        config.clone(),
        catalog_store,
        admin_manager,
        event_recorder,
    );

    let mut search_routes: Router = Router::new()
        .route("/songs/search", get(search_songs))
        .route("/songs/popular", get(popular_songs))
        .with_state(state.clone());

    let mut event_routes: Router = Router::new()
        .route("/search", post(post_search_event))
        .route("/category-click", post(post_category_click))
        .with_state(state.clone());

    let mut login_routes: Router = Router::new()
        .route("/login", post(login))
        .with_state(state.clone());

    if !config.disable_rate_limit {
        search_routes = with_ip_rate_limit(search_routes, SEARCH_PER_MINUTE)?;
        event_routes = with_ip_rate_limit(event_routes, EVENTS_PER_MINUTE)?;
        login_routes = with_ip_rate_limit(login_routes, LOGIN_PER_MINUTE)?;
    }

    let public_routes: Router = Router::new()
        .route("/health", get(health))
        .route("/songs/{id}", get(get_song))
        .route("/categories", get(list_categories))
        .route("/categories/{id}/songs", get(list_category_songs))
        .with_state(state.clone());

    let admin_routes: Router = Router::new()
        .route("/", post(create_admin))
        .route("/logout", post(logout))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/songs", post(admin_create_song).get(admin_list_songs))
        .route(
            "/songs/{id}",
            put(admin_update_song).delete(admin_delete_song),
        )
        .with_state(state.clone());

    let app: Router = Router::new()
        .merge(public_routes)
        .merge(search_routes)
        .nest("/events", event_routes)
        .nest("/admin", admin_routes.merge(login_routes))
        .layer(middleware::from_fn_with_state(state, log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    admin_manager: GuardedAdminManager,
    event_recorder: GuardedEventRecorder,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_store, admin_manager, event_recorder)?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .context(format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    })
    .await?;
    Ok(())
}
