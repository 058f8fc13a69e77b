//! Single binary web server: dashboard HTML from templates/, static from /static, league API via REST.
//! Run with: DB_URL=sqlite://league.db cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080). A `.env` file is read if present.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use dart_league_web::{
    add_player, compute_leaderboard, ensure_schema, leaderboard_csv, list_matches, list_players,
    record_match, wipe_all, Config, Database, LeagueError, MatchId, NewMatch, Player, PlayerId,
    Variant,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Shared database handle; each request opens and drops its own connection.
type AppState = Data<Database>;

/// Session key for the last selected game variant.
const SESSION_VARIANT_KEY: &str = "variant";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: game variant (e.g. /api/501/players, /api/cricket/leaderboard)
#[derive(Deserialize)]
struct VariantPath {
    variant: Variant,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

#[derive(Serialize)]
struct AddPlayerResponse {
    /// False when the name was already registered.
    added: bool,
    players: Vec<Player>,
}

#[derive(Serialize)]
struct RecordMatchResponse {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct MatchFilter {
    player_id: Option<PlayerId>,
}

#[derive(Deserialize, Serialize)]
struct VariantBody {
    variant: Variant,
}

/// Error body for a failed league operation: 400 for bad input, 500 otherwise.
fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_user_error() {
        log::warn!("Rejected request: {}", e);
        HttpResponse::BadRequest().json(body)
    } else {
        log::error!("Request failed: {}", e);
        HttpResponse::InternalServerError().json(body)
    }
}

/// Run `f` on the blocking pool with a fresh connection, released when `f` returns.
async fn with_connection<T, F>(state: &AppState, f: F) -> Result<T, HttpResponse>
where
    F: FnOnce(&mut Connection) -> Result<T, LeagueError> + Send + 'static,
    T: Send + 'static,
{
    let db = state.clone();
    let result = web::block(move || -> Result<T, LeagueError> {
        let mut conn = db.connect()?;
        f(&mut conn)
    })
    .await;
    match result {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(e) => {
            log::error!("Blocking task failed: {}", e);
            Err(HttpResponse::InternalServerError().json(serde_json::json!({ "error": "internal error" })))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dart-league-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List all players of a variant (empty list if none).
#[get("/api/{variant}/players")]
async fn api_list_players(state: AppState, path: Path<VariantPath>) -> HttpResponse {
    let variant = path.variant;
    match with_connection(&state, move |conn| list_players(conn, variant)).await {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(resp) => resp,
    }
}

/// Register a player; an existing name is a no-op (`added: false`). Returns the updated player list.
#[post("/api/{variant}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<VariantPath>,
    body: Json<AddPlayerBody>,
) -> HttpResponse {
    let variant = path.variant;
    let name = body.into_inner().name;
    let result = with_connection(&state, move |conn| {
        let added = add_player(conn, variant, &name)?;
        Ok(AddPlayerResponse {
            added,
            players: list_players(conn, variant)?,
        })
    })
    .await;
    match result {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(resp) => resp,
    }
}

/// Record a finished match with both scores (one transaction).
#[post("/api/{variant}/matches")]
async fn api_record_match(
    state: AppState,
    path: Path<VariantPath>,
    body: Json<NewMatch>,
) -> HttpResponse {
    let variant = path.variant;
    let new_match = body.into_inner();
    match with_connection(&state, move |conn| record_match(conn, variant, &new_match)).await {
        Ok(match_id) => HttpResponse::Ok().json(RecordMatchResponse { match_id }),
        Err(resp) => resp,
    }
}

/// Match history, optionally only the matches of `?player_id=`.
#[get("/api/{variant}/matches")]
async fn api_list_matches(
    state: AppState,
    path: Path<VariantPath>,
    filter: Query<MatchFilter>,
) -> HttpResponse {
    let variant = path.variant;
    let player_id = filter.player_id;
    match with_connection(&state, move |conn| list_matches(conn, variant, player_id)).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(resp) => resp,
    }
}

#[get("/api/{variant}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<VariantPath>) -> HttpResponse {
    let variant = path.variant;
    match with_connection(&state, move |conn| compute_leaderboard(conn, variant)).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(resp) => resp,
    }
}

/// Leaderboard as a CSV download.
#[get("/api/{variant}/leaderboard/export")]
async fn api_leaderboard_export(state: AppState, path: Path<VariantPath>) -> HttpResponse {
    let variant = path.variant;
    let result = with_connection(&state, move |conn| {
        let rows = compute_leaderboard(conn, variant)?;
        leaderboard_csv(&rows)
    })
    .await;
    match result {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(format!(
                    "leaderboard_{}.csv",
                    variant.slug()
                ))],
            })
            .body(csv),
        Err(resp) => resp,
    }
}

/// Last selected variant for this browser (501 if never set).
#[get("/api/session/variant")]
async fn api_get_session_variant(session: Session) -> HttpResponse {
    let variant = session
        .get::<Variant>(SESSION_VARIANT_KEY)
        .ok()
        .flatten()
        .unwrap_or_default();
    HttpResponse::Ok().json(VariantBody { variant })
}

#[put("/api/session/variant")]
async fn api_set_session_variant(session: Session, body: Json<VariantBody>) -> HttpResponse {
    match session.insert(SESSION_VARIANT_KEY, body.variant) {
        Ok(()) => HttpResponse::Ok().json(VariantBody {
            variant: body.variant,
        }),
        Err(e) => {
            log::error!("Could not store session variant: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "session error" }))
        }
    }
}

/// JSON API routes (shared by the server and the handler tests).
fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_get_session_variant)
        .service(api_set_session_variant)
        .service(api_list_players)
        .service(api_add_player)
        .service(api_record_match)
        .service(api_list_matches)
        .service(api_leaderboard)
        .service(api_leaderboard_export);
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .build()
}

/// Create (or, with `wipe`, recreate) the league tables before serving.
fn init_schema(db: &Database, wipe: bool) -> rusqlite::Result<()> {
    let mut conn = db.connect()?;
    if wipe {
        wipe_all(&mut conn)?;
    }
    ensure_schema(&mut conn)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Before the logger so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    if let Ok(path) = dotenv {
        log::info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let db = Database::new(&config.database_path);
    init_schema(&db, config.wipe_on_start).map_err(|e| {
        log::error!("Could not prepare database {}: {}", db.path().display(), e);
        std::io::Error::other(e)
    })?;
    log::info!("Using database {}", db.path().display());

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(db);
    // Sessions only hold the selected variant, so a per-process key is enough.
    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(session_middleware(key.clone()))
            .route("/", web::get().to(serve_index_async))
            .service(favicon)
            .configure(api_routes)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};
    use dart_league_web::{LeaderboardRow, MatchRow};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn state() -> (TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("league.db"));
        init_schema(&db, false).unwrap();
        (dir, Data::new(db))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .wrap(session_middleware(Key::generate()))
                    .configure(api_routes),
            )
            .await
        };
    }

    fn add(variant: &str, name: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri(&format!("/api/{variant}/players"))
            .set_json(json!({ "name": name }))
    }

    #[actix_web::test]
    async fn health_is_ok() {
        let (_dir, state) = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["ok"], true);
    }

    #[actix_web::test]
    async fn adding_a_player_twice_reports_no_op() {
        let (_dir, state) = state();
        let app = app!(state);

        let first: Value = test::call_and_read_body_json(&app, add("501", "Ata").to_request()).await;
        assert_eq!(first["added"], true);
        let second: Value = test::call_and_read_body_json(&app, add("501", "Ata").to_request()).await;
        assert_eq!(second["added"], false);
        assert_eq!(second["players"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn empty_name_is_a_bad_request() {
        let (_dir, state) = state();
        let app = app!(state);
        let resp = test::call_service(&app, add("cricket", "  ").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn unknown_variant_is_not_found() {
        let (_dir, state) = state();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/301/players").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn match_flow_through_the_api() {
        let (_dir, state) = state();
        let app = app!(state);
        for name in ["A", "B", "C"] {
            test::call_service(&app, add("cricket", name).to_request()).await;
        }
        let req = test::TestRequest::get().uri("/api/cricket/players").to_request();
        let players: Vec<Player> = test::call_and_read_body_json(&app, req).await;
        let id = |name: &str| players.iter().find(|p| p.name == name).unwrap().id;

        let req = test::TestRequest::post()
            .uri("/api/cricket/matches")
            .set_json(json!({ "player1_id": id("A"), "player2_id": id("B"), "score1": 3, "score2": 1 }))
            .to_request();
        let recorded: Value = test::call_and_read_body_json(&app, req).await;
        let match_id = recorded["match_id"].as_i64().unwrap();

        let req = test::TestRequest::get()
            .uri(&format!("/api/cricket/matches?player_id={}", id("B")))
            .to_request();
        let history: Vec<MatchRow> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].match_id, match_id);
        assert_eq!((history[0].player1_score, history[0].player2_score), (3, 1));

        let req = test::TestRequest::get()
            .uri(&format!("/api/cricket/matches?player_id={}", id("C")))
            .to_request();
        let history: Vec<MatchRow> = test::call_and_read_body_json(&app, req).await;
        assert!(history.is_empty());

        let req = test::TestRequest::get().uri("/api/cricket/leaderboard").to_request();
        let board: Vec<LeaderboardRow> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(board.len(), 3);
        assert_eq!(board[0].name, "A");
        assert_eq!(board[0].total_points, 3);

        let req = test::TestRequest::get().uri("/api/501/leaderboard").to_request();
        let board: Vec<LeaderboardRow> = test::call_and_read_body_json(&app, req).await;
        assert!(board.is_empty());
    }

    #[actix_web::test]
    async fn invalid_matches_are_bad_requests() {
        let (_dir, state) = state();
        let app = app!(state);
        test::call_service(&app, add("501", "A").to_request()).await;

        for body in [
            json!({ "player1_id": 1, "player2_id": 42, "score1": 3, "score2": 1 }),
            json!({ "player1_id": 1, "player2_id": 1, "score1": 3, "score2": 1 }),
            json!({ "player1_id": 1, "player2_id": 2, "score1": -1, "score2": 1 }),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/501/matches")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let req = test::TestRequest::get().uri("/api/501/matches").to_request();
        let history: Vec<MatchRow> = test::call_and_read_body_json(&app, req).await;
        assert!(history.is_empty());
    }

    #[actix_web::test]
    async fn leaderboard_export_is_csv() {
        let (_dir, state) = state();
        let app = app!(state);
        test::call_service(&app, add("501", "Ata").to_request()).await;

        let req = test::TestRequest::get().uri("/api/501/leaderboard/export").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/csv; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["rank,name,matches_played,total_points,sets_won,sets_lost", "1,Ata,0,0,0,0"]
        );
    }

    #[actix_web::test]
    async fn session_remembers_variant() {
        let (_dir, state) = state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/session/variant").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["variant"], "501");

        let req = test::TestRequest::put()
            .uri("/api/session/variant")
            .set_json(json!({ "variant": "cricket" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.response().cookies().next().unwrap().into_owned();

        let req = test::TestRequest::get()
            .uri("/api/session/variant")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["variant"], "cricket");
    }
}
