//! Single binary web server: JSON API over the tournament engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, TOURNAMENT_TTL_HOURS.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use football_tournament_web::{
    complete_group_stage, create_tournament, generate_next_round, record_score, redraw_bracket,
    standings_csv, ErrorKind, MemoryStore, NewTournament, ServerConfig, Tournament,
    TournamentError, TournamentId, TournamentStore,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

type AppState = Data<dyn TournamentStore>;

/// How many tournaments the public listing returns.
const RECENT_LIMIT: usize = 20;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct ScoreBody {
    score1: i64,
    score2: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: String,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e.kind() {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body),
        ErrorKind::Precondition => HttpResponse::Conflict().json(body),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body),
    }
}

/// Load, apply `op`, and save only if it succeeded.
fn update(
    state: &AppState,
    id: TournamentId,
    op: impl FnOnce(&mut Tournament) -> Result<(), TournamentError>,
) -> HttpResponse {
    let mut tournament = match state.load(id) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    match op(&mut tournament) {
        Ok(()) => {
            let response = HttpResponse::Ok().json(&tournament);
            state.save(tournament);
            response
        }
        Err(e) => {
            log::debug!("Tournament {id}: rejected: {e}");
            error_response(&e)
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "football-tournament-web",
    })
}

/// Create a tournament; groups are drawn immediately.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    match create_tournament(body.into_inner(), &mut rand::thread_rng()) {
        Ok(tournament) => {
            let response = HttpResponse::Created().json(&tournament);
            state.save(tournament);
            response
        }
        Err(e) => error_response(&e),
    }
}

/// Most recent tournaments, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.list_recent(RECENT_LIMIT))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.load(path.id) {
        Ok(t) => HttpResponse::Ok().json(&t),
        Err(e) => error_response(&e),
    }
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.delete(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let tournament = match state.load(path.id) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    match standings_csv(&tournament) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => {
            log::error!("Tournament {}: CSV export failed: {e}", path.id);
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": "export failed" }))
        }
    }
}

/// Score any match (group or knockout).
#[post("/api/tournaments/{id}/matches/{match_id}/score")]
async fn api_record_score(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    update(&state, path.id, |t| {
        record_score(t, &path.match_id, body.score1, body.score2)
    })
}

/// Groups → qualifiers → bracket.
#[post("/api/tournaments/{id}/complete-groups")]
async fn api_complete_groups(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| complete_group_stage(t, &mut rand::thread_rng()))
}

#[post("/api/tournaments/{id}/knockout/redraw")]
async fn api_redraw_knockout(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| redraw_bracket(t, &mut rand::thread_rng()))
}

/// 2v2 only: draw the next knockout round from reshuffled winners.
#[post("/api/tournaments/{id}/knockout/next-round")]
async fn api_next_round(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update(&state, path.id, |t| generate_next_round(t, &mut rand::thread_rng()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let memory = Arc::new(MemoryStore::new());
    let store: Arc<dyn TournamentStore> = memory.clone();
    let state: AppState = Data::from(store);

    // Background task: every 30 minutes, remove tournaments inactive for longer than the TTL
    let timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = memory.purge_inactive(timeout);
            if removed > 0 {
                log::info!("Cleaned up {removed} inactive tournament(s)");
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_standings_csv)
            .service(api_record_score)
            .service(api_complete_groups)
            .service(api_redraw_knockout)
            .service(api_next_round)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
