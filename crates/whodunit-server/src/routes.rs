use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use whodunit_engine::{
    AccuserStatement, Clue, GuessOutcome, Location, Solution, Suspect, SuspectDossier,
    validate_tries,
};

use crate::{
    alias::{alias_beliefs, canonical_suspect, canonical_weapon, suspect_alias},
    error::HttpApiError,
    state::AppState,
};

type ApiResult<T> = Result<Json<T>, HttpApiError>;

const SUCCESS: &str = "success";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GameIdQuery {
    game_id: Option<String>,
}

impl GameIdQuery {
    fn id(&self) -> &str {
        self.game_id.as_deref().unwrap_or_default()
    }
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        HttpApiError::bad_request("invalid_json", rejection.body_text(), None)
    })
}

#[derive(Debug, Serialize)]
pub(crate) struct StartGameResponse {
    status: &'static str,
    game_id: String,
    message: &'static str,
}

pub(crate) async fn start_game(State(state): State<AppState>) -> ApiResult<StartGameResponse> {
    let id = state.registry.start_game()?;
    Ok(Json(StartGameResponse {
        status: SUCCESS,
        game_id: id.to_string(),
        message: "Game started successfully",
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct Round1Response {
    status: &'static str,
    suspects: BTreeMap<&'static str, SuspectDossier>,
}

pub(crate) async fn round1_interview(
    State(state): State<AppState>,
    Query(query): Query<GameIdQuery>,
) -> ApiResult<Round1Response> {
    let dossiers = state.registry.interview(query.id())?;
    let suspects = dossiers
        .iter()
        .map(|(suspect, dossier)| (suspect_alias(suspect), dossier.clone()))
        .collect();
    Ok(Json(Round1Response {
        status: SUCCESS,
        suspects,
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct Round2Response {
    status: &'static str,
    alibi_claims: BTreeMap<&'static str, BTreeMap<Suspect, Location>>,
}

pub(crate) async fn round2_alibis(
    State(state): State<AppState>,
    Query(query): Query<GameIdQuery>,
) -> ApiResult<Round2Response> {
    let claims = state.registry.publish_alibis(query.id())?;
    let alibi_claims = claims
        .iter()
        .map(|(accuser, claims)| {
            let seen = claims
                .iter()
                .map(|claim| (claim.target, claim.location))
                .collect();
            (suspect_alias(accuser), seen)
        })
        .collect();
    Ok(Json(Round2Response {
        status: SUCCESS,
        alibi_claims,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyAlibiRequest {
    game_id: Option<String>,
    suspect_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerificationSummary {
    suspect: Suspect,
    claimed_location: Location,
    actual_location: Location,
    is_alibi_valid: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct Round3Response {
    status: &'static str,
    verification: VerificationSummary,
    others_statements: Vec<AccuserStatement>,
    most_suspected_suggestion: Option<Suspect>,
    current_probabilities: BTreeMap<&'static str, f64>,
}

pub(crate) async fn round3_verify_alibi(
    State(state): State<AppState>,
    payload: Result<Json<VerifyAlibiRequest>, JsonRejection>,
) -> ApiResult<Round3Response> {
    let request = parse_body(payload)?;
    let game_id = request.game_id.as_deref().unwrap_or_default();
    let suspect_name = request.suspect_name.as_deref().unwrap_or_default();
    debug!(game_id, suspect_name, "verify alibi request");

    let report = state
        .registry
        .verify_alibi(game_id, canonical_suspect(suspect_name))?;
    let verification = report.verification;
    Ok(Json(Round3Response {
        status: SUCCESS,
        verification: VerificationSummary {
            suspect: verification.suspect,
            claimed_location: verification.claimed_location,
            actual_location: verification.actual_location,
            is_alibi_valid: verification.is_alibi_valid,
        },
        others_statements: verification.statements,
        most_suspected_suggestion: report.suggestion,
        current_probabilities: alias_beliefs(&report.beliefs),
    }))
}

#[derive(Debug, Serialize)]
pub(crate) struct TopSuspect {
    name: &'static str,
    probability: f64,
    csp_valid: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct Round4Response {
    status: &'static str,
    top_suspects: Vec<TopSuspect>,
    current_probabilities: BTreeMap<&'static str, f64>,
    weapon_clue: Clue,
}

pub(crate) async fn round4_final_deduction(
    State(state): State<AppState>,
    Query(query): Query<GameIdQuery>,
) -> ApiResult<Round4Response> {
    let deduction = state.registry.final_deduction(query.id())?;
    let current_probabilities = alias_beliefs(&deduction.beliefs);
    let top_suspects = deduction
        .top_suspects
        .iter()
        .map(|ranked| {
            let name = suspect_alias(ranked.suspect);
            TopSuspect {
                name,
                probability: current_probabilities[name],
                csp_valid: ranked.csp_valid,
            }
        })
        .collect();
    Ok(Json(Round4Response {
        status: SUCCESS,
        top_suspects,
        current_probabilities,
        weapon_clue: deduction.weapon_clue,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct MakeGuessRequest {
    game_id: Option<String>,
    #[serde(alias = "killer")]
    killer_name: Option<String>,
    #[serde(alias = "guess_weapon")]
    weapon: Option<String>,
    tries_left: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub(crate) enum MakeGuessResponse {
    Success {
        correct: bool,
        message: String,
        tries_left: u8,
        elapsed_secs: u64,
    },
    Incorrect {
        correct: bool,
        tries_left: u8,
        killer_clue: Option<Clue>,
        weapon_clue: Clue,
        current_probabilities: BTreeMap<&'static str, f64>,
        hint: &'static str,
    },
    GameOver {
        correct: bool,
        message: String,
        solution: Solution,
    },
}

pub(crate) async fn make_guess(
    State(state): State<AppState>,
    payload: Result<Json<MakeGuessRequest>, JsonRejection>,
) -> ApiResult<MakeGuessResponse> {
    let request = parse_body(payload)?;
    let killer = request
        .killer_name
        .as_deref()
        .ok_or_else(|| HttpApiError::missing_field("killer_name"))?;
    let weapon = request
        .weapon
        .as_deref()
        .ok_or_else(|| HttpApiError::missing_field("weapon"))?;
    if let Some(tries_left) = request.tries_left {
        validate_tries(tries_left)?;
    }

    let outcome = state.registry.guess(
        request.game_id.as_deref().unwrap_or_default(),
        canonical_suspect(killer),
        canonical_weapon(weapon),
    )?;
    let response = match outcome {
        GuessOutcome::Solved {
            tries_remaining,
            elapsed_secs,
            ..
        } => MakeGuessResponse::Success {
            correct: true,
            message: "Correct! You solved the mystery!".to_owned(),
            tries_left: tries_remaining,
            elapsed_secs,
        },
        GuessOutcome::Incorrect {
            tries_remaining,
            killer_clue,
            weapon_clue,
            beliefs,
        } => MakeGuessResponse::Incorrect {
            correct: false,
            tries_left: tries_remaining,
            killer_clue,
            weapon_clue,
            current_probabilities: alias_beliefs(&beliefs),
            hint: "Probabilities updated based on your guess and clues. Focus on suspects with higher probabilities.",
        },
        GuessOutcome::Exhausted { solution } => MakeGuessResponse::GameOver {
            correct: false,
            message: format!("You've used all your guesses! The killer was {solution}."),
            solution,
        },
    };
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub(crate) struct GameStatusResponse {
    status: &'static str,
    game_id: String,
    state: whodunit_engine::SessionState,
    verified_suspects: Vec<Suspect>,
    current_probabilities: BTreeMap<&'static str, f64>,
    tries_left: u8,
}

pub(crate) async fn game_status(
    State(state): State<AppState>,
    Query(query): Query<GameIdQuery>,
) -> ApiResult<GameStatusResponse> {
    let status = state.registry.status(query.id())?;
    Ok(Json(GameStatusResponse {
        status: SUCCESS,
        game_id: status.session_id.to_string(),
        state: status.state,
        verified_suspects: status.checked_suspects,
        current_probabilities: alias_beliefs(&status.beliefs),
        tries_left: status.tries_remaining,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use whodunit_engine::{CaseSeed, GameConfig, GameSession, SessionRegistry, Weapon};

    use super::*;

    fn seeded_state(seed: u64) -> (AppState, String, Solution) {
        let registry = SessionRegistry::default();
        let session = GameSession::with_seed(GameConfig::default(), CaseSeed::from(seed)).unwrap();
        let solution = session.solution();
        let id = registry.insert(session).to_string();
        (AppState::new(Arc::new(registry)), id, solution)
    }

    fn query(id: &str) -> Query<GameIdQuery> {
        Query(GameIdQuery {
            game_id: Some(id.to_owned()),
        })
    }

    fn to_json<T: Serialize>(response: Json<T>) -> Value {
        serde_json::to_value(response.0).unwrap()
    }

    fn body<T>(value: Value) -> Result<Json<T>, JsonRejection>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(Json(serde_json::from_value(value).unwrap()))
    }

    #[tokio::test]
    async fn start_game_issues_an_id() {
        let state = AppState::new(Arc::new(SessionRegistry::default()));
        let json = to_json(start_game(State(state.clone())).await.unwrap());
        assert_eq!(json["status"], "success");
        let id = json["game_id"].as_str().unwrap();
        let status = to_json(game_status(State(state), query(id)).await.unwrap());
        assert_eq!(status["game_id"], id);
        assert_eq!(status["tries_left"], 3);
    }

    #[tokio::test]
    async fn game_status_is_stable_between_reads() {
        let (state, id, _) = seeded_state(12);
        round2_alibis(State(state.clone()), query(&id)).await.unwrap();
        let first = to_json(game_status(State(state.clone()), query(&id)).await.unwrap());
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let second = to_json(game_status(State(state), query(&id)).await.unwrap());
        assert_eq!(first, second);
        assert_eq!(first["state"], "alibis_published");
    }

    #[tokio::test]
    async fn full_game_through_handlers() {
        let (state, id, solution) = seeded_state(99);

        let round1 = to_json(round1_interview(State(state.clone()), query(&id)).await.unwrap());
        assert_eq!(round1["suspects"].as_object().unwrap().len(), Suspect::LEN);
        assert_eq!(round1["suspects"]["kate"]["name"], "Kate Ivory");

        let round2 = to_json(round2_alibis(State(state.clone()), query(&id)).await.unwrap());
        for alias in ["chris", "jason", "kate", "poppy", "violet", "zehab"] {
            assert_eq!(round2["alibi_claims"][alias].as_object().unwrap().len(), 2);
        }

        for alias in ["chris", "jason", "kate", "poppy", "violet", "zehab"] {
            let request = body(json!({ "game_id": id, "suspect_name": alias }));
            let round3 = to_json(round3_verify_alibi(State(state.clone()), request).await.unwrap());
            assert_eq!(round3["status"], "success");
            assert!(round3["current_probabilities"][alias].is_number());
        }

        let round4 = to_json(
            round4_final_deduction(State(state.clone()), query(&id))
                .await
                .unwrap(),
        );
        assert_eq!(round4["top_suspects"].as_array().unwrap().len(), 2);
        assert_eq!(round4["weapon_clue"], solution.weapon.clue().to_string());

        let request = body(json!({
            "game_id": id,
            "killer": suspect_alias(solution.killer),
            "guess_weapon": solution.weapon.name().to_lowercase(),
            "tries_left": 3,
        }));
        let guess = to_json(make_guess(State(state), request).await.unwrap());
        assert_eq!(guess["status"], "success");
        assert_eq!(guess["correct"], true);
    }

    #[tokio::test]
    async fn incorrect_guess_reveals_clues() {
        let (state, id, solution) = seeded_state(7);
        round2_alibis(State(state.clone()), query(&id)).await.unwrap();
        round4_final_deduction(State(state.clone()), query(&id))
            .await
            .unwrap();

        let innocent = solution.killer.others().next().unwrap();
        let request = body(json!({
            "game_id": id,
            "killer_name": innocent.name(),
            "weapon": solution.weapon.name(),
        }));
        let guess = to_json(make_guess(State(state), request).await.unwrap());
        assert_eq!(guess["status"], "incorrect");
        assert_eq!(guess["tries_left"], 2);
        assert_eq!(guess["weapon_clue"], solution.weapon.clue().to_string());
        assert_eq!(guess["current_probabilities"][suspect_alias(innocent)], 0.0);
    }

    #[tokio::test]
    async fn pipe_alias_resolves_to_lead_pipe() {
        let (state, id, solution) = seeded_state(1);
        round2_alibis(State(state.clone()), query(&id)).await.unwrap();
        round4_final_deduction(State(state.clone()), query(&id))
            .await
            .unwrap();
        let weapon = if solution.weapon == Weapon::LeadPipe {
            "pipe"
        } else {
            solution.weapon.name()
        };
        let request = body(json!({
            "game_id": id,
            "killer_name": suspect_alias(solution.killer),
            "weapon": weapon,
        }));
        let guess = to_json(make_guess(State(state), request).await.unwrap());
        assert_eq!(guess["status"], "success");

        assert_eq!(canonical_weapon("PIPE").parse::<Weapon>().unwrap(), Weapon::LeadPipe);
    }

    #[tokio::test]
    async fn rejects_out_of_range_tries() {
        let (state, id, _) = seeded_state(3);
        let request = body(json!({
            "game_id": id,
            "killer": "kate",
            "weapon": "rope",
            "tries_left": 5,
        }));
        let err = make_guess(State(state), request).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "invalid_tries_budget");
    }

    #[tokio::test]
    async fn missing_fields_are_reported() {
        let (state, id, _) = seeded_state(3);
        let request = body(json!({ "game_id": id, "killer": "kate" }));
        let err = make_guess(State(state), request).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.field, Some("weapon"));
    }

    #[tokio::test]
    async fn maps_errors_to_statuses() {
        let state = AppState::new(Arc::new(SessionRegistry::default()));
        let err = game_status(State(state), query("nope")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.code, "no_active_session");

        let (state, id, _) = seeded_state(4);
        let err = game_status(State(state.clone()), query("stale")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.code, "session_mismatch");

        let request = body(json!({ "game_id": id, "suspect_name": "kate" }));
        let err = round3_verify_alibi(State(state.clone()), request)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.body.code, "round_out_of_order");

        round2_alibis(State(state.clone()), query(&id)).await.unwrap();
        let request = body(json!({ "game_id": id, "suspect_name": "mustard" }));
        let err = round3_verify_alibi(State(state.clone()), request)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, "unknown_suspect");

        let request = body(json!({ "game_id": id, "suspect_name": "kate" }));
        round3_verify_alibi(State(state.clone()), request)
            .await
            .unwrap();
        let request = body(json!({ "game_id": id, "suspect_name": "kate" }));
        let err = round3_verify_alibi(State(state), request).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.body.code, "already_verified");
    }
}
