use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::seq::IndexedRandom;
use serde::Serialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::similarity;
use crate::state::AppState;

/// Minimum similarity score for a stored question to count as a match.
/// Deliberately low: a weak match beats no answer at all.
const MATCH_THRESHOLD: f64 = 0.1;

const FALLBACK_ANSWER: &str = "I dont understand anything!!!";

#[derive(Debug, Serialize)]
struct AskResponse<'a> {
    answer: &'a str,
}

#[derive(Debug, Serialize)]
struct TeachResponse<'a> {
    msg: &'a str,
    data: TeachData<'a>,
}

#[derive(Debug, Serialize)]
struct TeachData<'a> {
    ask: &'a str,
    ans: &'a str,
}

/// Single endpoint dispatching on `type`.
///
/// The query string is split by hand rather than through the usual Query
/// extractor because teach must store parameter values verbatim: a taught
/// answer of `hello+there` stays `hello+there`. Only the ask branch
/// percent-decodes its input.
pub async fn simv3(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let params = parse_raw_query(query.as_deref().unwrap_or(""));

    match param(&params, "type") {
        None => Err(ApiError::BadRequest(
            "Missing query parameter \"type\"".to_string(),
        )),
        Some("ask") => ask_sim(&state, &params).await,
        Some("teach") => teach_sim(&state, &params).await,
        Some(_) => Err(ApiError::BadRequest(
            "Invalid value for query parameter \"type\"".to_string(),
        )),
    }
}

async fn ask_sim(state: &AppState, params: &HashMap<String, String>) -> Result<Response, ApiError> {
    let missing = || ApiError::BadRequest("Missing query parameter \"ask\"".to_string());

    let raw = param(params, "ask").ok_or_else(missing)?;
    let ask = urlencoding::decode(raw)
        .map_err(|_| ApiError::BadRequest("Invalid value for query parameter \"ask\"".to_string()))?
        .into_owned();
    if ask.is_empty() {
        return Err(missing());
    }

    let questions = state.store.list_questions().await?;

    if let Some(best) = similarity::find_best_match(&ask, &questions) {
        if best.score >= MATCH_THRESHOLD {
            // Without a uniqueness constraint there may be several rows for
            // the matched question; pick a row, then an answer, uniformly.
            let entries = state.store.find_all_by_question(&best.target).await?;

            let mut rng = rand::rng();
            let picked = entries
                .choose(&mut rng)
                .and_then(|entry| entry.answers.choose(&mut rng));

            if let Some(answer) = picked {
                return Ok(Json(AskResponse { answer }).into_response());
            }
        }
    }

    Ok(Json(AskResponse {
        answer: FALLBACK_ANSWER,
    })
    .into_response())
}

async fn teach_sim(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<Response, ApiError> {
    let missing =
        || ApiError::BadRequest("Missing query parameters \"ask\" or \"ans\"".to_string());

    let ask = param(params, "ask").ok_or_else(missing)?;
    let ans = param(params, "ans").ok_or_else(missing)?;

    match state.store.find_by_question(ask).await? {
        Some(entry) => {
            if entry.answers.iter().any(|existing| existing == ans) {
                // Expected outcome, not an HTTP error: 200 with an error field.
                return Ok(Json(json!({ "error": "The answer already exists!" })).into_response());
            }
            state.store.append_answer(ask, ans).await?;
        }
        None => {
            state.store.create_entry(ask, ans).await?;
        }
    }

    Ok(Json(TeachResponse {
        msg: "Teach sim success",
        data: TeachData { ask, ans },
    })
    .into_response())
}

/// Splits a query string into key/value pairs without any decoding. The
/// first occurrence of a key wins; a key with no `=` maps to the empty
/// string.
fn parse_raw_query(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    params
}

/// Looks up a parameter, treating empty values as absent.
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_query_values_stay_verbatim() {
        let params = parse_raw_query("type=teach&ask=hello%20there&ans=hi+you");
        assert_eq!(params.get("ask").map(String::as_str), Some("hello%20there"));
        assert_eq!(params.get("ans").map(String::as_str), Some("hi+you"));
    }

    #[test]
    fn first_occurrence_of_a_key_wins() {
        let params = parse_raw_query("type=ask&type=teach");
        assert_eq!(params.get("type").map(String::as_str), Some("ask"));
    }

    #[test]
    fn bare_keys_count_as_empty() {
        let params = parse_raw_query("type&ask=");
        assert_eq!(param(&params, "type"), None);
        assert_eq!(param(&params, "ask"), None);
    }

    #[test]
    fn empty_query_yields_no_params() {
        assert!(parse_raw_query("").is_empty());
    }

    #[test]
    fn response_bodies_serialize_to_wire_shape() {
        let ask = serde_json::to_value(AskResponse { answer: "hi" }).expect("serialize");
        assert_eq!(ask, json!({ "answer": "hi" }));

        let teach = serde_json::to_value(TeachResponse {
            msg: "Teach sim success",
            data: TeachData {
                ask: "hello",
                ans: "hello+there",
            },
        })
        .expect("serialize");
        assert_eq!(
            teach,
            json!({
                "msg": "Teach sim success",
                "data": { "ask": "hello", "ans": "hello+there" }
            })
        );
    }
}
