//! JavaScript bindings.
//!
//! A browser front end hands over a [`MarketSpec`] with string ids and gets
//! back placements, rosters, rank buckets, and any blocking pairs in one
//! object. The run always verifies stability.

use crate::da::{
    BlockingPair, DaConfig, DaRunner, Market, MarketSpec, Placement, RankBuckets, Roster,
};
use crate::error::MatchError;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// One applicant's outcome, flattened for JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementEntry {
    pub applicant: String,
    pub resource: Option<String>,
    pub rank: Option<usize>,
}

/// Everything a caller needs to render a finished run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingOutput {
    pub placements: Vec<PlacementEntry>,
    pub rosters: Vec<Roster<String, String>>,
    pub buckets: RankBuckets<String>,
    pub blocking_pairs: Vec<BlockingPair<String, String>>,
    pub proposals: usize,
}

/// Runs a verified matching over a plain-data market.
pub fn run_spec(spec: MarketSpec<String, String>, config: &DaConfig) -> Result<MatchingOutput, MatchError> {
    let market: Market<String, String> = spec.into();
    let result = DaRunner::run(market, &config.clone().with_verification(true))?;
    let matching = &result.matching;

    let placements = matching
        .placements()
        .into_iter()
        .map(|(applicant, placement)| match placement {
            Placement::Matched { resource, rank } => PlacementEntry {
                applicant,
                resource: Some(resource),
                rank: Some(rank),
            },
            Placement::Unmatched => PlacementEntry {
                applicant,
                resource: None,
                rank: None,
            },
        })
        .collect();

    Ok(MatchingOutput {
        placements,
        rosters: matching.rosters(),
        buckets: matching.rank_buckets(),
        blocking_pairs: result
            .stability
            .as_ref()
            .map(|report| report.blocking_pairs.clone())
            .unwrap_or_default(),
        proposals: result.proposals,
    })
}

/// `runMatching(market)`: runs deferred acceptance on a market object.
///
/// Errors come back as a JavaScript string describing the problem.
#[wasm_bindgen(js_name = runMatching)]
pub fn run_matching(input: JsValue) -> Result<JsValue, JsValue> {
    let spec: MarketSpec<String, String> = serde_wasm_bindgen::from_value(input)?;
    let output = run_spec(spec, &DaConfig::default()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&output).map_err(Into::into)
}
