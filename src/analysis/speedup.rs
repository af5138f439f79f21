//! Speed-up ratio aggregation
//!
//! Rows are grouped by `(Function, Init. Condition)`. Within a group each model is reduced
//! to its maximum `Mean` (the slowest rank dominates a parallel solve), and the ordered
//! list of maxima is folded into a single ratio.

use crate::common::{ConditionKey, GroupKey, ResultRow, ResultTable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during aggregation
#[derive(Error, Debug)]
pub enum SpeedupError {
    #[error("Group {function} / {condition} contains no models")]
    EmptyGroup { function: String, condition: String },
}

type Result<T> = core::result::Result<T, SpeedupError>;

/// How the per-model maxima of a group are folded into one ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatioChain {
    /// Divide the running value by every following maximum in turn.
    ///
    /// `[10, 5, 2]` folds to `(10 / 5) / 2 = 1.0`. With two models this is
    /// the plain baseline-over-model ratio.
    #[default]
    Sequential,
    /// Divide the first maximum by the last one; models in between are ignored.
    ///
    /// `[10, 5, 2]` gives `10 / 2 = 5.0`.
    FirstOverLast,
}

impl FromStr for RatioChain {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(RatioChain::Sequential),
            "first-over-last" => Ok(RatioChain::FirstOverLast),
            other => Err(format!(
                "unknown ratio chain '{}', expected 'sequential' or 'first-over-last'",
                other
            )),
        }
    }
}

/// Maximum `Mean` of one model inside a group
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMaximum {
    pub model: String,
    pub max_mean: f64,
}

/// Aggregated result for one `(Function, Init. Condition)` group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpeedup {
    pub key: GroupKey,
    /// Condition label as first written in the group's rows
    pub condition: String,
    /// Models in first-occurrence order
    pub models: Vec<ModelMaximum>,
    pub ratio: f64,
}

/// Speed-up ratios of one case, in group key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedupSummary {
    pub groups: Vec<GroupSpeedup>,
}

impl SpeedupSummary {
    pub fn ratios(&self) -> Vec<f64> {
        self.groups.iter().map(|group| group.ratio).collect()
    }

    pub fn conditions(&self) -> Vec<&str> {
        self.groups
            .iter()
            .map(|group| group.condition.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Groups the rows of `table` by [`GroupKey`], keeping table order inside each group
///
/// Conditions are keyed once for the whole table (see [`ConditionKey::column`]).
/// Rows with a blank function or condition belong to no group.
pub fn group_rows(table: &ResultTable) -> BTreeMap<GroupKey, Vec<&ResultRow>> {
    let mut groups: BTreeMap<GroupKey, Vec<&ResultRow>> = BTreeMap::new();

    for (row, condition) in table.rows.iter().zip(ConditionKey::column(table)) {
        let Some(condition) = condition.filter(|_| !row.function.trim().is_empty()) else {
            debug!(
                function = %row.function,
                condition = %row.condition,
                "skipping row without a group key"
            );
            continue;
        };

        groups
            .entry(GroupKey::new(row.function.clone(), condition))
            .or_default()
            .push(row);
    }

    groups
}

/// Reduces each distinct model in `rows` to its maximum mean
///
/// Models appear in the order they are first encountered. Missing and NaN means are
/// skipped; a model with no usable mean at all has a NaN maximum.
pub fn model_maxima(rows: &[&ResultRow]) -> Vec<ModelMaximum> {
    let mut maxima: Vec<ModelMaximum> = Vec::new();

    for row in rows {
        // f64::max returns the other operand when one side is NaN
        let mean = row.mean.unwrap_or(f64::NAN);
        match maxima.iter_mut().find(|entry| entry.model == row.model) {
            Some(entry) => entry.max_mean = entry.max_mean.max(mean),
            None => maxima.push(ModelMaximum {
                model: row.model.clone(),
                max_mean: mean,
            }),
        }
    }

    maxima
}

/// Folds ordered per-model maxima into a ratio; `None` if there are none.
///
/// A single maximum is returned unchanged: there is nothing to divide by.
pub fn fold_ratio(maxima: &[f64], chain: RatioChain) -> Option<f64> {
    let (&first, rest) = maxima.split_first()?;

    let ratio = match chain {
        RatioChain::Sequential => rest.iter().fold(first, |running, &max| running / max),
        RatioChain::FirstOverLast => match rest.last() {
            Some(&last) => first / last,
            None => first,
        },
    };

    Some(ratio)
}

/// Computes one speed-up ratio per group of `table`
///
/// # Arguments
/// * `table` - Combined rows of a case
/// * `chain` - How per-model maxima are folded
///
/// # Returns
/// * `Ok(SpeedupSummary)` - Groups in key order with their ratios
/// * `Err(SpeedupError)` - If a group has no models
pub fn compute_speedups(table: &ResultTable, chain: RatioChain) -> Result<SpeedupSummary> {
    let mut summary = SpeedupSummary::default();

    for (key, rows) in group_rows(table) {
        let condition = rows[0].condition.clone();
        let models = model_maxima(&rows);
        let maxima: Vec<f64> = models.iter().map(|model| model.max_mean).collect();

        let ratio = fold_ratio(&maxima, chain).ok_or_else(|| SpeedupError::EmptyGroup {
            function: key.function.clone(),
            condition: condition.clone(),
        })?;

        if models.len() == 1 {
            warn!(
                function = %key.function,
                condition = %condition,
                model = %models[0].model,
                "group has a single model, reporting its raw maximum instead of a ratio"
            );
        }

        debug!(
            function = %key.function,
            condition = %condition,
            rows = rows.len(),
            ?models,
            ratio,
            "aggregated group"
        );

        summary.groups.push(GroupSpeedup {
            key,
            condition,
            models,
            ratio,
        });
    }

    Ok(summary)
}
