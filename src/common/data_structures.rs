use serde::{de, Deserialize, Deserializer};
use std::cmp::Ordering;
use std::fmt;

/// One measurement written by the benchmark harness
///
/// Text columns are kept exactly as written; only the numeric columns tolerate
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultRow {
    /// Benchmarked function, e.g. `solve()`
    #[serde(rename = "Function")]
    pub function: String,
    /// Load distribution the benchmark was run under
    #[serde(rename = "Init. Condition")]
    pub condition: String,
    /// Chemistry model variant, e.g. `Standard` or `loadBalanced`
    #[serde(rename = "Model")]
    pub model: String,
    /// Load balancing strategy; informational only
    #[serde(rename = "Balancer", default)]
    pub balancer: Option<String>,
    /// Mean wall time over all repetitions; `None` for an empty cell
    #[serde(rename = "Mean", deserialize_with = "measurement")]
    pub mean: Option<f64>,
    /// Standard deviation of the wall time; `None` for an empty cell
    #[serde(rename = "Stdev", deserialize_with = "measurement")]
    pub stdev: Option<f64>,
    /// Rank the row was recorded on, taken from the file name
    #[serde(skip)]
    pub processor: u32,
}

/// Reads a numeric cell, ignoring surrounding whitespace. Blank cells are missing values.
fn measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number '{}'", text))),
    }
}

/// Rows loaded from one case directory
///
/// A row's index is its position in [`ResultTable::rows`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Joins tables end to end; indices restart at 0.
    pub fn concat(tables: impl IntoIterator<Item = ResultTable>) -> Self {
        let rows = tables.into_iter().flat_map(|table| table.rows).collect();
        Self { rows }
    }
}

/// Sort key of an `Init. Condition` label
///
/// A whole column is keyed one way: numerically when every label in it is a number,
/// as text otherwise. Numeric keys compare by value, so `"2" < "10"` and `"1"` equals
/// `"1.0"`.
#[derive(Debug, Clone)]
pub enum ConditionKey {
    Number(f64),
    Text(String),
}

impl ConditionKey {
    /// Keys every condition of `table`, in row order
    ///
    /// Blank and `NaN` labels have no key and yield `None`.
    pub fn column(table: &ResultTable) -> Vec<Option<ConditionKey>> {
        let numbers: Option<Vec<Option<f64>>> = table
            .rows
            .iter()
            .map(|row| numeric_condition(&row.condition))
            .collect();

        match numbers {
            Some(numbers) => numbers
                .into_iter()
                .map(|number| number.map(ConditionKey::Number))
                .collect(),
            None => table
                .rows
                .iter()
                .map(|row| {
                    (!is_missing(&row.condition)).then(|| ConditionKey::Text(row.condition.clone()))
                })
                .collect(),
        }
    }
}

fn is_missing(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label.eq_ignore_ascii_case("nan")
}

/// `Some(None)` for a missing label, `Some(Some(value))` for a number, `None` for text.
fn numeric_condition(label: &str) -> Option<Option<f64>> {
    if is_missing(label) {
        return Some(None);
    }
    // Adding zero folds -0.0 into 0.0
    label.trim().parse::<f64>().ok().map(|value| Some(value + 0.0))
}

impl Ord for ConditionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ConditionKey::Number(a), ConditionKey::Number(b)) => a.total_cmp(b),
            (ConditionKey::Text(a), ConditionKey::Text(b)) => a.cmp(b),
            (ConditionKey::Number(_), ConditionKey::Text(_)) => Ordering::Less,
            (ConditionKey::Text(_), ConditionKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for ConditionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConditionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConditionKey {}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKey::Number(value) => write!(f, "{}", value),
            ConditionKey::Text(text) => f.write_str(text),
        }
    }
}

/// Rows sharing a key are aggregated together
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupKey {
    pub function: String,
    pub condition: ConditionKey,
}

impl GroupKey {
    pub fn new(function: impl Into<String>, condition: ConditionKey) -> Self {
        Self {
            function: function.into(),
            condition,
        }
    }
}

#[cfg(test)]
pub(crate) fn row(function: &str, condition: &str, model: &str, mean: f64) -> ResultRow {
    ResultRow {
        function: function.to_string(),
        condition: condition.to_string(),
        model: model.to_string(),
        balancer: None,
        mean: Some(mean),
        stdev: Some(0.0),
        processor: 0,
    }
}
