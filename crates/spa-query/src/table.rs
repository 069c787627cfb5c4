use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Synonym name to the values bound to it, one column per synonym. Columns are row-aligned: row
/// `i` of every column comes from the same underlying tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    columns: IndexMap<String, Vec<String>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One column; values are sorted so output is deterministic.
    pub fn single<T: Ord + Display>(synonym: &str, values: impl IntoIterator<Item = T>) -> Self {
        let mut values: Vec<T> = values.into_iter().collect();
        values.sort();
        let mut columns = IndexMap::new();
        columns.insert(
            synonym.to_string(),
            values.iter().map(ToString::to_string).collect(),
        );
        Self { columns }
    }

    /// One column of values rendered elsewhere. Numeric values sort numerically and ahead of
    /// names.
    pub fn rendered(synonym: &str, values: impl IntoIterator<Item = String>) -> Self {
        let mut values: Vec<String> = values.into_iter().collect();
        values.sort_by_cached_key(|value| {
            let number = value.parse::<u64>().ok();
            (number.is_none(), number, value.clone())
        });
        let mut columns = IndexMap::new();
        columns.insert(synonym.to_string(), values);
        Self { columns }
    }

    /// Two row-aligned columns, sorted by tuple.
    pub fn pairs<L, R>(first: &str, second: &str, pairs: impl IntoIterator<Item = (L, R)>) -> Self
    where
        L: Ord + Display,
        R: Ord + Display,
    {
        let mut pairs: Vec<(L, R)> = pairs.into_iter().collect();
        pairs.sort();
        let mut columns = IndexMap::new();
        columns.insert(
            first.to_string(),
            pairs.iter().map(|(l, _)| l.to_string()).collect(),
        );
        columns.insert(
            second.to_string(),
            pairs.iter().map(|(_, r)| r.to_string()).collect(),
        );
        Self { columns }
    }

    pub fn column(&self, synonym: &str) -> Option<&[String]> {
        self.columns.get(synonym).map(Vec::as_slice)
    }

    pub fn synonyms(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn rows(&self) -> Vec<Vec<&str>> {
        (0..self.row_count())
            .map(|i| self.columns.values().map(|col| col[i].as_str()).collect())
            .collect()
    }

    /// The plain map handed to the join stage.
    pub fn into_map(self) -> HashMap<String, Vec<String>> {
        self.columns.into_iter().collect()
    }
}

/// Values appearing in either position of `pairs`: the pair set merged with its transpose,
/// projected onto the first position.
pub fn mirror<T: Clone + Eq + Hash>(pairs: &HashSet<(T, T)>) -> HashSet<T> {
    let transposed = pairs.iter().map(|(a, b)| (b.clone(), a.clone()));
    pairs
        .iter()
        .cloned()
        .chain(transposed)
        .map(|(first, _)| first)
        .collect()
}

pub fn truth_value(result: bool) -> &'static str {
    if result {
        "TRUE"
    } else {
        "FALSE"
    }
}
