use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One exported tally row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyRow {
    pub code: String,
    pub count: u64,
}

/// Per-code acceptance counts, kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TallyStore {
    rows: Vec<TallyRow>,
    index: HashMap<String, usize>,
}

impl TallyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `code`, inserting it at 1 when unseen.
    pub fn record(&mut self, code: &str) -> u64 {
        match self.index.get(code) {
            Some(&slot) => {
                let row = &mut self.rows[slot];
                row.count += 1;
                row.count
            }
            None => {
                self.index.insert(code.to_string(), self.rows.len());
                self.rows.push(TallyRow {
                    code: code.to_string(),
                    count: 1,
                });
                1
            }
        }
    }

    pub fn count(&self, code: &str) -> u64 {
        self.index
            .get(code)
            .map(|&slot| self.rows[slot].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TallyRow] {
        &self.rows
    }

    /// `(code, count)` pairs in first-seen order.
    pub fn export(&self) -> Vec<(String, u64)> {
        self.rows
            .iter()
            .map(|row| (row.code.clone(), row.count))
            .collect()
    }

    /// One `code,count` line per entry, newline separated.
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{},{}", row.code, row.count))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
