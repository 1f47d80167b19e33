use crate::error::{PhenopermError, Result};
use crate::ranked_list::RankedList;
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Read access shared by a dataset and the views built on top of it
pub trait DatasetView {
    fn name(&self) -> &str;
    fn num_rows(&self) -> usize;
    fn num_cols(&self) -> usize;
    fn row_name(&self, row: usize) -> Result<&str>;
    fn column_name(&self, col: usize) -> Result<&str>;
    /// Row holding `name`, if any
    fn row_index(&self, name: &str) -> Option<usize>;
    fn row(&self, row: usize) -> Result<&[f64]>;
    fn column(&self, col: usize) -> Result<Vec<f64>>;

    fn element(&self, row: usize, col: usize) -> Result<f64> {
        let values = self.row(row)?;
        values
            .get(col)
            .copied()
            .ok_or_else(|| PhenopermError::out_of_range("columns", col, values.len()))
    }
}

/// Dense named matrix: rows are features such as genes, columns are samples
#[derive(Clone, PartialEq, Serialize)]
pub struct Dataset {
    name: String,
    row_names: Vec<String>,
    column_names: Vec<String>,
    /// row-major, `num_rows * num_cols`
    values: Vec<f64>,
    #[serde(skip)]
    row_index: HashMap<String, usize>,
    #[serde(skip)]
    column_index: HashMap<String, usize>,
}

fn index_names(names: &[String], context: &str) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        if index.insert(name.clone(), i).is_some() {
            return Err(PhenopermError::DuplicateName {
                name: name.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(index)
}

impl Dataset {
    pub fn new(
        name: impl Into<String>,
        row_names: Vec<String>,
        column_names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Dataset> {
        let name = name.into();
        if rows.len() != row_names.len() {
            return Err(PhenopermError::SizeMismatch {
                what: format!("rows of dataset {}", name),
                left: rows.len(),
                right: row_names.len(),
            });
        }
        let num_cols = column_names.len();
        let mut values = Vec::with_capacity(rows.len() * num_cols);
        for row in rows {
            if row.len() != num_cols {
                return Err(PhenopermError::SizeMismatch {
                    what: format!("columns of dataset {}", name),
                    left: row.len(),
                    right: num_cols,
                });
            }
            values.extend(row);
        }
        let row_index = index_names(&row_names, "dataset rows")?;
        let column_index = index_names(&column_names, "dataset columns")?;

        Ok(Dataset {
            name,
            row_names,
            column_names,
            values,
            row_index,
            column_index,
        })
    }

    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// New dataset keeping the given columns, in the given order
    pub fn subset_columns(&self, name: impl Into<String>, columns: &[usize]) -> Result<Dataset> {
        let num_cols = self.num_cols();
        if let Some(&col) = columns.iter().find(|&&c| c >= num_cols) {
            return Err(PhenopermError::out_of_range(
                format!("columns of dataset {}", self.name),
                col,
                num_cols,
            ));
        }

        let rows: Vec<Vec<f64>> = (0..self.num_rows())
            .map(|r| {
                let row = &self.values[r * num_cols..(r + 1) * num_cols];
                columns.iter().map(|&c| row[c]).collect()
            })
            .collect();
        let column_names = columns.iter().map(|&c| self.column_names[c].clone()).collect();

        Dataset::new(name, self.row_names.clone(), column_names, rows)
    }
}

impl DatasetView for Dataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_rows(&self) -> usize {
        self.row_names.len()
    }

    fn num_cols(&self) -> usize {
        self.column_names.len()
    }

    fn row_name(&self, row: usize) -> Result<&str> {
        self.row_names
            .get(row)
            .map(|s| s.as_str())
            .ok_or_else(|| PhenopermError::out_of_range("rows", row, self.row_names.len()))
    }

    fn column_name(&self, col: usize) -> Result<&str> {
        self.column_names
            .get(col)
            .map(|s| s.as_str())
            .ok_or_else(|| PhenopermError::out_of_range("columns", col, self.column_names.len()))
    }

    fn row_index(&self, name: &str) -> Option<usize> {
        self.row_index.get(name).copied()
    }

    fn row(&self, row: usize) -> Result<&[f64]> {
        if row >= self.num_rows() {
            return Err(PhenopermError::out_of_range("rows", row, self.num_rows()));
        }
        let num_cols = self.num_cols();
        Ok(&self.values[row * num_cols..(row + 1) * num_cols])
    }

    fn column(&self, col: usize) -> Result<Vec<f64>> {
        if col >= self.num_cols() {
            return Err(PhenopermError::out_of_range("columns", col, self.num_cols()));
        }
        Ok(self.values.iter().skip(col).step_by(self.num_cols()).copied().collect())
    }
}

/// Cut `text` to at most `max` characters, ending with "..." when shortened
fn truncate_display(text: String, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}   Rows: {}   Columns: {}", self.name, self.num_rows(), self.num_cols())?;

        let columns_string = self.column_names.join("\t");
        let truncated_columns = truncate_display(columns_string, 100);
        writeln!(f, "{:<20} {}", "", truncated_columns)?;

        // Limit to the first 20 rows
        for (r, row_name) in self.row_names.iter().enumerate().take(20) {
            let num_cols = self.num_cols();
            let row_display = self.values[r * num_cols..(r + 1) * num_cols]
                .iter()
                .map(|v| format!("{:.2}", v))
                .collect::<Vec<_>>()
                .join("\t");
            let truncated_row = truncate_display(row_display, 80);
            writeln!(f, "{:<20} {}", row_name, truncated_row)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// What a score is sorted on
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum SortMode {
    Real,
    Absolute,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum Order {
    Descending,
    Ascending,
}

/// Row permutation with one score per addressed row: view row `i` reads source row `address[i]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressedVector {
    address: Vec<usize>,
    score: Vec<f64>,
}

impl AddressedVector {
    pub fn new(address: Vec<usize>, score: Vec<f64>) -> Result<AddressedVector> {
        if address.len() != score.len() {
            return Err(PhenopermError::SizeMismatch {
                what: "addressed vector".to_string(),
                left: address.len(),
                right: score.len(),
            });
        }
        Ok(AddressedVector { address, score })
    }

    /// Sort row scores and remember where each came from. Ties keep their source order, NaN goes
    /// last.
    pub fn from_scores(scores: &[f64], sort_mode: SortMode, order: Order) -> AddressedVector {
        let key = |i: usize| match sort_mode {
            SortMode::Real => scores[i],
            SortMode::Absolute => scores[i].abs(),
        };

        let mut address: Vec<usize> = (0..scores.len()).collect();
        address.sort_by(|&a, &b| {
            let (ka, kb) = (key(a), key(b));
            match (ka.is_nan(), kb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => {
                    let ord = ka.partial_cmp(&kb).unwrap_or(Ordering::Equal);
                    match order {
                        Order::Ascending => ord,
                        Order::Descending => ord.reverse(),
                    }
                }
            }
        });
        let score = address.iter().map(|&i| scores[i]).collect();

        AddressedVector { address, score }
    }

    pub fn size(&self) -> usize {
        self.address.len()
    }

    pub fn address(&self, i: usize) -> Result<usize> {
        self.address
            .get(i)
            .copied()
            .ok_or_else(|| PhenopermError::out_of_range("addressed vector", i, self.address.len()))
    }

    pub fn score(&self, i: usize) -> Result<f64> {
        self.score
            .get(i)
            .copied()
            .ok_or_else(|| PhenopermError::out_of_range("addressed vector", i, self.score.len()))
    }

    pub fn addresses(&self) -> &[usize] {
        &self.address
    }

    pub fn scores(&self) -> &[f64] {
        &self.score
    }
}

/// Reordered, scored view over a dataset. Only the row names and scores are copied; row values are
/// read through the address permutation from the source matrix.
pub struct ScoredDataset<'a> {
    name: String,
    source: &'a Dataset,
    address: Vec<usize>,
    scores: Vec<f64>,
    row_names: Vec<String>,
    row_index: HashMap<String, usize>,
}

impl<'a> ScoredDataset<'a> {
    /// Expose the first `requested_size` rows of `vector` over `dataset`
    pub fn new(
        requested_size: usize,
        vector: &AddressedVector,
        dataset: &'a Dataset,
    ) -> Result<ScoredDataset<'a>> {
        if requested_size > vector.size() {
            return Err(PhenopermError::SizeMismatch {
                what: "requested rows vs addressed vector".to_string(),
                left: requested_size,
                right: vector.size(),
            });
        }
        if vector.size() > dataset.num_rows() {
            return Err(PhenopermError::SizeMismatch {
                what: format!("addressed vector vs rows of dataset {}", dataset.name()),
                left: vector.size(),
                right: dataset.num_rows(),
            });
        }

        let address: Vec<usize> = vector.addresses()[..requested_size].to_vec();
        let scores: Vec<f64> = vector.scores()[..requested_size].to_vec();
        let row_names = address
            .iter()
            .map(|&a| dataset.row_name(a).map(String::from))
            .collect::<Result<Vec<String>>>()?;
        let row_index = index_names(&row_names, "scored dataset rows")?;
        debug!(
            "Scored view of {} with {} of {} rows",
            dataset.name(),
            requested_size,
            dataset.num_rows()
        );

        Ok(ScoredDataset {
            name: format!("{}_scored", dataset.name()),
            source: dataset,
            address,
            scores,
            row_names,
            row_index,
        })
    }

    pub fn source(&self) -> &Dataset {
        self.source
    }

    pub fn score(&self, row: usize) -> Result<f64> {
        self.scores
            .get(row)
            .copied()
            .ok_or_else(|| PhenopermError::out_of_range("scored rows", row, self.scores.len()))
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Source row read for view row `row`
    pub fn source_row(&self, row: usize) -> Result<usize> {
        self.address
            .get(row)
            .copied()
            .ok_or_else(|| PhenopermError::out_of_range("scored rows", row, self.address.len()))
    }

    pub fn to_ranked_list(&self) -> Result<RankedList> {
        RankedList::new(self.name.clone(), self.row_names.clone(), self.scores.clone())
    }
}

impl<'a> DatasetView for ScoredDataset<'a> {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_rows(&self) -> usize {
        self.address.len()
    }

    fn num_cols(&self) -> usize {
        self.source.num_cols()
    }

    fn row_name(&self, row: usize) -> Result<&str> {
        self.row_names
            .get(row)
            .map(|s| s.as_str())
            .ok_or_else(|| PhenopermError::out_of_range("scored rows", row, self.row_names.len()))
    }

    fn column_name(&self, col: usize) -> Result<&str> {
        self.source.column_name(col)
    }

    fn row_index(&self, name: &str) -> Option<usize> {
        self.row_index.get(name).copied()
    }

    fn row(&self, row: usize) -> Result<&[f64]> {
        self.source.row(self.source_row(row)?)
    }

    /// Columns would need every row remapped through the address permutation
    fn column(&self, _col: usize) -> Result<Vec<f64>> {
        Err(PhenopermError::NotImplemented {
            operation: "column access on a scored dataset".to_string(),
        })
    }
}
