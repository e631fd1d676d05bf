use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
    error::{NnError, Result},
    network::example::Example,
};

/// Running statistics of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NumericStats {
    min: f64,
    max: f64,
    count: usize,
    mean: f64,
    /// Sum of squared deviations from the mean (Welford's M2).
    m2: f64,
}

impl NumericStats {
    fn new(value: f64) -> NumericStats {
        NumericStats { min: value, max: value, count: 1, mean: value, m2: 0.0 }
    }

    fn push(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    fn variance(&self) -> f64 {
        self.m2 / self.count as f64
    }
}

/// How one raw column is turned into features.
#[derive(Debug, Clone, PartialEq)]
enum ColumnEncoding {
    Label,
    Numeric,
    OneHot(Vec<String>),
}

/// Encodes raw string rows into fixed-width `Example`s.
///
/// Rows are collected with `add_row`. `process_features` then freezes the
/// encoding: a column whose every value parses as `f64` becomes one min-max
/// scaled feature, any other column becomes a one-hot block over its sorted
/// distinct values. The label column must be numeric and is scaled the same
/// way. A `scale` of `0.0` disables min-max scaling.
#[derive(Debug, Clone)]
pub struct Dataset {
    field_names: Vec<String>,
    label_index: usize,
    scale: f64,
    rows: Vec<Vec<String>>,
    /// Stats for columns that have only held numbers so far.
    numeric: BTreeMap<usize, NumericStats>,
    /// Distinct raw values per column.
    distinct: BTreeMap<usize, BTreeSet<String>>,
    non_numeric: BTreeSet<usize>,
    encodings: Option<Vec<ColumnEncoding>>,
    output_features: Vec<String>,
}

impl Dataset {
    pub fn new<S: Into<String>>(
        field_names: impl IntoIterator<Item = S>,
        label_index: usize,
        scale: f64,
    ) -> Result<Dataset> {
        let field_names: Vec<String> = field_names.into_iter().map(Into::into).collect();
        if label_index >= field_names.len() {
            return Err(NnError::LabelIndexOutOfRange {
                index: label_index,
                fields: field_names.len(),
            });
        }
        Ok(Dataset {
            field_names,
            label_index,
            scale,
            rows: Vec::new(),
            numeric: BTreeMap::new(),
            distinct: BTreeMap::new(),
            non_numeric: BTreeSet::new(),
            encodings: None,
            output_features: Vec::new(),
        })
    }

    /// Records one raw row and updates the per-column statistics.
    ///
    /// Adding rows after `process_features` discards the frozen encoding.
    pub fn add_row<S: AsRef<str>>(&mut self, fields: &[S]) -> Result<()> {
        if fields.len() != self.field_names.len() {
            return Err(NnError::FieldCountMismatch {
                expected: self.field_names.len(),
                actual: fields.len(),
            });
        }
        let row: Vec<String> = fields.iter().map(|f| f.as_ref().trim().to_string()).collect();
        let label = &row[self.label_index];
        if label.parse::<f64>().is_err() {
            return Err(NnError::NonNumericLabel(label.clone()));
        }
        for (i, raw) in row.iter().enumerate() {
            match raw.parse::<f64>() {
                Ok(value) => {
                    self.numeric
                        .entry(i)
                        .and_modify(|stats| stats.push(value))
                        .or_insert_with(|| NumericStats::new(value));
                }
                Err(_) => {
                    self.non_numeric.insert(i);
                }
            }
            self.distinct.entry(i).or_default().insert(raw.clone());
        }
        self.rows.push(row);
        self.encodings = None;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Freezes the column encodings and names the output features.
    pub fn process_features(&mut self) {
        let mut encodings = Vec::with_capacity(self.field_names.len());
        let mut output_features = Vec::new();

        for (i, name) in self.field_names.iter().enumerate() {
            if i == self.label_index {
                encodings.push(ColumnEncoding::Label);
            } else if self.non_numeric.contains(&i) {
                let values: Vec<String> = self.distinct
                    .get(&i)
                    .map(|set| set.iter().cloned().collect())
                    .unwrap_or_default();
                output_features.extend(values.iter().map(|v| format!("{name}_{v}")));
                encodings.push(ColumnEncoding::OneHot(values));
            } else {
                output_features.push(name.clone());
                encodings.push(ColumnEncoding::Numeric);
            }
        }

        debug!(
            rows = self.rows.len(),
            columns = self.field_names.len(),
            features = output_features.len(),
            "processed dataset features"
        );
        self.encodings = Some(encodings);
        self.output_features = output_features;
    }

    /// Names of the encoded features, in feature-vector order.
    pub fn output_features(&self) -> &[String] {
        &self.output_features
    }

    /// Width of every encoded feature vector.
    pub fn num_features(&self) -> usize {
        self.output_features.len()
    }

    /// Min-max scales `value` into `[0, scale]`. Returns `0.0` for a constant
    /// column and `value` unchanged when scaling is disabled.
    pub fn scale_value(&self, value: f64, min: f64, max: f64) -> f64 {
        if self.scale == 0.0 {
            value
        } else if min == max {
            0.0
        } else {
            (value - min) * self.scale / (max - min)
        }
    }

    /// Inverts the label scaling so predictions read in original units.
    pub fn unscale_label(&self, value: f64) -> f64 {
        match self.numeric.get(&self.label_index) {
            Some(stats) if self.scale != 0.0 => value * (stats.max - stats.min) / self.scale + stats.min,
            _ => value,
        }
    }

    /// Running mean of a numeric column.
    pub fn mean(&self, column: usize) -> Option<f64> {
        self.numeric_stats(column).map(|s| s.mean)
    }

    /// Population standard deviation of a numeric column.
    pub fn std_dev(&self, column: usize) -> Option<f64> {
        self.numeric_stats(column).map(|s| s.variance().sqrt())
    }

    fn numeric_stats(&self, column: usize) -> Option<&NumericStats> {
        if self.non_numeric.contains(&column) {
            return None;
        }
        self.numeric.get(&column)
    }

    /// Encodes one raw row with the frozen encoding.
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S]) -> Result<Example> {
        let encodings = self.encodings.as_ref().ok_or(NnError::FeaturesNotProcessed)?;
        if fields.len() != self.field_names.len() {
            return Err(NnError::FieldCountMismatch {
                expected: self.field_names.len(),
                actual: fields.len(),
            });
        }

        let mut features = Vec::with_capacity(self.output_features.len());
        let mut label = 0.0;
        for (i, (encoding, raw)) in encodings.iter().zip(fields).enumerate() {
            let raw = raw.as_ref().trim();
            match encoding {
                ColumnEncoding::Label => {
                    let value: f64 = raw.parse()
                        .map_err(|_| NnError::NonNumericLabel(raw.to_string()))?;
                    label = self.scale_numeric(i, value);
                }
                ColumnEncoding::Numeric => {
                    // Unparseable cells in a numeric column encode as 0.
                    let value = raw.parse::<f64>().ok();
                    features.push(match value {
                        Some(v) => self.scale_numeric(i, v),
                        None => 0.0,
                    });
                }
                ColumnEncoding::OneHot(values) => {
                    features.extend(values.iter().map(|v| if v == raw { 1.0 } else { 0.0 }));
                }
            }
        }
        Ok(Example { features, label })
    }

    fn scale_numeric(&self, column: usize, value: f64) -> f64 {
        match self.numeric.get(&column) {
            Some(stats) => self.scale_value(value, stats.min, stats.max),
            None => value,
        }
    }

    /// Encodes every recorded row, in insertion order.
    pub fn examples(&self) -> Result<Vec<Example>> {
        if self.encodings.is_none() {
            return Err(NnError::FeaturesNotProcessed);
        }
        self.rows.iter()
            .map(|row| self.encode_row(row.as_slice()))
            .collect()
    }
}
