//! Binary classification over scaled feature rows.
//!
//! The concrete model is a k-nearest-neighbours classifier whose fitted state (the training
//! points and their labels) is shipped as a JSON artifact.

use crate::artifacts::parse_json;
use crate::constants::{DEFAULT_MINKOWSKI_P, DEFAULT_N_NEIGHBORS};
use crate::validation::ensure_finite;
use crate::{ArtifactKind, CardioError, CardioResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of classifying one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassScore {
    /// Predicted class, `0` or `1`.
    pub label: u8,
    /// Estimated probability of class `1`, in `[0, 1]`.
    pub positive_probability: f64,
}

/// A trained binary classifier.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Number of features each row must carry.
    fn n_features(&self) -> usize;

    /// Classify a scaled row.
    ///
    /// Implementations must derive `label` from the same score that produces
    /// `positive_probability`, so that the two never disagree.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::DimensionMismatch`] if `row` has the wrong width.
    fn predict(&self, row: &[f64]) -> CardioResult<ClassScore>;

    /// One-line description for diagnostics.
    fn describe(&self) -> String {
        format!("classifier over {} features", self.n_features())
    }
}

/// How neighbour votes are weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborWeights {
    /// Every neighbour counts equally.
    #[default]
    Uniform,
    /// Neighbours count by inverse distance.
    Distance,
}

impl fmt::Display for NeighborWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => f.write_str("uniform"),
            Self::Distance => f.write_str("distance"),
        }
    }
}

/// k-nearest-neighbours classifier with a Minkowski metric.
#[derive(Clone, Debug, PartialEq)]
pub struct KnnClassifier {
    n_neighbors: usize,
    weights: NeighborWeights,
    p: f64,
    fit_x: Vec<Vec<f64>>,
    fit_y: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KnnClassifierWire {
    #[serde(default = "default_n_neighbors")]
    n_neighbors: usize,
    #[serde(default)]
    weights: NeighborWeights,
    #[serde(default = "default_p")]
    p: f64,
    fit_x: Vec<Vec<f64>>,
    fit_y: Vec<u8>,
}

fn default_n_neighbors() -> usize {
    DEFAULT_N_NEIGHBORS
}

fn default_p() -> f64 {
    DEFAULT_MINKOWSKI_P
}

impl KnnClassifier {
    /// Create a classifier from its fitted state.
    ///
    /// # Errors
    ///
    /// Returns [`CardioError::InvalidArtifact`] if:
    /// - `fit_x` is empty, ragged, zero-width or holds non-finite values,
    /// - `fit_y` length differs from `fit_x` or holds a label other than 0 or 1,
    /// - `n_neighbors` is 0 or exceeds the number of fit points,
    /// - `p` is not finite or is below 1.
    pub fn new(
        n_neighbors: usize,
        weights: NeighborWeights,
        p: f64,
        fit_x: Vec<Vec<f64>>,
        fit_y: Vec<u8>,
    ) -> CardioResult<Self> {
        let kind = ArtifactKind::Classifier;

        let width = match fit_x.first() {
            Some(first) => first.len(),
            None => return Err(CardioError::invalid(kind, "fit_x must not be empty")),
        };
        if width == 0 {
            return Err(CardioError::invalid(kind, "fit_x rows must not be empty"));
        }
        for (idx, point) in fit_x.iter().enumerate() {
            if point.len() != width {
                return Err(CardioError::invalid(
                    kind,
                    format!(
                        "fit_x[{idx}] has {} features, expected {width}",
                        point.len()
                    ),
                ));
            }
            ensure_finite(kind, &format!("fit_x[{idx}]"), point)?;
        }

        if fit_y.len() != fit_x.len() {
            return Err(CardioError::invalid(
                kind,
                format!(
                    "fit_y has {} labels but fit_x has {} points",
                    fit_y.len(),
                    fit_x.len()
                ),
            ));
        }
        if let Some(idx) = fit_y.iter().position(|y| *y > 1) {
            return Err(CardioError::invalid(
                kind,
                format!("fit_y[{idx}] must be 0 or 1"),
            ));
        }

        if n_neighbors == 0 || n_neighbors > fit_x.len() {
            return Err(CardioError::invalid(
                kind,
                format!(
                    "n_neighbors must be between 1 and {}, got {n_neighbors}",
                    fit_x.len()
                ),
            ));
        }
        if !p.is_finite() || p < 1.0 {
            return Err(CardioError::invalid(
                kind,
                format!("p must be a finite number >= 1, got {p}"),
            ));
        }

        Ok(Self {
            n_neighbors,
            weights,
            p,
            fit_x,
            fit_y,
        })
    }

    /// Parse a classifier artifact from JSON.
    pub fn from_json_str(text: &str) -> CardioResult<Self> {
        let wire: KnnClassifierWire = parse_json(ArtifactKind::Classifier, text)?;
        Self::new(wire.n_neighbors, wire.weights, wire.p, wire.fit_x, wire.fit_y)
    }

    pub fn n_neighbors(&self) -> usize {
        self.n_neighbors
    }

    pub fn weights(&self) -> NeighborWeights {
        self.weights
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn n_samples(&self) -> usize {
        self.fit_x.len()
    }

    /// Class probabilities `[P(0), P(1)]` for a scaled row.
    pub fn predict_proba(&self, row: &[f64]) -> CardioResult<[f64; 2]> {
        if row.len() != self.n_features() {
            return Err(CardioError::DimensionMismatch {
                stage: "classifier",
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        let neighbors = self.nearest(row);
        let mut votes = [0.0_f64; 2];

        match self.weights {
            NeighborWeights::Uniform => {
                for &(_, label) in &neighbors {
                    votes[usize::from(label)] += 1.0;
                }
            }
            NeighborWeights::Distance => {
                // Exact matches take all the weight.
                let exact = neighbors.iter().any(|(distance, _)| *distance == 0.0);
                for &(distance, label) in &neighbors {
                    let weight = if exact {
                        if distance == 0.0 {
                            1.0
                        } else {
                            0.0
                        }
                    } else {
                        1.0 / distance
                    };
                    votes[usize::from(label)] += weight;
                }
            }
        }

        let mut total = votes[0] + votes[1];
        if !total.is_finite() || total <= 0.0 {
            // Distances overflowed (or underflowed) so inverse weights carry no signal.
            votes = [0.0, 0.0];
            for &(_, label) in &neighbors {
                votes[usize::from(label)] += 1.0;
            }
            total = neighbors.len() as f64;
        }
        Ok([votes[0] / total, votes[1] / total])
    }

    /// The `k` closest fit points as `(distance, label)`, nearest first.
    ///
    /// Equal distances keep fit order.
    fn nearest(&self, row: &[f64]) -> Vec<(f64, u8)> {
        let mut scored: Vec<(f64, usize)> = self
            .fit_x
            .iter()
            .enumerate()
            .map(|(idx, point)| (self.distance(row, point), idx))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        scored
            .into_iter()
            .take(self.n_neighbors)
            .map(|(distance, idx)| (distance, self.fit_y[idx]))
            .collect()
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let diffs = a.iter().zip(b).map(|(x, y)| (x - y).abs());
        if self.p == 1.0 {
            diffs.sum()
        } else if self.p == 2.0 {
            diffs.map(|d| d * d).sum::<f64>().sqrt()
        } else {
            diffs.map(|d| d.powf(self.p)).sum::<f64>().powf(1.0 / self.p)
        }
    }
}

impl Classifier for KnnClassifier {
    fn n_features(&self) -> usize {
        self.fit_x.first().map_or(0, Vec::len)
    }

    fn predict(&self, row: &[f64]) -> CardioResult<ClassScore> {
        let [negative, positive] = self.predict_proba(row)?;
        // Ties resolve to class 0.
        let label = u8::from(positive > negative);
        Ok(ClassScore {
            label,
            positive_probability: positive,
        })
    }

    fn describe(&self) -> String {
        format!(
            "k-nearest neighbours (k={}, weights={}, p={}, {} fit points)",
            self.n_neighbors,
            self.weights,
            self.p,
            self.n_samples()
        )
    }
}
