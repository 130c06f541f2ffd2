//! Input broadcasting: flexible call shapes → aligned evaluation batches.
//!
//! Callers may pass a single template or a list, and no values, one
//! assignment, or a 2-D batch of assignments, independently per side.
//! [`broadcast`] resolves the tagged unions once at the boundary and
//! produces equal-length, validated batches ready for composition and
//! submission.

use std::sync::Arc;

use ndarray::{Array1, Array2};

use rimfax_ir::CircuitTemplate;

use crate::error::{FidelityError, Side};

/// A single item or an ordered list, resolved once at the API boundary.
#[derive(Debug, Clone)]
pub enum OneOrMany<T> {
    /// A single item, replicated as broadcasting requires.
    One(T),
    /// An explicit ordered list.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Whether this input resolves to zero items.
    pub fn is_empty(&self) -> bool {
        match self {
            OneOrMany::One(_) => false,
            OneOrMany::Many(v) => v.is_empty(),
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(item: T) -> Self {
        OneOrMany::One(item)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

impl<T: Clone> From<&[T]> for OneOrMany<T> {
    fn from(items: &[T]) -> Self {
        OneOrMany::Many(items.to_vec())
    }
}

impl From<CircuitTemplate> for OneOrMany<Arc<CircuitTemplate>> {
    fn from(template: CircuitTemplate) -> Self {
        OneOrMany::One(Arc::new(template))
    }
}

impl From<&Arc<CircuitTemplate>> for OneOrMany<Arc<CircuitTemplate>> {
    fn from(template: &Arc<CircuitTemplate>) -> Self {
        OneOrMany::One(Arc::clone(template))
    }
}

/// Parameter values for one side of a run.
///
/// `Omitted` means an empty assignment for every item; `Single` is one
/// assignment; `Batch` is one assignment per item.
#[derive(Debug, Clone, Default)]
pub enum ParameterValues {
    /// No values: every item on this side gets an empty assignment.
    #[default]
    Omitted,
    /// One assignment.
    Single(Vec<f64>),
    /// One assignment per item.
    Batch(Vec<Vec<f64>>),
}

impl From<()> for ParameterValues {
    fn from((): ()) -> Self {
        ParameterValues::Omitted
    }
}

impl From<Vec<f64>> for ParameterValues {
    fn from(values: Vec<f64>) -> Self {
        ParameterValues::Single(values)
    }
}

impl From<&[f64]> for ParameterValues {
    fn from(values: &[f64]) -> Self {
        ParameterValues::Single(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for ParameterValues {
    fn from(values: [f64; N]) -> Self {
        ParameterValues::Single(values.to_vec())
    }
}

impl From<Vec<Vec<f64>>> for ParameterValues {
    fn from(rows: Vec<Vec<f64>>) -> Self {
        ParameterValues::Batch(rows)
    }
}

impl From<Array1<f64>> for ParameterValues {
    fn from(values: Array1<f64>) -> Self {
        ParameterValues::Single(values.to_vec())
    }
}

impl From<Array2<f64>> for ParameterValues {
    fn from(rows: Array2<f64>) -> Self {
        ParameterValues::Batch(rows.rows().into_iter().map(|r| r.to_vec()).collect())
    }
}

impl ParameterValues {
    fn into_rows(self) -> Option<Vec<Vec<f64>>> {
        match self {
            ParameterValues::Omitted => None,
            ParameterValues::Single(row) => Some(vec![row]),
            ParameterValues::Batch(rows) => Some(rows),
        }
    }
}

/// One aligned evaluation pair produced by broadcasting.
#[derive(Debug, Clone)]
pub struct EvaluationItem {
    /// Left state-preparation template.
    pub left: Arc<CircuitTemplate>,
    /// Right state-preparation template.
    pub right: Arc<CircuitTemplate>,
    /// Assignment for the left template's parameters.
    pub left_values: Vec<f64>,
    /// Assignment for the right template's parameters.
    pub right_values: Vec<f64>,
}

/// Resolve one side into equal-length circuit and value lists.
fn resolve_side(
    templates: OneOrMany<Arc<CircuitTemplate>>,
    values: ParameterValues,
    side: Side,
) -> Result<(Vec<Arc<CircuitTemplate>>, Vec<Vec<f64>>), FidelityError> {
    match templates {
        OneOrMany::One(template) => {
            // A single template replicates to the item count its own side's
            // values imply; with no count information anywhere this is 1.
            let rows = values.into_rows().unwrap_or_else(|| vec![vec![]]);
            let circuits = vec![template; rows.len()];
            Ok((circuits, rows))
        }
        OneOrMany::Many(circuits) => {
            let rows = match values.into_rows() {
                None => vec![vec![]; circuits.len()],
                Some(rows) => {
                    if rows.len() != circuits.len() {
                        return Err(FidelityError::ValueBatchMismatch {
                            side,
                            circuits: circuits.len(),
                            rows: rows.len(),
                        });
                    }
                    rows
                }
            };
            Ok((circuits, rows))
        }
    }
}

/// Align both sides into a validated batch of evaluation items.
///
/// See the error taxonomy on [`FidelityError`]: unequal broadcast lengths
/// are a size mismatch, per-item assignment arity a parameter-count error,
/// and a fully empty request a missing-input error.
pub fn broadcast(
    left: OneOrMany<Arc<CircuitTemplate>>,
    right: OneOrMany<Arc<CircuitTemplate>>,
    left_values: ParameterValues,
    right_values: ParameterValues,
) -> Result<Vec<EvaluationItem>, FidelityError> {
    let (left_circuits, left_rows) = resolve_side(left, left_values, Side::Left)?;
    let (right_circuits, right_rows) = resolve_side(right, right_values, Side::Right)?;

    if left_circuits.len() != right_circuits.len() {
        return Err(FidelityError::SizeMismatch {
            left: left_circuits.len(),
            right: right_circuits.len(),
        });
    }
    if left_circuits.is_empty() {
        // A zero-length batch is indistinguishable from a caller omission.
        return Err(FidelityError::MissingInput);
    }

    for (index, ((left, right), (lrow, rrow))) in left_circuits
        .iter()
        .zip(&right_circuits)
        .zip(left_rows.iter().zip(&right_rows))
        .enumerate()
    {
        check_arity(index, Side::Left, left, lrow)?;
        check_arity(index, Side::Right, right, rrow)?;
    }

    Ok(left_circuits
        .into_iter()
        .zip(right_circuits)
        .zip(left_rows.into_iter().zip(right_rows))
        .map(|((left, right), (left_values, right_values))| EvaluationItem {
            left,
            right,
            left_values,
            right_values,
        })
        .collect())
}

fn check_arity(
    index: usize,
    side: Side,
    template: &CircuitTemplate,
    row: &[f64],
) -> Result<(), FidelityError> {
    if row.len() != template.parameter_count() {
        return Err(FidelityError::ParameterCount {
            index,
            side,
            expected: template.parameter_count(),
            actual: row.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimfax_ir::{ParameterExpression, QubitId};

    fn rotations(n: u32) -> Arc<CircuitTemplate> {
        let mut t = CircuitTemplate::new("rot", n);
        for q in 0..n {
            t.rx(ParameterExpression::symbol(format!("p{q}")), QubitId(q))
                .unwrap();
        }
        Arc::new(t)
    }

    fn bare(n: u32) -> Arc<CircuitTemplate> {
        Arc::new(CircuitTemplate::new("bare", n))
    }

    #[test]
    fn test_single_pair_defaults_to_one_item() {
        let items = broadcast(
            OneOrMany::One(bare(2)),
            OneOrMany::One(bare(2)),
            ParameterValues::Omitted,
            ParameterValues::Omitted,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].left_values.is_empty());
        assert!(items[0].right_values.is_empty());
    }

    #[test]
    fn test_single_template_replicates_over_batch() {
        let items = broadcast(
            OneOrMany::One(rotations(2)),
            OneOrMany::One(rotations(2)),
            ParameterValues::Batch(vec![vec![0.0, 0.1], vec![0.2, 0.3], vec![0.4, 0.5]]),
            ParameterValues::Batch(vec![vec![0.0; 2]; 3]),
        )
        .unwrap();
        assert_eq!(items.len(), 3);
        assert!(Arc::ptr_eq(&items[0].left, &items[2].left));
        assert_eq!(items[1].left_values, [0.2, 0.3]);
    }

    #[test]
    fn test_omitted_values_mean_empty_assignments() {
        let circuits = vec![bare(1), bare(1)];
        let items = broadcast(
            OneOrMany::Many(circuits.clone()),
            OneOrMany::Many(circuits),
            ParameterValues::Omitted,
            ParameterValues::Omitted,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.left_values.is_empty()));
    }

    #[test]
    fn test_size_mismatch() {
        let err = broadcast(
            OneOrMany::Many(vec![bare(1); 3]),
            OneOrMany::Many(vec![bare(1); 4]),
            ParameterValues::Omitted,
            ParameterValues::Omitted,
        )
        .unwrap_err();
        assert!(matches!(err, FidelityError::SizeMismatch { left: 3, right: 4 }));
    }

    #[test]
    fn test_value_batch_mismatch() {
        let err = broadcast(
            OneOrMany::Many(vec![rotations(1); 4]),
            OneOrMany::Many(vec![rotations(1); 4]),
            ParameterValues::Batch(vec![vec![0.0]; 4]),
            ParameterValues::Batch(vec![vec![0.0]; 2]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FidelityError::ValueBatchMismatch { side: Side::Right, circuits: 4, rows: 2 }
        ));
    }

    #[test]
    fn test_parameter_count_names_index_and_side() {
        let err = broadcast(
            OneOrMany::Many(vec![rotations(2); 2]),
            OneOrMany::Many(vec![rotations(2); 2]),
            ParameterValues::Batch(vec![vec![0.0, 0.0], vec![0.0]]),
            ParameterValues::Batch(vec![vec![0.0, 0.0], vec![0.0, 0.0]]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FidelityError::ParameterCount { index: 1, side: Side::Left, expected: 2, actual: 1 }
        ));
    }

    #[test]
    fn test_missing_values_for_parameterized_templates() {
        let err = broadcast(
            OneOrMany::Many(vec![rotations(2); 2]),
            OneOrMany::Many(vec![rotations(2); 2]),
            ParameterValues::Omitted,
            ParameterValues::Omitted,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FidelityError::ParameterCount { index: 0, side: Side::Left, expected: 2, actual: 0 }
        ));
    }

    #[test]
    fn test_asymmetric_parameter_counts_allowed() {
        let items = broadcast(
            OneOrMany::One(rotations(2)),
            OneOrMany::One(rotations(1)),
            ParameterValues::Batch(vec![vec![0.1, 0.2]]),
            ParameterValues::Batch(vec![vec![0.3]]),
        )
        .unwrap();
        assert_eq!(items[0].left_values.len(), 2);
        assert_eq!(items[0].right_values.len(), 1);
    }

    #[test]
    fn test_empty_lists_are_missing_input() {
        let err = broadcast(
            OneOrMany::Many(vec![]),
            OneOrMany::Many(vec![]),
            ParameterValues::Omitted,
            ParameterValues::Omitted,
        )
        .unwrap_err();
        assert!(matches!(err, FidelityError::MissingInput));
    }

    #[test]
    fn test_ndarray_conversions() {
        let single: ParameterValues = ndarray::arr1(&[0.1, 0.2]).into();
        assert!(matches!(single, ParameterValues::Single(v) if v == vec![0.1, 0.2]));

        let batch: ParameterValues = ndarray::arr2(&[[0.1, 0.2], [0.3, 0.4]]).into();
        match batch {
            ParameterValues::Batch(rows) => {
                assert_eq!(rows, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
            }
            other => panic!("unexpected variant {other:?}"),
        }
    }
}
