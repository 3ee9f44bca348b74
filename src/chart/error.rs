use thiserror::Error;

use super::kind::{AxisRole, ChartKind};
use crate::data::model::ColumnKind;

/// Why a chart request could not be turned into an instruction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A role was given a column of the wrong kind.
    #[error("{chart}: {role} column '{column}' must be {expected}, but it is {found}")]
    TypeMismatch {
        chart: ChartKind,
        role: AxisRole,
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    /// Fewer columns than the chart needs.
    #[error("{chart}: select at least {required} {role} column(s) ({selected} selected)")]
    InsufficientSelection {
        chart: ChartKind,
        role: AxisRole,
        required: usize,
        selected: usize,
    },

    /// The role names a column the dataset does not have.
    #[error("{chart}: {role} column '{column}' does not exist")]
    UnknownColumn {
        chart: ChartKind,
        role: AxisRole,
        column: String,
    },

    /// Filtering left no rows to plot.
    #[error("{chart}: no data left after filtering")]
    EmptyResult { chart: ChartKind },
}

impl ValidationError {
    /// The role whose requirement was violated, if any.
    pub fn role(&self) -> Option<AxisRole> {
        match self {
            ValidationError::TypeMismatch { role, .. }
            | ValidationError::InsufficientSelection { role, .. }
            | ValidationError::UnknownColumn { role, .. } => Some(*role),
            ValidationError::EmptyResult { .. } => None,
        }
    }
}
