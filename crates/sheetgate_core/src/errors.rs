pub type Result<T, E = SheetError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Colonne '{0}' introuvable")]
    ColumnNotFound(String),

    #[error("Valeur '{0}' introuvable")]
    RowNotFound(String),

    /// The entry to rename isn't in the first column.
    #[error("Ancienne valeur introuvable")]
    EntryNotFound(String),

    #[error("Feuille '{0}' introuvable")]
    TableNotFound(String),

    #[error("Aucune feuille dans le classeur")]
    EmptySpreadsheet,

    #[error("Plage invalide: {start}-{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("{0}")]
    BackendFailure(String),
}

impl SheetError {
    /// Whether this error came out of resolution rather than the backend.
    ///
    /// Resolution errors are reported before any write is attempted.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            SheetError::ColumnNotFound(_)
                | SheetError::RowNotFound(_)
                | SheetError::EntryNotFound(_)
        )
    }
}

macro_rules! backend_failure {
    ($($arg:tt)*) => {
        crate::errors::SheetError::BackendFailure(std::format!($($arg)*))
    };
}

pub(crate) use backend_failure;
