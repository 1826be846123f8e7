//! Request facade over a [`SheetBackend`].
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::SheetBackend;
use crate::envelope::{Lines, Message, Preview, SheetList, Status};
use crate::errors::{Result, SheetError};
use crate::normalize::canonical_cell;
use crate::records::rows_to_records;
use crate::request::{AddEntry, LinesQuery, UpdateCell, UpdateEntry};
use crate::resolver::{entry_exists, resolve_column, resolve_row};

pub const HOME_MESSAGE: &str = "API connectée à Google Sheets ✅";

/// Number of records returned by a preview.
pub const PREVIEW_LEN: usize = 5;

/// Number of records returned by `get_lines` when no end is given.
pub const DEFAULT_LINES: usize = 10;

/// Column holding the entries for add/update entry.
const KEY_COLUMN: usize = 1;

/// Translates requests into backend reads and writes.
///
/// Every mutation fetches a fresh snapshot, resolves its target, then issues at
/// most one write. Nothing is written when resolution fails.
#[derive(Debug, Clone)]
pub struct SheetService {
    backend: Arc<dyn SheetBackend>,
    default_table: String,
}

impl SheetService {
    pub fn new(backend: Arc<dyn SheetBackend>, default_table: impl Into<String>) -> Self {
        SheetService {
            backend,
            default_table: default_table.into(),
        }
    }

    /// Create a service using the first table of the backend as the default.
    pub async fn with_first_table(backend: Arc<dyn SheetBackend>) -> Result<Self> {
        let tables = backend.list_tables().await?;
        let first = tables
            .into_iter()
            .next()
            .ok_or(SheetError::EmptySpreadsheet)?;
        debug!(%first, "using first table as default");
        Ok(Self::new(backend, first))
    }

    pub fn default_table(&self) -> &str {
        &self.default_table
    }

    pub fn backend(&self) -> &Arc<dyn SheetBackend> {
        &self.backend
    }

    fn table<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_table)
    }

    pub fn home(&self) -> Message {
        Message {
            message: HOME_MESSAGE.to_string(),
        }
    }

    pub async fn preview(&self, table: Option<&str>) -> Result<Preview> {
        let rows = self.backend.read_all_rows(self.table(table)).await?;
        let mut records = rows_to_records(&rows);
        records.truncate(PREVIEW_LEN);
        Ok(Preview { extrait: records })
    }

    pub async fn list_sheets(&self) -> Result<SheetList> {
        let names = self.backend.list_tables().await?;
        Ok(SheetList {
            feuilles_accessibles: names,
        })
    }

    /// Read a range of data records. Both bounds are inclusive and 1-based.
    ///
    /// `plage` reports the rows actually returned, so a range running past the
    /// end of the table is reported up to its last row. When nothing is
    /// returned the requested range is echoed back.
    pub async fn get_lines(&self, query: &LinesQuery) -> Result<Lines> {
        let start = query.start.unwrap_or(1);
        let end = query
            .end
            .unwrap_or_else(|| start.saturating_add(DEFAULT_LINES - 1));
        if start == 0 || end < start {
            return Err(SheetError::InvalidRange { start, end });
        }

        let rows = self
            .backend
            .read_all_rows(self.table(query.feuille.as_deref()))
            .await?;
        let records: Vec<_> = rows_to_records(&rows)
            .into_iter()
            .skip(start - 1)
            .take(end - start + 1)
            .collect();

        let last = match records.len() {
            0 => end,
            n => start + n - 1,
        };
        Ok(Lines {
            plage: format!("{start}-{last}"),
            donnees: records,
        })
    }

    /// Append an entry to the first column unless an equivalent one exists.
    pub async fn add_entry(&self, req: &AddEntry) -> Result<Status> {
        let table = self.table(req.feuille.as_deref());
        let values = self.backend.read_column(table, KEY_COLUMN).await?;

        if entry_exists(&values, &req.valeur) {
            debug!(%table, valeur = %req.valeur, "entry already present");
            return Ok(Status::success("Déjà présente"));
        }

        let value = canonical_cell(&req.valeur);
        self.backend.append_row(table, vec![value.clone()]).await?;
        info!(%table, %value, "appended entry");

        Ok(Status::success("Ajoutée avec succès"))
    }

    /// Replace a first-column entry.
    pub async fn update_entry(&self, req: &UpdateEntry) -> Result<Status> {
        let table = self.table(req.feuille.as_deref());
        let values = self.backend.read_column(table, KEY_COLUMN).await?;
        let row = resolve_row(&values, &req.ancienne_valeur).map_err(|err| match err {
            SheetError::RowNotFound(key) => SheetError::EntryNotFound(key),
            other => other,
        })?;

        let old = canonical_cell(&req.ancienne_valeur);
        let new = canonical_cell(&req.nouvelle_valeur);
        self.backend
            .update_cell(table, row, KEY_COLUMN, new.clone())
            .await?;
        info!(%table, %row, %old, %new, "replaced entry");

        Ok(Status::success(format!("{old} remplacée par {new}")))
    }

    /// Update the cell at the row matching `nom` and the column named
    /// `colonne`.
    pub async fn update_cell(&self, req: &UpdateCell) -> Result<Status> {
        let table = self.table(req.feuille.as_deref());
        let rows = self.backend.read_all_rows(table).await?;

        let (header, data) = match rows.split_first() {
            Some((header, data)) => (header.as_slice(), data),
            None => (&[][..], &[][..]),
        };

        let column = resolve_column(header, &req.colonne)?;
        let key_column = match &req.colonne_reference {
            Some(name) => resolve_column(header, name)?,
            None => KEY_COLUMN,
        };

        let keys: Vec<String> = data
            .iter()
            .map(|row| row.get(key_column - 1).cloned().unwrap_or_default())
            .collect();
        // Data rows start right after the header.
        let row = resolve_row(&keys, &req.nom)? + 1;

        self.backend
            .update_cell(table, row, column, req.valeur.clone())
            .await?;
        info!(%table, %row, %column, "updated cell");

        Ok(Status::success(format!(
            "Cellule {} mise à jour pour {}",
            req.colonne, req.nom
        )))
    }
}

/// Collapse a mutation result into its envelope.
pub fn into_status(result: Result<Status>) -> Status {
    result.unwrap_or_else(|err| {
        if err.is_resolution_error() {
            debug!(%err, "resolution failed");
        } else {
            warn!(%err, "mutation failed");
        }
        Status::from(err)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::memory::MemoryBackend;

    fn people() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new().with_table(
            "Freelances",
            vec![vec!["Nom", "Statut"], vec!["Alice", "Actif"]],
        ))
    }

    fn service(backend: &Arc<MemoryBackend>) -> SheetService {
        SheetService::new(backend.clone(), "Freelances")
    }

    fn update_cell_req(nom: &str, colonne: &str, valeur: &str) -> UpdateCell {
        UpdateCell {
            nom: nom.to_string(),
            colonne: colonne.to_string(),
            valeur: valeur.to_string(),
            feuille: None,
            colonne_reference: None,
        }
    }

    #[test]
    fn home_message() {
        let backend = people();
        assert_eq!(HOME_MESSAGE, service(&backend).home().message);
    }

    #[tokio::test]
    async fn update_cell_scenario() {
        logutil::init_test();
        let backend = people();
        let status = service(&backend)
            .update_cell(&update_cell_req("alice", "Statut", "Inactif"))
            .await
            .unwrap();

        assert!(status.is_success());
        let rows = backend.snapshot("Freelances").unwrap();
        assert_eq!("Inactif", rows[1][1]);
        assert_eq!(1, backend.write_count());
    }

    #[tokio::test]
    async fn update_cell_unknown_row() {
        let backend = people();
        let result = service(&backend)
            .update_cell(&update_cell_req("Bob", "Statut", "X"))
            .await;

        assert!(matches!(result, Err(SheetError::RowNotFound(_))));
        assert_eq!(0, backend.write_count());
        assert!(!into_status(result).is_success());
    }

    #[tokio::test]
    async fn update_cell_unknown_column() {
        let backend = people();
        let result = service(&backend)
            .update_cell(&update_cell_req("Alice", "Email", "a@b.c"))
            .await;

        assert!(matches!(result, Err(SheetError::ColumnNotFound(c)) if c == "Email"));
        assert_eq!(0, backend.write_count());
    }

    #[tokio::test]
    async fn update_cell_does_not_match_header() {
        let backend = people();
        let result = service(&backend)
            .update_cell(&update_cell_req("nom", "Statut", "X"))
            .await;
        assert!(matches!(result, Err(SheetError::RowNotFound(_))));
    }

    #[tokio::test]
    async fn update_cell_reference_column() {
        let backend = Arc::new(MemoryBackend::new().with_table(
            "Freelances",
            vec![
                vec!["Nom", "Email", "Statut"],
                vec!["Alice", "alice@example.com", "Actif"],
                vec!["Bob", "bob@example.com"],
            ],
        ));
        let mut req = update_cell_req(" BOB@example.com", "Statut", "Inactif");
        req.colonne_reference = Some("Email".to_string());

        service(&backend).update_cell(&req).await.unwrap();

        let rows = backend.snapshot("Freelances").unwrap();
        assert_eq!(vec!["Bob", "bob@example.com", "Inactif"], rows[2]);
    }

    #[tokio::test]
    async fn update_cell_unknown_reference_column() {
        let backend = people();
        let mut req = update_cell_req("Alice", "Statut", "X");
        req.colonne_reference = Some("Email".to_string());
        let result = service(&backend).update_cell(&req).await;
        assert!(matches!(result, Err(SheetError::ColumnNotFound(c)) if c == "Email"));
    }

    #[tokio::test]
    async fn update_cell_empty_table() {
        let backend = Arc::new(MemoryBackend::new().with_table("Freelances", vec![]));
        let result = service(&backend)
            .update_cell(&update_cell_req("Alice", "Statut", "X"))
            .await;
        assert!(matches!(result, Err(SheetError::ColumnNotFound(_))));
    }

    #[tokio::test]
    async fn add_entry_already_present() {
        let backend = Arc::new(
            MemoryBackend::new().with_table("Freelances", vec![vec!["Email"], vec!["test@example.com"]]),
        );
        let status = service(&backend)
            .add_entry(&AddEntry {
                valeur: "  Test@Example.com ".to_string(),
                feuille: None,
            })
            .await
            .unwrap();

        assert_eq!(Status::success("Déjà présente"), status);
        assert_eq!(0, backend.write_count());
        assert_eq!(2, backend.snapshot("Freelances").unwrap().len());
    }

    #[tokio::test]
    async fn add_entry_appends_canonical_value() {
        let backend = people();
        let status = service(&backend)
            .add_entry(&AddEntry {
                valeur: "  Zoé ".to_string(),
                feuille: None,
            })
            .await
            .unwrap();

        assert_eq!(Status::success("Ajoutée avec succès"), status);
        let rows = backend.snapshot("Freelances").unwrap();
        assert_eq!(vec!["zoé"], rows[2]);
    }

    #[tokio::test]
    async fn add_entry_twice_is_idempotent() {
        let backend = people();
        let svc = service(&backend);
        let req = AddEntry {
            valeur: "Carole".to_string(),
            feuille: None,
        };
        svc.add_entry(&req).await.unwrap();
        svc.add_entry(&req).await.unwrap();
        assert_eq!(1, backend.write_count());
    }

    #[tokio::test]
    async fn add_entry_named_table() {
        let backend = Arc::new(
            MemoryBackend::new()
                .with_table("Freelances", vec![vec!["Nom"]])
                .with_table("Clients", vec![vec!["Nom"]]),
        );
        service(&backend)
            .add_entry(&AddEntry {
                valeur: "Acme".to_string(),
                feuille: Some("Clients".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(2, backend.snapshot("Clients").unwrap().len());
        assert_eq!(1, backend.snapshot("Freelances").unwrap().len());
    }

    #[tokio::test]
    async fn add_entry_unknown_table() {
        let backend = people();
        let result = service(&backend)
            .add_entry(&AddEntry {
                valeur: "x".to_string(),
                feuille: Some("Nope".to_string()),
            })
            .await;
        assert!(matches!(&result, Err(SheetError::TableNotFound(t)) if t == "Nope"));
        assert_eq!(
            json!({"status": "error", "message": "Feuille 'Nope' introuvable"}),
            serde_json::to_value(into_status(result)).unwrap()
        );
    }

    #[tokio::test]
    async fn update_entry_replaces() {
        let backend = people();
        let status = service(&backend)
            .update_entry(&UpdateEntry {
                ancienne_valeur: "ALICE ".to_string(),
                nouvelle_valeur: " Alicia".to_string(),
                feuille: None,
            })
            .await
            .unwrap();

        assert_eq!(Status::success("alice remplacée par alicia"), status);
        assert_eq!("alicia", backend.snapshot("Freelances").unwrap()[1][0]);
    }

    #[tokio::test]
    async fn update_entry_missing() {
        let backend = people();
        let result = service(&backend)
            .update_entry(&UpdateEntry {
                ancienne_valeur: "Bob".to_string(),
                nouvelle_valeur: "Robert".to_string(),
                feuille: None,
            })
            .await;
        assert!(matches!(&result, Err(SheetError::EntryNotFound(key)) if key == "Bob"));
        assert_eq!(0, backend.write_count());
        assert_eq!(
            json!({"status": "error", "message": "Ancienne valeur introuvable"}),
            serde_json::to_value(into_status(result)).unwrap()
        );
    }

    #[tokio::test]
    async fn preview_first_five() {
        let mut rows = vec![vec!["N".to_string()]];
        rows.extend((1..=8).map(|i| vec![format!("r{i}")]));
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_table("Freelances", rows);

        let preview = service(&backend).preview(None).await.unwrap();
        assert_eq!(PREVIEW_LEN, preview.extrait.len());
        assert_eq!(json!("r1"), preview.extrait[0]["N"]);
        assert_eq!(json!("r5"), preview.extrait[4]["N"]);
    }

    #[tokio::test]
    async fn lines_range() {
        let mut rows = vec![vec!["N".to_string()]];
        rows.extend((1..=25).map(|i| vec![format!("r{i}")]));
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_table("Freelances", rows);
        let svc = service(&backend);

        let lines = svc.get_lines(&LinesQuery::default()).await.unwrap();
        assert_eq!("1-10", lines.plage);
        assert_eq!(10, lines.donnees.len());

        let lines = svc
            .get_lines(&LinesQuery {
                feuille: None,
                start: Some(20),
                end: Some(30),
            })
            .await
            .unwrap();
        assert_eq!("20-25", lines.plage);
        assert_eq!(6, lines.donnees.len());
        assert_eq!(json!("r20"), lines.donnees[0]["N"]);

        let lines = svc
            .get_lines(&LinesQuery {
                feuille: None,
                start: Some(40),
                end: None,
            })
            .await
            .unwrap();
        assert_eq!("40-49", lines.plage);
        assert!(lines.donnees.is_empty());
    }

    #[tokio::test]
    async fn lines_invalid_range() {
        let backend = people();
        let svc = service(&backend);
        for (start, end) in [(0, 3), (5, 2)] {
            let result = svc
                .get_lines(&LinesQuery {
                    feuille: None,
                    start: Some(start),
                    end: Some(end),
                })
                .await;
            assert!(matches!(result, Err(SheetError::InvalidRange { .. })));
        }
    }

    #[tokio::test]
    async fn list_and_first_table() {
        let backend = Arc::new(
            MemoryBackend::new()
                .with_table("Freelances", vec![])
                .with_table("Clients", vec![]),
        );
        let svc = SheetService::with_first_table(backend).await.unwrap();
        assert_eq!("Freelances", svc.default_table());
        assert_eq!(
            vec!["Freelances", "Clients"],
            svc.list_sheets().await.unwrap().feuilles_accessibles
        );
    }

    #[tokio::test]
    async fn first_table_of_empty_spreadsheet() {
        let backend = Arc::new(MemoryBackend::new());
        let err = SheetService::with_first_table(backend).await.unwrap_err();
        assert!(matches!(err, SheetError::EmptySpreadsheet));
        assert_eq!("Aucune feuille dans le classeur", err.to_string());
    }
}
