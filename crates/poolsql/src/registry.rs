//! Column registry: the static description of one table.
//!
//! A [`TableProfile`] declares which columns can be filtered, how each one is
//! compared ([`ColumnKind`]), and what the upsert and delete statements for the
//! table look like. Declaration order is also the INSERT column order.

use crate::error::{QueryError, QueryResult};
use crate::ident::Ident;

/// How filter values for a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Relational prefixes (`lt`, `le`, `gt`, `ge`, `ne`) are recognized.
    Numeric,
    /// Plain equality against a text value.
    String,
    /// Plain equality, value passed through like a number.
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: Ident,
    pub kind: ColumnKind,
}

/// What an INSERT does when it hits the unique constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictAction {
    /// `DO NOTHING RETURNING <column>`
    DoNothing { returning: Ident },
    /// `DO UPDATE SET <c> = EXCLUDED.<c>, ...`
    DoUpdate { columns: Vec<Ident> },
}

/// Immutable per-table registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProfile {
    table: Ident,
    columns: Vec<Column>,
    column_breaks: Vec<usize>,
    unique_constraint: Ident,
    conflict: ConflictAction,
    key_column: Option<Ident>,
    time_column: Option<Ident>,
}

impl TableProfile {
    pub fn builder(table: &str) -> TableProfileBuilder {
        TableProfileBuilder {
            table: table.to_string(),
            columns: Vec::new(),
            column_breaks: Vec::new(),
            unique_constraint: None,
            conflict: None,
            key_column: None,
            time_column: None,
        }
    }

    /// `current_transactions`: transactions of the rounds still in progress.
    pub fn current_transactions() -> Self {
        Self {
            table: Ident::from_static("current_transactions"),
            columns: vec![
                static_column("timestamp", ColumnKind::Numeric),
                static_column("round", ColumnKind::String),
                static_column("type", ColumnKind::String),
            ],
            column_breaks: Vec::new(),
            unique_constraint: Ident::from_static("current_transactions_unique"),
            conflict: ConflictAction::DoNothing {
                returning: Ident::from_static("round"),
            },
            key_column: Some(Ident::from_static("round")),
            time_column: Some(Ident::from_static("timestamp")),
        }
    }

    /// `current_network`: latest network statistics, one row per chain type.
    pub fn current_network() -> Self {
        Self {
            table: Ident::from_static("current_network"),
            columns: vec![
                static_column("timestamp", ColumnKind::Numeric),
                static_column("difficulty", ColumnKind::Numeric),
                static_column("hashrate", ColumnKind::Numeric),
                static_column("height", ColumnKind::Numeric),
                static_column("type", ColumnKind::String),
            ],
            column_breaks: vec![2],
            unique_constraint: Ident::from_static("current_network_unique"),
            conflict: ConflictAction::DoUpdate {
                columns: ["timestamp", "difficulty", "hashrate", "height"]
                    .into_iter()
                    .map(Ident::from_static)
                    .collect(),
            },
            key_column: None,
            time_column: Some(Ident::from_static("timestamp")),
        }
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column positions that start a new line in the INSERT column list.
    pub fn column_breaks(&self) -> &[usize] {
        &self.column_breaks
    }

    /// Numeric columns, in declaration order.
    pub fn numbers(&self) -> impl Iterator<Item = &str> {
        self.names_of(ColumnKind::Numeric)
    }

    /// String columns, in declaration order.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.names_of(ColumnKind::String)
    }

    /// Every recognized column, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    fn names_of(&self, kind: ColumnKind) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(move |c| c.kind == kind)
            .map(|c| c.name.as_str())
    }

    /// Look up a column by name. `None` means the key is not filterable.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_str() == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column(name).map(|c| c.kind)
    }

    pub fn unique_constraint(&self) -> &Ident {
        &self.unique_constraint
    }

    pub fn conflict(&self) -> &ConflictAction {
        &self.conflict
    }

    pub fn key_column(&self) -> Option<&Ident> {
        self.key_column.as_ref()
    }

    pub fn time_column(&self) -> Option<&Ident> {
        self.time_column.as_ref()
    }
}

fn static_column(name: &'static str, kind: ColumnKind) -> Column {
    Column {
        name: Ident::from_static(name),
        kind,
    }
}

/// Builder for custom table profiles. All checks happen in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct TableProfileBuilder {
    table: String,
    columns: Vec<(String, ColumnKind)>,
    column_breaks: Vec<usize>,
    unique_constraint: Option<String>,
    conflict: Option<PendingConflict>,
    key_column: Option<String>,
    time_column: Option<String>,
}

#[derive(Debug, Clone)]
enum PendingConflict {
    DoNothing(String),
    DoUpdate(Vec<String>),
}

impl TableProfileBuilder {
    pub fn column(mut self, name: &str, kind: ColumnKind) -> Self {
        self.columns.push((name.to_string(), kind));
        self
    }

    pub fn numeric(self, name: &str) -> Self {
        self.column(name, ColumnKind::Numeric)
    }

    pub fn string(self, name: &str) -> Self {
        self.column(name, ColumnKind::String)
    }

    pub fn generic(self, name: &str) -> Self {
        self.column(name, ColumnKind::Generic)
    }

    /// Start a new line of the INSERT column list before each given position.
    pub fn column_breaks(mut self, positions: &[usize]) -> Self {
        self.column_breaks = positions.to_vec();
        self
    }

    pub fn unique_constraint(mut self, name: &str) -> Self {
        self.unique_constraint = Some(name.to_string());
        self
    }

    pub fn on_conflict_do_nothing(mut self, returning: &str) -> Self {
        self.conflict = Some(PendingConflict::DoNothing(returning.to_string()));
        self
    }

    pub fn on_conflict_update(mut self, columns: &[&str]) -> Self {
        self.conflict = Some(PendingConflict::DoUpdate(
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    pub fn key_column(mut self, name: &str) -> Self {
        self.key_column = Some(name.to_string());
        self
    }

    pub fn time_column(mut self, name: &str) -> Self {
        self.time_column = Some(name.to_string());
        self
    }

    pub fn build(self) -> QueryResult<TableProfile> {
        let table = Ident::parse(&self.table)?;
        if self.columns.is_empty() {
            return Err(QueryError::validation(format!(
                "table {table} declares no columns"
            )));
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for (name, kind) in &self.columns {
            let name = Ident::parse(name)?;
            if columns.iter().any(|c| c.name == name) {
                return Err(QueryError::validation(format!(
                    "duplicate column {name} in table {table}"
                )));
            }
            columns.push(Column { name, kind: *kind });
        }

        let mut column_breaks = self.column_breaks.clone();
        column_breaks.sort_unstable();
        column_breaks.dedup();
        if let Some(&pos) = column_breaks
            .iter()
            .find(|&&pos| pos == 0 || pos >= columns.len())
        {
            return Err(QueryError::validation(format!(
                "column break {pos} is outside the columns of table {table}"
            )));
        }

        let declared = |name: &str| -> QueryResult<Ident> {
            let ident = Ident::parse(name)?;
            if columns.iter().any(|c| c.name == ident) {
                Ok(ident)
            } else {
                Err(QueryError::validation(format!(
                    "column {ident} is not declared in table {table}"
                )))
            }
        };

        let unique_constraint = match &self.unique_constraint {
            Some(name) => Ident::parse(name)?,
            None => {
                return Err(QueryError::validation(format!(
                    "table {table} has no unique constraint"
                )));
            }
        };

        let conflict = match &self.conflict {
            None => {
                return Err(QueryError::validation(format!(
                    "table {table} has no conflict action"
                )));
            }
            Some(PendingConflict::DoNothing(returning)) => ConflictAction::DoNothing {
                returning: declared(returning)?,
            },
            Some(PendingConflict::DoUpdate(cols)) => {
                if cols.is_empty() {
                    return Err(QueryError::validation(format!(
                        "table {table} updates no columns on conflict"
                    )));
                }
                ConflictAction::DoUpdate {
                    columns: cols.iter().map(|c| declared(c)).collect::<QueryResult<_>>()?,
                }
            }
        };

        let key_column = self.key_column.as_deref().map(declared).transpose()?;
        let time_column = self.time_column.as_deref().map(declared).transpose()?;

        Ok(TableProfile {
            table,
            columns,
            column_breaks,
            unique_constraint,
            conflict,
            key_column,
            time_column,
        })
    }
}
