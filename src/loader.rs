use std::collections::{BTreeSet, HashMap, HashSet};

use sea_orm::sea_query::{Expr, ExprTrait, Query, SimpleExpr, Value as SeaValue};
use sea_orm::{DatabaseBackend, DatabaseTransaction, QueryResult, TransactionTrait};

use crate::db::*;
use crate::schema::{
    pathify, Column, ColumnCreate, Geography, GeographyCreate, Namespace, TabularBatch,
};
use crate::store::{col_name, exec, id_value, query_all, query_one, read_id};
use crate::value::{coerce_value, BoolCoercion, CellValue, ColumnKind, ColumnType, TypeViolation};
use crate::{
    ColumnId, GeoId, Id, MetaId, NamespaceId, ObjectMeta, TessellaError, TessellaResult, User,
    ValidTime, ValueId,
};

/// Upper bound on rows or bind pairs per generated statement. Keeps every
/// statement under the bind-parameter limits of all three backends.
const WRITE_CHUNK: usize = 200;

/// Options for opening a bulk-write scope.
#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    /// Free-form provenance notes recorded on the scope's audit row.
    pub notes: Option<String>,
    /// Email of the attributing user. Falls back to the configured default.
    pub user: Option<String>,
    /// Roll the scope back on `finish` instead of committing.
    pub dry_run: bool,
    pub bool_coercion: BoolCoercion,
}

/// Counts reported by a single value-loading call.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadReport {
    pub inserted: usize,
    pub invalidated: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteOutcome {
    Committed,
    RolledBack,
}

/// Builder for the provenance notes stored on a scope's audit row.
#[derive(Clone, Debug)]
pub struct ImportNotes {
    script: String,
    source_url: Option<String>,
    source_digest: Option<String>,
}

impl ImportNotes {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            source_url: None,
            source_digest: None,
        }
    }

    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Record a digest of the raw source material so re-imports of the same
    /// file can be recognized later.
    pub fn source_bytes(mut self, bytes: &[u8]) -> Self {
        self.source_digest = Some(blake3::hash(bytes).to_hex().to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut notes = format!("imported by {}", self.script);
        if let Some(url) = &self.source_url {
            notes.push_str(&format!(" from {url}"));
        }
        if let Some(digest) = &self.source_digest {
            notes.push_str(&format!(" (blake3:{digest})"));
        }
        notes
    }
}

struct PendingValue {
    col_id: ColumnId,
    geo_id: GeoId,
    value: CellValue,
}

/// A bulk-write scope: one open transaction and one audit record that every
/// write inside the scope is attributed to. Dropping the scope without
/// calling [`finish`](Self::finish) rolls the transaction back.
pub struct BulkWriteContext {
    txn: DatabaseTransaction,
    backend: DatabaseBackend,
    user: User,
    meta: ObjectMeta,
    dry_run: bool,
    bool_coercion: BoolCoercion,
}

impl BulkWriteContext {
    pub(crate) fn new(
        txn: DatabaseTransaction,
        backend: DatabaseBackend,
        user: User,
        meta: ObjectMeta,
        dry_run: bool,
        bool_coercion: BoolCoercion,
    ) -> Self {
        Self {
            txn,
            backend,
            user,
            meta,
            dry_run,
            bool_coercion,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub async fn create_namespace(
        &self,
        path: &str,
        description: Option<&str>,
    ) -> TessellaResult<Namespace> {
        let canonical = pathify(path);
        if canonical.is_empty() {
            return Err(TessellaError::invalid(format!(
                "'{path}' does not canonicalize to a usable namespace path"
            )));
        }
        let namespace = Namespace {
            namespace_id: NamespaceId(Id::new()),
            path: canonical,
            description: description.map(str::to_string),
            meta_id: self.meta.meta_id,
        };
        let insert = Query::insert()
            .into_table(TessellaNamespaces::Table)
            .columns([
                TessellaNamespaces::NamespaceId,
                TessellaNamespaces::Path,
                TessellaNamespaces::Description,
                TessellaNamespaces::MetaId,
            ])
            .values_panic([
                id_value(self.backend, namespace.namespace_id.0).into(),
                namespace.path.clone().into(),
                namespace.description.clone().into(),
                id_value(self.backend, namespace.meta_id.0).into(),
            ])
            .to_owned();
        exec(&self.txn, &insert).await?;
        Ok(namespace)
    }

    pub async fn namespace_by_path(&self, path: &str) -> TessellaResult<Option<Namespace>> {
        let canonical = pathify(path);
        let select = Query::select()
            .from(TessellaNamespaces::Table)
            .columns([
                TessellaNamespaces::NamespaceId,
                TessellaNamespaces::Path,
                TessellaNamespaces::Description,
                TessellaNamespaces::MetaId,
            ])
            .and_where(Expr::col(TessellaNamespaces::Path).eq(canonical))
            .to_owned();
        let Some(row) = query_one(&self.txn, &select).await? else {
            return Ok(None);
        };
        Ok(Some(namespace_from_row(&row)?))
    }

    /// Create columns along with the reference rows their canonical path and
    /// aliases resolve through. Paths are canonicalized before storage.
    pub async fn create_columns(
        &self,
        namespace: &Namespace,
        columns: Vec<ColumnCreate>,
    ) -> TessellaResult<Vec<Column>> {
        let mut claimed: HashSet<String> = HashSet::new();
        let mut created = Vec::with_capacity(columns.len());
        for spec in columns {
            let canonical = pathify(&spec.path);
            if canonical.is_empty() {
                return Err(TessellaError::invalid(format!(
                    "'{}' does not canonicalize to a usable column path",
                    spec.path
                )));
            }
            let mut refs = BTreeSet::new();
            refs.insert(canonical.clone());
            for alias in &spec.aliases {
                let alias = pathify(alias);
                if alias.is_empty() {
                    return Err(TessellaError::invalid(format!(
                        "column '{canonical}' has an alias that canonicalizes to nothing"
                    )));
                }
                refs.insert(alias);
            }
            for path in &refs {
                if !claimed.insert(path.clone()) {
                    return Err(TessellaError::invalid(format!(
                        "column reference '{path}' is claimed twice in this batch"
                    )));
                }
            }
            let column = Column {
                col_id: ColumnId(Id::new()),
                namespace_id: namespace.namespace_id,
                canonical_path: canonical,
                kind: spec.kind,
                value_type: spec.value_type,
                description: spec.description.clone(),
                source_url: spec.source_url.clone(),
                meta_id: self.meta.meta_id,
            };
            let insert = Query::insert()
                .into_table(TessellaColumns::Table)
                .columns([
                    TessellaColumns::ColId,
                    TessellaColumns::NamespaceId,
                    TessellaColumns::CanonicalPath,
                    TessellaColumns::Kind,
                    TessellaColumns::ValueType,
                    TessellaColumns::Description,
                    TessellaColumns::SourceUrl,
                    TessellaColumns::MetaId,
                ])
                .values_panic([
                    id_value(self.backend, column.col_id.0).into(),
                    id_value(self.backend, column.namespace_id.0).into(),
                    column.canonical_path.clone().into(),
                    column.kind.as_i16().into(),
                    column.value_type.as_i16().into(),
                    column.description.clone().into(),
                    column.source_url.clone().into(),
                    id_value(self.backend, column.meta_id.0).into(),
                ])
                .to_owned();
            exec(&self.txn, &insert).await?;
            for path in refs {
                let insert_ref = Query::insert()
                    .into_table(TessellaColumnRefs::Table)
                    .columns([
                        TessellaColumnRefs::NamespaceId,
                        TessellaColumnRefs::Path,
                        TessellaColumnRefs::ColId,
                        TessellaColumnRefs::MetaId,
                    ])
                    .values_panic([
                        id_value(self.backend, namespace.namespace_id.0).into(),
                        path.into(),
                        id_value(self.backend, column.col_id.0).into(),
                        id_value(self.backend, self.meta.meta_id.0).into(),
                    ])
                    .to_owned();
                exec(&self.txn, &insert_ref).await?;
            }
            created.push(column);
        }
        Ok(created)
    }

    pub async fn create_geographies(
        &self,
        namespace: &Namespace,
        geographies: Vec<GeographyCreate>,
    ) -> TessellaResult<Vec<Geography>> {
        let mut created = Vec::with_capacity(geographies.len());
        for spec in geographies {
            let canonical = pathify(&spec.path);
            if canonical.is_empty() {
                return Err(TessellaError::invalid(format!(
                    "'{}' does not canonicalize to a usable geography path",
                    spec.path
                )));
            }
            let geography = Geography {
                geo_id: GeoId(Id::new()),
                namespace_id: namespace.namespace_id,
                path: canonical,
                meta_id: self.meta.meta_id,
            };
            let insert = Query::insert()
                .into_table(TessellaGeographies::Table)
                .columns([
                    TessellaGeographies::GeoId,
                    TessellaGeographies::NamespaceId,
                    TessellaGeographies::Path,
                    TessellaGeographies::Geometry,
                    TessellaGeographies::InternalPoint,
                    TessellaGeographies::MetaId,
                ])
                .values_panic([
                    id_value(self.backend, geography.geo_id.0).into(),
                    id_value(self.backend, geography.namespace_id.0).into(),
                    geography.path.clone().into(),
                    SeaValue::Bytes(spec.geometry.clone()).into(),
                    SeaValue::Bytes(spec.internal_point.clone()).into(),
                    id_value(self.backend, geography.meta_id.0).into(),
                ])
                .to_owned();
            exec(&self.txn, &insert).await?;
            created.push(geography);
        }
        Ok(created)
    }

    /// Look up columns by path or alias. The result is keyed by the paths as
    /// requested; paths that resolve to nothing are absent from the map.
    pub async fn columns_by_path(
        &self,
        namespace: &Namespace,
        paths: &[String],
    ) -> TessellaResult<HashMap<String, Column>> {
        let requested: Vec<(String, String)> = paths
            .iter()
            .map(|path| (path.clone(), pathify(path)))
            .collect();
        let canonicals: Vec<String> = requested
            .iter()
            .map(|(_, canonical)| canonical.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut ref_map: HashMap<String, ColumnId> = HashMap::new();
        for chunk in canonicals.chunks(WRITE_CHUNK) {
            let select = Query::select()
                .from(TessellaColumnRefs::Table)
                .columns([TessellaColumnRefs::Path, TessellaColumnRefs::ColId])
                .and_where(
                    Expr::col(TessellaColumnRefs::NamespaceId)
                        .eq(id_value(self.backend, namespace.namespace_id.0)),
                )
                .and_where(Expr::col(TessellaColumnRefs::Path).is_in(chunk.iter().cloned()))
                .to_owned();
            for row in query_all(&self.txn, &select).await? {
                let path: String = row.try_get("", &col_name(TessellaColumnRefs::Path))?;
                let col_id = ColumnId(read_id(&row, TessellaColumnRefs::ColId)?);
                ref_map.insert(path, col_id);
            }
        }

        let col_ids: Vec<ColumnId> = ref_map
            .values()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let mut col_map: HashMap<ColumnId, Column> = HashMap::new();
        for chunk in col_ids.chunks(WRITE_CHUNK) {
            let select = Query::select()
                .from(TessellaColumns::Table)
                .columns([
                    TessellaColumns::ColId,
                    TessellaColumns::NamespaceId,
                    TessellaColumns::CanonicalPath,
                    TessellaColumns::Kind,
                    TessellaColumns::ValueType,
                    TessellaColumns::Description,
                    TessellaColumns::SourceUrl,
                    TessellaColumns::MetaId,
                ])
                .and_where(
                    Expr::col(TessellaColumns::ColId)
                        .is_in(chunk.iter().map(|id| id_value(self.backend, id.0))),
                )
                .to_owned();
            for row in query_all(&self.txn, &select).await? {
                let column = column_from_row(&row)?;
                col_map.insert(column.col_id, column);
            }
        }

        let mut resolved = HashMap::new();
        for (requested_path, canonical) in requested {
            if let Some(col_id) = ref_map.get(&canonical) {
                if let Some(column) = col_map.get(col_id) {
                    resolved.insert(requested_path, column.clone());
                }
            }
        }
        Ok(resolved)
    }

    pub async fn geographies_by_path(
        &self,
        namespace: &Namespace,
        paths: &[String],
    ) -> TessellaResult<HashMap<String, Geography>> {
        let requested: Vec<(String, String)> = paths
            .iter()
            .map(|path| (path.clone(), pathify(path)))
            .collect();
        let canonicals: Vec<String> = requested
            .iter()
            .map(|(_, canonical)| canonical.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut geo_map: HashMap<String, Geography> = HashMap::new();
        for chunk in canonicals.chunks(WRITE_CHUNK) {
            let select = Query::select()
                .from(TessellaGeographies::Table)
                .columns([
                    TessellaGeographies::GeoId,
                    TessellaGeographies::NamespaceId,
                    TessellaGeographies::Path,
                    TessellaGeographies::MetaId,
                ])
                .and_where(
                    Expr::col(TessellaGeographies::NamespaceId)
                        .eq(id_value(self.backend, namespace.namespace_id.0)),
                )
                .and_where(Expr::col(TessellaGeographies::Path).is_in(chunk.iter().cloned()))
                .to_owned();
            for row in query_all(&self.txn, &select).await? {
                let geography = geography_from_row(&row)?;
                geo_map.insert(geography.path.clone(), geography);
            }
        }

        let mut resolved = HashMap::new();
        for (requested_path, canonical) in requested {
            if let Some(geography) = geo_map.get(&canonical) {
                resolved.insert(requested_path, geography.clone());
            }
        }
        Ok(resolved)
    }

    /// Like [`columns_by_path`](Self::columns_by_path), but every requested
    /// path must resolve or the whole call fails listing the missing ones.
    pub async fn resolve_columns(
        &self,
        namespace: &Namespace,
        paths: &[String],
    ) -> TessellaResult<HashMap<String, Column>> {
        let resolved = self.columns_by_path(namespace, paths).await?;
        let missing: Vec<String> = paths
            .iter()
            .filter(|path| !resolved.contains_key(*path))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(TessellaError::unresolved("columns", missing))
        }
    }

    pub async fn resolve_geographies(
        &self,
        namespace: &Namespace,
        paths: &[String],
    ) -> TessellaResult<HashMap<String, Geography>> {
        let resolved = self.geographies_by_path(namespace, paths).await?;
        let missing: Vec<String> = paths
            .iter()
            .filter(|path| !resolved.contains_key(*path))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(TessellaError::unresolved("geographies", missing))
        }
    }

    /// Apply one batch of cell values. Every cell is validated up front and
    /// nothing is written unless the whole batch passes. Current rows for the
    /// written (column, geography) pairs are closed at the batch timestamp
    /// and the new rows open at that same instant, so version chains stay
    /// contiguous. Pairs the batch does not touch keep their current rows.
    pub async fn load_column_values(
        &self,
        columns: &HashMap<String, Column>,
        geographies: &HashMap<String, Geography>,
        batch: &TabularBatch,
    ) -> TessellaResult<LoadReport> {
        let now = ValidTime::now_monotonic();

        let missing_geos: Vec<String> = batch
            .geography_ids()
            .filter(|path| !geographies.contains_key(*path))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !missing_geos.is_empty() {
            return Err(TessellaError::unresolved("geographies", missing_geos));
        }
        let missing_cols: Vec<String> = batch
            .rows()
            .flat_map(|(_, row)| row.keys())
            .filter(|path| !columns.contains_key(*path))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !missing_cols.is_empty() {
            return Err(TessellaError::unresolved("columns", missing_cols));
        }

        let mut violations = Vec::new();
        let mut pending = Vec::new();
        let mut seen: HashSet<(ColumnId, GeoId)> = HashSet::new();
        for (geo_path, row) in batch.rows() {
            let geography = &geographies[geo_path];
            for (col_path, raw) in row {
                let column = &columns[col_path];
                match coerce_value(column.value_type, raw, self.bool_coercion) {
                    Ok(value) => {
                        if seen.insert((column.col_id, geography.geo_id)) {
                            pending.push(PendingValue {
                                col_id: column.col_id,
                                geo_id: geography.geo_id,
                                value,
                            });
                        } else {
                            violations.push(TypeViolation {
                                column: col_path.clone(),
                                geography: geo_path.to_string(),
                                reason: "duplicate cell for this column and geography".to_string(),
                            });
                        }
                    }
                    Err(reason) => violations.push(TypeViolation {
                        column: col_path.clone(),
                        geography: geo_path.to_string(),
                        reason,
                    }),
                }
            }
        }
        if !violations.is_empty() {
            return Err(TessellaError::validation(violations));
        }
        if pending.is_empty() {
            return Ok(LoadReport::default());
        }

        let stale = self.stale_value_ids(&pending).await?;

        // Savepoint so a failure mid-write leaves earlier work in this scope
        // intact.
        let nested = self.txn.begin().await?;
        for chunk in stale.chunks(WRITE_CHUNK) {
            let update = Query::update()
                .table(TessellaColumnValues::Table)
                .values([(TessellaColumnValues::ValidTo, now.as_i64().into())])
                .and_where(
                    Expr::col(TessellaColumnValues::ValId)
                        .is_in(chunk.iter().map(|id| id_value(self.backend, id.0))),
                )
                .to_owned();
            exec(&nested, &update).await?;
        }
        for chunk in pending.chunks(WRITE_CHUNK) {
            let mut insert = Query::insert()
                .into_table(TessellaColumnValues::Table)
                .columns([
                    TessellaColumnValues::ValId,
                    TessellaColumnValues::ColId,
                    TessellaColumnValues::GeoId,
                    TessellaColumnValues::MetaId,
                    TessellaColumnValues::ValidFrom,
                    TessellaColumnValues::ValidTo,
                    TessellaColumnValues::ValBool,
                    TessellaColumnValues::ValInt,
                    TessellaColumnValues::ValFloat,
                    TessellaColumnValues::ValStr,
                    TessellaColumnValues::ValJson,
                ])
                .to_owned();
            for value in chunk {
                let mut row_values: Vec<SimpleExpr> = vec![
                    id_value(self.backend, Id::new()).into(),
                    id_value(self.backend, value.col_id.0).into(),
                    id_value(self.backend, value.geo_id.0).into(),
                    id_value(self.backend, self.meta.meta_id.0).into(),
                    now.as_i64().into(),
                    SeaValue::BigInt(None).into(),
                ];
                row_values.extend(payload_values(&value.value));
                insert.values_panic(row_values);
            }
            exec(&nested, &insert).await?;
        }
        nested.commit().await?;

        log::info!(
            "loaded {} values, closed {} previous versions",
            pending.len(),
            stale.len()
        );
        Ok(LoadReport {
            inserted: pending.len(),
            invalidated: stale.len(),
        })
    }

    /// Ids of the current rows for exactly the pairs about to be written.
    async fn stale_value_ids(&self, pending: &[PendingValue]) -> TessellaResult<Vec<ValueId>> {
        let mut stale = Vec::new();
        for chunk in pending.chunks(WRITE_CHUNK) {
            let mut pair_match: Option<SimpleExpr> = None;
            for value in chunk {
                let one = Expr::col(TessellaColumnValues::ColId)
                    .eq(id_value(self.backend, value.col_id.0))
                    .and(
                        Expr::col(TessellaColumnValues::GeoId)
                            .eq(id_value(self.backend, value.geo_id.0)),
                    );
                pair_match = Some(match pair_match {
                    Some(any) => any.or(one),
                    None => one,
                });
            }
            let Some(pair_match) = pair_match else {
                continue;
            };
            let select = Query::select()
                .from(TessellaColumnValues::Table)
                .column(TessellaColumnValues::ValId)
                .and_where(Expr::col(TessellaColumnValues::ValidTo).is_null())
                .and_where(pair_match)
                .to_owned();
            for row in query_all(&self.txn, &select).await? {
                stale.push(ValueId(read_id(&row, TessellaColumnValues::ValId)?));
            }
        }
        Ok(stale)
    }

    /// Commit the scope, or roll it back when the scope is a dry run.
    pub async fn finish(self) -> TessellaResult<WriteOutcome> {
        if self.dry_run {
            self.txn.rollback().await?;
            log::info!("dry run: bulk write rolled back");
            return Ok(WriteOutcome::RolledBack);
        }
        if let Err(err) = self.txn.commit().await {
            log::warn!("bulk write commit failed: {err}");
            return Err(err.into());
        }
        Ok(WriteOutcome::Committed)
    }

    pub async fn rollback(self) -> TessellaResult<()> {
        self.txn.rollback().await?;
        Ok(())
    }
}

fn payload_values(value: &CellValue) -> [SimpleExpr; 5] {
    let mut bool_value = SeaValue::Bool(None);
    let mut int_value = SeaValue::BigInt(None);
    let mut float_value = SeaValue::Double(None);
    let mut str_value = SeaValue::String(None);
    let json_value = SeaValue::String(None);
    match value {
        CellValue::Bool(v) => bool_value = SeaValue::Bool(Some(*v)),
        CellValue::Int(v) => int_value = SeaValue::BigInt(Some(*v)),
        CellValue::Float(v) => float_value = SeaValue::Double(Some(*v)),
        CellValue::Str(v) => str_value = SeaValue::String(Some(v.clone())),
    }
    [
        bool_value.into(),
        int_value.into(),
        float_value.into(),
        str_value.into(),
        json_value.into(),
    ]
}

fn namespace_from_row(row: &QueryResult) -> TessellaResult<Namespace> {
    Ok(Namespace {
        namespace_id: NamespaceId(read_id(row, TessellaNamespaces::NamespaceId)?),
        path: row.try_get("", &col_name(TessellaNamespaces::Path))?,
        description: row.try_get("", &col_name(TessellaNamespaces::Description))?,
        meta_id: MetaId(read_id(row, TessellaNamespaces::MetaId)?),
    })
}

fn column_from_row(row: &QueryResult) -> TessellaResult<Column> {
    let kind_code: i16 = row.try_get("", &col_name(TessellaColumns::Kind))?;
    let kind = ColumnKind::from_i16(kind_code)
        .ok_or_else(|| TessellaError::storage(format!("unknown column kind code {kind_code}")))?;
    let type_code: i16 = row.try_get("", &col_name(TessellaColumns::ValueType))?;
    let value_type = ColumnType::from_i16(type_code)
        .ok_or_else(|| TessellaError::storage(format!("unknown value type code {type_code}")))?;
    Ok(Column {
        col_id: ColumnId(read_id(row, TessellaColumns::ColId)?),
        namespace_id: NamespaceId(read_id(row, TessellaColumns::NamespaceId)?),
        canonical_path: row.try_get("", &col_name(TessellaColumns::CanonicalPath))?,
        kind,
        value_type,
        description: row.try_get("", &col_name(TessellaColumns::Description))?,
        source_url: row.try_get("", &col_name(TessellaColumns::SourceUrl))?,
        meta_id: MetaId(read_id(row, TessellaColumns::MetaId)?),
    })
}

fn geography_from_row(row: &QueryResult) -> TessellaResult<Geography> {
    Ok(Geography {
        geo_id: GeoId(read_id(row, TessellaGeographies::GeoId)?),
        namespace_id: NamespaceId(read_id(row, TessellaGeographies::NamespaceId)?),
        path: row.try_get("", &col_name(TessellaGeographies::Path))?,
        meta_id: MetaId(read_id(row, TessellaGeographies::MetaId)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_notes_render_includes_every_part() {
        let notes = ImportNotes::new("load_census.py")
            .source_url("https://example.org/pl94.zip")
            .source_bytes(b"raw file body")
            .render();
        assert!(notes.starts_with("imported by load_census.py"));
        assert!(notes.contains("from https://example.org/pl94.zip"));
        assert!(notes.contains("(blake3:"));
    }

    #[test]
    fn import_notes_render_without_source_is_just_the_script() {
        let notes = ImportNotes::new("fixup.py").render();
        assert_eq!(notes, "imported by fixup.py");
    }
}
