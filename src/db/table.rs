//! Keyed table abstraction over a partition-key / sort-key SQLite table.
//!
//! A [`TableSchema`] describes one record type. [`KeyedTable`] gives that
//! type point lookup, predicate-filtered scans, upsert and delete. The event
//! and lock stores are both instantiations of it.

use crate::errors::{AppError, AppResult};
use rusqlite::{CachedStatement, Connection, OptionalExtension, Row, params_from_iter};
use std::marker::PhantomData;
use tracing::{debug, warn};

/// Shape of a record stored in a keyed table.
pub trait TableSchema: Sized {
    const TABLE: &'static str;
    const PARTITION_KEY: &'static str;
    const SORT_KEY: &'static str;
    /// Non-key attributes, in column order.
    const ATTRIBUTES: &'static [&'static str];

    fn partition_key(&self) -> &str;
    fn sort_key(&self) -> &str;

    /// Values for `ATTRIBUTES`, in the same order.
    fn attribute_values(&self) -> Vec<&str>;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

fn columns<S: TableSchema>() -> Vec<&'static str> {
    let mut cols = vec![S::PARTITION_KEY, S::SORT_KEY];
    cols.extend_from_slice(S::ATTRIBUTES);
    cols
}

fn is_column<S: TableSchema>(attribute: &str) -> bool {
    attribute == S::PARTITION_KEY
        || attribute == S::SORT_KEY
        || S::ATTRIBUTES.contains(&attribute)
}

/// Result of a point lookup. Absence is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

/// Scan predicate over one or more attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq {
        attribute: &'static str,
        value: String,
    },
    /// Inclusive on both ends, compared as text.
    Between {
        attribute: &'static str,
        low: String,
        high: String,
    },
    And(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn eq(attribute: &'static str, value: impl Into<String>) -> Self {
        Filter::Eq {
            attribute,
            value: value.into(),
        }
    }

    pub fn between(
        attribute: &'static str,
        low: impl Into<String>,
        high: impl Into<String>,
    ) -> Self {
        Filter::Between {
            attribute,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn and(self, other: Filter) -> Self {
        Filter::And(Box::new(self), Box::new(other))
    }

    fn check<S: TableSchema>(&self) -> AppResult<()> {
        match self {
            Filter::Eq { attribute, .. } | Filter::Between { attribute, .. } => {
                if is_column::<S>(attribute) {
                    Ok(())
                } else {
                    Err(AppError::UnknownAttribute {
                        table: S::TABLE,
                        attribute: *attribute,
                    })
                }
            }
            Filter::And(left, right) => {
                left.check::<S>()?;
                right.check::<S>()
            }
        }
    }

    fn render(&self, sql: &mut String, params: &mut Vec<String>) {
        match self {
            Filter::Eq { attribute, value } => {
                params.push(value.clone());
                sql.push_str(&format!("{attribute} = ?{}", params.len()));
            }
            Filter::Between {
                attribute,
                low,
                high,
            } => {
                params.push(low.clone());
                let low_idx = params.len();
                params.push(high.clone());
                sql.push_str(&format!(
                    "{attribute} BETWEEN ?{low_idx} AND ?{}",
                    params.len()
                ));
            }
            Filter::And(left, right) => {
                sql.push('(');
                left.render(sql, params);
                sql.push_str(") AND (");
                right.render(sql, params);
                sql.push(')');
            }
        }
    }
}

/// A restartable scan. Nothing touches the store until it is run through
/// [`Scan::prepare`], [`Scan::try_for_each`] or [`Scan::collect`], and each
/// run re-reads the table.
pub struct Scan<'c, S> {
    conn: &'c Connection,
    filter: Option<Filter>,
    limit: Option<usize>,
    _schema: PhantomData<fn() -> S>,
}

impl<'c, S: TableSchema> Scan<'c, S> {
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn statement(&self) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {} FROM {}", columns::<S>().join(", "), S::TABLE);
        let mut params = Vec::new();

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            filter.render(&mut sql, &mut params);
        }

        // rowid keeps first-seen order stable across runs
        sql.push_str(" ORDER BY rowid");

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        (sql, params)
    }

    /// Compile the scan against the store. Rows are read only as
    /// [`ScanRows::iter`] is advanced.
    pub fn prepare(&self) -> AppResult<ScanRows<'c, S>> {
        let (sql, params) = self.statement();
        Ok(ScanRows {
            stmt: self.conn.prepare_cached(&sql)?,
            params,
            _schema: PhantomData,
        })
    }

    /// Stream matching records into `f` one row at a time.
    /// Returns the number of records visited.
    pub fn try_for_each<F>(&self, mut f: F) -> AppResult<usize>
    where
        F: FnMut(S) -> AppResult<()>,
    {
        let mut rows = self.prepare()?;

        let mut seen = 0;
        for record in rows.iter()? {
            f(record?)?;
            seen += 1;
        }
        Ok(seen)
    }

    pub fn collect(&self) -> AppResult<Vec<S>> {
        let mut out = Vec::new();
        self.try_for_each(|record| {
            out.push(record);
            Ok(())
        })?;
        Ok(out)
    }
}

/// A compiled scan. Each call to [`ScanRows::iter`] re-runs the query.
pub struct ScanRows<'c, S> {
    stmt: CachedStatement<'c>,
    params: Vec<String>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: TableSchema> ScanRows<'_, S> {
    pub fn iter(&mut self) -> AppResult<impl Iterator<Item = AppResult<S>> + '_> {
        let rows = self
            .stmt
            .query_map(params_from_iter(self.params.iter()), S::from_row)?;
        Ok(rows.map(|row| row.map_err(AppError::from)))
    }
}

/// Outcome of a scan-then-delete pass.
///
/// The pass is not atomic: when `interrupted` is set, `count` records were
/// removed before the fault and the rest were left in place.
#[derive(Debug)]
pub struct BulkDelete {
    pub count: usize,
    pub interrupted: Option<AppError>,
}

impl BulkDelete {
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

pub struct KeyedTable<'c, S> {
    conn: &'c Connection,
    _schema: PhantomData<fn() -> S>,
}

impl<'c, S: TableSchema> KeyedTable<'c, S> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            _schema: PhantomData,
        }
    }

    pub fn get(&self, partition_key: &str, sort_key: &str) -> AppResult<Lookup<S>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 AND {} = ?2",
            columns::<S>().join(", "),
            S::TABLE,
            S::PARTITION_KEY,
            S::SORT_KEY
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let found = stmt
            .query_row([partition_key, sort_key], S::from_row)
            .optional()?;

        Ok(found.map_or(Lookup::NotFound, Lookup::Found))
    }

    /// Build a scan over the whole table, or over the records matching
    /// `filter`. Fails only if the filter names an attribute the table
    /// does not have.
    pub fn scan(&self, filter: Option<Filter>) -> AppResult<Scan<'c, S>> {
        if let Some(f) = &filter {
            f.check::<S>()?;
        }

        Ok(Scan {
            conn: self.conn,
            filter,
            limit: None,
            _schema: PhantomData,
        })
    }

    /// True when at least one record matches; stops at the first hit.
    pub fn exists(&self, filter: Filter) -> AppResult<bool> {
        let scan = self.scan(Some(filter))?.limit(1);
        let (sql, params) = scan.statement();

        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.exists(params_from_iter(params.iter()))?)
    }

    /// Insert, or fully overwrite the record at the same key.
    /// Overwrites keep the original row position.
    pub fn put(&self, record: &S) -> AppResult<()> {
        let cols = columns::<S>();
        let placeholders = (1..=cols.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");

        let on_conflict = if S::ATTRIBUTES.is_empty() {
            "DO NOTHING".to_string()
        } else {
            let sets = S::ATTRIBUTES
                .iter()
                .map(|a| format!("{a} = excluded.{a}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("DO UPDATE SET {sets}")
        };

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}, {}) {}",
            S::TABLE,
            cols.join(", "),
            placeholders,
            S::PARTITION_KEY,
            S::SORT_KEY,
            on_conflict
        );

        let mut values = vec![record.partition_key(), record.sort_key()];
        values.extend(record.attribute_values());

        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(values))?;
        Ok(())
    }

    /// Remove the record at the key. A missing key is not an error;
    /// the return value tells whether a row was actually removed.
    pub fn delete(&self, partition_key: &str, sort_key: &str) -> AppResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1 AND {} = ?2",
            S::TABLE,
            S::PARTITION_KEY,
            S::SORT_KEY
        );

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let removed = stmt.execute([partition_key, sort_key])?;
        Ok(removed > 0)
    }

    /// Scan for `filter`, then delete every match one key at a time.
    pub fn delete_matching(&self, filter: Filter) -> BulkDelete {
        let mut keys: Vec<(String, String)> = Vec::new();

        let scanned = self.scan(Some(filter)).and_then(|scan| {
            scan.try_for_each(|record| {
                keys.push((
                    record.partition_key().to_string(),
                    record.sort_key().to_string(),
                ));
                Ok(())
            })
        });

        if let Err(e) = scanned {
            warn!(table = S::TABLE, error = %e, "bulk delete scan failed");
            return BulkDelete {
                count: 0,
                interrupted: Some(e),
            };
        }

        let mut count = 0;
        for (pk, sk) in &keys {
            match self.delete(pk, sk) {
                Ok(true) => count += 1,
                // removed by someone else since the scan
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        table = S::TABLE,
                        deleted = count,
                        matched = keys.len(),
                        error = %e,
                        "bulk delete interrupted"
                    );
                    return BulkDelete {
                        count,
                        interrupted: Some(e),
                    };
                }
            }
        }

        debug!(table = S::TABLE, count, "bulk delete finished");
        BulkDelete {
            count,
            interrupted: None,
        }
    }
}
