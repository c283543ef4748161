//! SQLite backend.
//!
//! # Schema
//!
//! ```sql
//! digitalnet(netname TEXT, bitsize INTEGER, dimr INTEGER, dimf2 INTEGER,
//!            wafom REAL NULL, tvalue INTEGER NULL, data TEXT)
//! sobolbase(d INTEGER, s INTEGER, a INTEGER, mi TEXT)
//! ```
//!
//! `netname` is the family abbreviation, `dimr` the dimension, `dimf2` the
//! precision and `data` the row-major words separated by whitespace.
//! `sobolbase.mi` holds the initial direction numbers, likewise separated.
//!
//! Queries run on a private current-thread tokio runtime, one short-lived
//! connection per call, so callers stay synchronous.

use std::future::Future;
use std::path::{Path, PathBuf};

use qmc_core::{NetFamily, SobolSeed};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::error::{Backend, ConfigError, ParseError, Request, StoreResult};
use crate::memory::other_width;
use crate::record::NetRecord;
use crate::source::NetSource;

const SCHEMA: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS digitalnet (
        netname TEXT NOT NULL,
        bitsize INTEGER NOT NULL,
        dimr INTEGER NOT NULL,
        dimf2 INTEGER NOT NULL,
        wafom REAL,
        tvalue INTEGER,
        data TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS digitalnet_lookup
        ON digitalnet (netname, bitsize, dimr, dimf2)",
    "CREATE TABLE IF NOT EXISTS sobolbase (
        d INTEGER PRIMARY KEY,
        s INTEGER NOT NULL,
        a INTEGER NOT NULL,
        mi TEXT NOT NULL
    )",
];

const SELECT_RECORD: &str = "SELECT dimf2, wafom, tvalue, data FROM digitalnet
    WHERE netname = ?1 AND bitsize = ?2 AND dimr = ?3
      AND dimf2 = (SELECT MIN(dimf2) FROM digitalnet
                   WHERE netname = ?1 AND bitsize = ?2 AND dimr = ?3 AND dimf2 >= ?4)
    LIMIT 1";

const SELECT_DIMENSION_RANGE: &str =
    "SELECT MIN(dimr), MAX(dimr) FROM digitalnet WHERE netname = ?1";

const SELECT_PRECISION_RANGE: &str =
    "SELECT MIN(dimf2), MAX(dimf2) FROM digitalnet WHERE netname = ?1 AND dimr = ?2";

const SELECT_SEEDS: &str = "SELECT s, a, mi FROM sobolbase ORDER BY d LIMIT ?1";

const COUNT_SEEDS: &str = "SELECT COUNT(*) FROM sobolbase";

const INSERT_RECORD: &str = "INSERT INTO digitalnet
    (netname, bitsize, dimr, dimf2, wafom, tvalue, data)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const INSERT_SEED: &str = "INSERT OR REPLACE INTO sobolbase (d, s, a, mi) VALUES (?1, ?2, ?3, ?4)";

/// SQLite database of digital nets and Sobol seeds.
#[derive(Debug)]
pub struct RelationalStore {
    path: PathBuf,
    runtime: Runtime,
}

impl RelationalStore {
    /// Opens an existing database read-only.
    ///
    /// The file is not touched until the first query.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RuntimeError` if the runtime cannot start.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConfigError::RuntimeError(e.to_string()))?;
        Ok(Self {
            path: path.into(),
            runtime,
        })
    }

    /// Database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    async fn connect(&self, writable: bool) -> Result<SqliteConnection, sqlx::Error> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(!writable)
            .create_if_missing(writable)
            .connect()
            .await
    }

    /// Creates the tables (and the file) if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StorageError` on database failure.
    pub fn create_schema(&self) -> StoreResult<()> {
        let request = Request::new(NetFamily::NiederreiterXing, 0, 0, Backend::Relational);
        self.block_on(async {
            let mut conn = self.connect(true).await?;
            for statement in SCHEMA {
                sqlx::query(statement).execute(&mut conn).await?;
            }
            conn.close().await
        })
        .map_err(|e| request.storage(e))
    }

    /// Inserts one matrix record for `family`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::FormatError` for an invalid record and
    /// `StoreError::StorageError` on database failure.
    pub fn insert_record(&self, family: NetFamily, record: &NetRecord) -> StoreResult<()> {
        let request = Request::new(
            family,
            record.dimension,
            record.precision,
            Backend::Relational,
        );
        record.validate().map_err(|e| request.format(e))?;
        let used = record.dimension * record.precision as usize;
        let data = join_words(record.words[..used].iter());

        self.block_on(async {
            let mut conn = self.connect(true).await?;
            sqlx::query(INSERT_RECORD)
                .bind(family.abbreviation())
                .bind(i64::from(record.bit_size))
                .bind(record.dimension as i64)
                .bind(i64::from(record.precision))
                .bind(record.wafom)
                .bind(record.tvalue.map(i64::from))
                .bind(data)
                .execute(&mut conn)
                .await?;
            conn.close().await
        })
        .map_err(|e| request.storage(e))
    }

    /// Stores `seeds` as the Sobol seed table, row `k` under `d = k + 2`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::StorageError` on database failure.
    pub fn insert_sobol_seeds(&self, seeds: &[SobolSeed]) -> StoreResult<()> {
        let request = Request::new(NetFamily::Sobol, seeds.len() + 1, 0, Backend::Relational);
        self.block_on(async {
            let mut conn = self.connect(true).await?;
            let mut tx = conn.begin().await?;
            for (k, seed) in seeds.iter().enumerate() {
                sqlx::query(INSERT_SEED)
                    .bind(k as i64 + 2)
                    .bind(i64::from(seed.degree()))
                    .bind(i64::from(seed.coefficient()))
                    .bind(join_words(seed.initial().iter()))
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
            conn.close().await
        })
        .map_err(|e| request.storage(e))
    }

    fn fetch_record(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
        bit_size: u32,
    ) -> Result<Option<SqliteRow>, sqlx::Error> {
        self.block_on(async {
            let mut conn = self.connect(false).await?;
            let row = sqlx::query(SELECT_RECORD)
                .bind(family.abbreviation())
                .bind(i64::from(bit_size))
                .bind(s as i64)
                .bind(i64::from(m))
                .fetch_optional(&mut conn)
                .await?;
            conn.close().await?;
            Ok::<_, sqlx::Error>(row)
        })
    }

    fn fetch_range(
        &self,
        sql: &'static str,
        family: NetFamily,
        s: Option<usize>,
    ) -> Result<(Option<i64>, Option<i64>), sqlx::Error> {
        self.block_on(async {
            let mut conn = self.connect(false).await?;
            let mut query = sqlx::query(sql).bind(family.abbreviation());
            if let Some(s) = s {
                query = query.bind(s as i64);
            }
            let row = query.fetch_one(&mut conn).await?;
            conn.close().await?;
            let lo: Option<i64> = row.try_get(0)?;
            let hi: Option<i64> = row.try_get(1)?;
            Ok::<_, sqlx::Error>((lo, hi))
        })
    }
}

fn join_words<T: ToString>(words: impl Iterator<Item = T>) -> String {
    words.map(|w| w.to_string()).collect::<Vec<_>>().join(" ")
}

fn decode_record(
    row: &SqliteRow,
    s: usize,
    bit_size: u32,
) -> Result<NetRecord, ParseError> {
    let invalid = |field: &'static str, e: sqlx::Error| ParseError::InvalidToken {
        field,
        token: e.to_string(),
    };
    let precision: i64 = row.try_get("dimf2").map_err(|e| invalid("dimf2", e))?;
    let wafom: Option<f64> = row.try_get("wafom").map_err(|e| invalid("wafom", e))?;
    let tvalue: Option<i64> = row.try_get("tvalue").map_err(|e| invalid("tvalue", e))?;
    let data: String = row.try_get("data").map_err(|e| invalid("data", e))?;

    let precision = u32::try_from(precision).map_err(|_| ParseError::InvalidToken {
        field: "dimf2",
        token: precision.to_string(),
    })?;
    let words = data
        .split_whitespace()
        .map(|token| {
            token.parse::<u64>().map_err(|_| ParseError::InvalidToken {
                field: "matrix word",
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;

    let record = NetRecord {
        bit_size,
        dimension: s,
        precision,
        words,
        wafom: wafom.filter(|w| !w.is_nan()),
        tvalue: tvalue.and_then(|t| i32::try_from(t).ok()).filter(|&t| t >= 0),
    };
    record.validate()?;
    Ok(record)
}

fn decode_seed(row: usize, sql_row: &SqliteRow) -> Result<SobolSeed, ParseError> {
    let seed_error = |reason: String| ParseError::SeedRow { row, reason };
    let degree: i64 = sql_row.try_get("s").map_err(|e| seed_error(e.to_string()))?;
    let coefficient: i64 = sql_row.try_get("a").map_err(|e| seed_error(e.to_string()))?;
    let initial: String = sql_row.try_get("mi").map_err(|e| seed_error(e.to_string()))?;

    let degree = u32::try_from(degree)
        .ok()
        .filter(|&d| d > 0)
        .ok_or_else(|| seed_error(format!("invalid degree {}", degree)))?;
    let coefficient = u32::try_from(coefficient)
        .map_err(|_| seed_error(format!("invalid coefficient {}", coefficient)))?;
    let initial = initial
        .split_whitespace()
        .map(|t| {
            t.parse::<u32>()
                .map_err(|_| seed_error(format!("invalid initial number '{}'", t)))
        })
        .collect::<Result<Vec<u32>, _>>()?;
    if initial.len() < degree as usize {
        return Err(seed_error(format!(
            "{} initial numbers for degree {}",
            initial.len(),
            degree
        )));
    }
    Ok(SobolSeed::new(degree, coefficient, initial))
}

impl NetSource for RelationalStore {
    fn backend(&self) -> Backend {
        Backend::Relational
    }

    fn find_record(
        &self,
        family: NetFamily,
        s: usize,
        m: u32,
        bit_size: u32,
    ) -> StoreResult<NetRecord> {
        let request = Request::new(family, s, m, Backend::Relational);
        for bits in [bit_size, other_width(bit_size)] {
            debug!(family = %family, s, m, bits, "querying digitalnet");
            let row = self
                .fetch_record(family, s, m, bits)
                .map_err(|e| request.storage(e))?;
            if let Some(row) = row {
                return decode_record(&row, s, bits).map_err(|e| request.format(e));
            }
        }
        Err(request.not_found())
    }

    fn sobol_seeds(&self, count: usize) -> StoreResult<Vec<SobolSeed>> {
        let request = Request::new(NetFamily::Sobol, count + 1, 0, Backend::Relational);
        let rows = self
            .block_on(async {
                let mut conn = self.connect(false).await?;
                let rows = sqlx::query(SELECT_SEEDS)
                    .bind(count as i64)
                    .fetch_all(&mut conn)
                    .await?;
                conn.close().await?;
                Ok::<_, sqlx::Error>(rows)
            })
            .map_err(|e| request.storage(e))?;
        rows.iter()
            .enumerate()
            .map(|(k, row)| decode_seed(k, row))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| request.format(e))
    }

    fn sobol_seed_count(&self) -> StoreResult<usize> {
        let request = Request::new(NetFamily::Sobol, 0, 0, Backend::Relational);
        let count: i64 = self
            .block_on(async {
                let mut conn = self.connect(false).await?;
                let row = sqlx::query(COUNT_SEEDS).fetch_one(&mut conn).await?;
                conn.close().await?;
                row.try_get::<i64, _>(0)
            })
            .map_err(|e| request.storage(e))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn dimension_range(&self, family: NetFamily) -> StoreResult<(usize, usize)> {
        let request = Request::new(family, 0, 0, Backend::Relational);
        match self
            .fetch_range(SELECT_DIMENSION_RANGE, family, None)
            .map_err(|e| request.storage(e))?
        {
            (Some(lo), Some(hi)) if lo > 0 => Ok((lo as usize, hi as usize)),
            _ => Err(request.not_found()),
        }
    }

    fn precision_range(&self, family: NetFamily, s: usize) -> StoreResult<(u32, u32)> {
        let request = Request::new(family, s, 0, Backend::Relational);
        match self
            .fetch_range(SELECT_PRECISION_RANGE, family, Some(s))
            .map_err(|e| request.storage(e))?
        {
            (Some(lo), Some(hi)) => match (u32::try_from(lo), u32::try_from(hi)) {
                (Ok(lo), Ok(hi)) => Ok((lo, hi)),
                _ => Err(request.not_found()),
            },
            _ => Err(request.not_found()),
        }
    }
}
