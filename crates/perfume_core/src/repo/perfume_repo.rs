//! Perfume repository and catalog read queries.
//!
//! # Responsibility
//! - Implement the record-store contract for `perfumes`.
//! - Provide the joined listing and the substring search the catalog needs.
//!
//! # Invariants
//! - Listings are ordered by `perfume_id` so grouping stays deterministic.
//! - Substring search is case-sensitive (`instr`, not `LIKE`).

use crate::model::perfume::{Perfume, PerfumeView};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, Row};

const PERFUME_SELECT_SQL: &str = "SELECT
    perfume_id,
    name,
    ingredients,
    release_date,
    concentration,
    longevity,
    manufacturer_id
FROM perfumes";

const PERFUME_VIEW_SELECT_SQL: &str = "SELECT
    p.perfume_id AS perfume_id,
    p.name AS name,
    p.ingredients AS ingredients,
    p.release_date AS release_date,
    p.concentration AS concentration,
    p.longevity AS longevity,
    p.manufacturer_id AS manufacturer_id,
    m.name AS manufacturer_name
FROM perfumes p
LEFT JOIN manufacturers m ON m.manufacturer_id = p.manufacturer_id";

/// SQLite-backed perfume repository bound to one unit of work.
pub struct SqlitePerfumeRepository<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> SqlitePerfumeRepository<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }
}

impl Repository for SqlitePerfumeRepository<'_> {
    type Entity = Perfume;
    type Key = str;

    fn get_all(&self) -> RepoResult<Vec<Perfume>> {
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{PERFUME_SELECT_SQL} ORDER BY perfume_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut perfumes = Vec::new();
        while let Some(row) = rows.next()? {
            perfumes.push(parse_perfume_row(row)?);
        }
        Ok(perfumes)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Perfume>> {
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{PERFUME_SELECT_SQL} WHERE perfume_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_perfume_row(row)?));
        }
        Ok(None)
    }

    fn add(&self, perfume: &Perfume) -> RepoResult<()> {
        self.uow.execute(
            "INSERT INTO perfumes (
                perfume_id,
                name,
                ingredients,
                release_date,
                concentration,
                longevity,
                manufacturer_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                perfume.perfume_id,
                perfume.name,
                perfume.ingredients,
                perfume.release_date,
                perfume.concentration,
                perfume.longevity,
                perfume.manufacturer_id,
            ],
        )?;
        Ok(())
    }

    fn update(&self, perfume: &Perfume) -> RepoResult<()> {
        let changed = self.uow.execute(
            "UPDATE perfumes
             SET
                name = ?2,
                ingredients = ?3,
                release_date = ?4,
                concentration = ?5,
                longevity = ?6,
                manufacturer_id = ?7
             WHERE perfume_id = ?1;",
            params![
                perfume.perfume_id,
                perfume.name,
                perfume.ingredients,
                perfume.release_date,
                perfume.concentration,
                perfume.longevity,
                perfume.manufacturer_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("perfume", &perfume.perfume_id));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .uow
            .execute("DELETE FROM perfumes WHERE perfume_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("perfume", id));
        }
        Ok(())
    }
}

/// Every perfume joined with its manufacturer's display name.
pub fn list_perfumes_with_manufacturer(conn: &Connection) -> RepoResult<Vec<PerfumeView>> {
    query_views(
        conn,
        &format!("{PERFUME_VIEW_SELECT_SQL} ORDER BY p.perfume_id ASC;"),
        [],
    )
}

/// Perfumes whose ingredients or concentration contain `term` verbatim.
///
/// An empty `term` selects the whole catalog.
pub fn search_perfumes(conn: &Connection, term: &str) -> RepoResult<Vec<PerfumeView>> {
    if term.is_empty() {
        return list_perfumes_with_manufacturer(conn);
    }

    query_views(
        conn,
        &format!(
            "{PERFUME_VIEW_SELECT_SQL}
             WHERE instr(p.ingredients, ?1) > 0
                OR instr(p.concentration, ?1) > 0
             ORDER BY p.perfume_id ASC;"
        ),
        [term],
    )
}

fn query_views<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Vec<PerfumeView>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut views = Vec::new();
    while let Some(row) = rows.next()? {
        views.push(PerfumeView {
            perfume: parse_perfume_row(row)?,
            manufacturer_name: row.get("manufacturer_name")?,
        });
    }
    Ok(views)
}

fn parse_perfume_row(row: &Row<'_>) -> RepoResult<Perfume> {
    Ok(Perfume {
        perfume_id: row.get("perfume_id")?,
        name: row.get("name")?,
        ingredients: row.get("ingredients")?,
        release_date: row.get("release_date")?,
        concentration: row.get("concentration")?,
        longevity: row.get("longevity")?,
        manufacturer_id: row.get("manufacturer_id")?,
    })
}
