//! Manufacturer repository and sorted lookup query.

use crate::model::manufacturer::Manufacturer;
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::{RepoError, RepoResult, Repository};
use rusqlite::{params, Connection, Row};

const MANUFACTURER_SELECT_SQL: &str = "SELECT
    manufacturer_id,
    name,
    country,
    address
FROM manufacturers";

/// SQLite-backed manufacturer repository bound to one unit of work.
pub struct SqliteManufacturerRepository<'uow> {
    uow: &'uow UnitOfWork,
}

impl<'uow> SqliteManufacturerRepository<'uow> {
    pub fn new(uow: &'uow UnitOfWork) -> Self {
        Self { uow }
    }
}

impl Repository for SqliteManufacturerRepository<'_> {
    type Entity = Manufacturer;
    type Key = str;

    fn get_all(&self) -> RepoResult<Vec<Manufacturer>> {
        query_manufacturers(
            self.uow.connection(),
            &format!("{MANUFACTURER_SELECT_SQL} ORDER BY manufacturer_id ASC;"),
        )
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Option<Manufacturer>> {
        let mut stmt = self
            .uow
            .connection()
            .prepare(&format!("{MANUFACTURER_SELECT_SQL} WHERE manufacturer_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_manufacturer_row(row)?));
        }
        Ok(None)
    }

    fn add(&self, manufacturer: &Manufacturer) -> RepoResult<()> {
        self.uow.execute(
            "INSERT INTO manufacturers (manufacturer_id, name, country, address)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                manufacturer.manufacturer_id,
                manufacturer.name,
                manufacturer.country,
                manufacturer.address,
            ],
        )?;
        Ok(())
    }

    fn update(&self, manufacturer: &Manufacturer) -> RepoResult<()> {
        let changed = self.uow.execute(
            "UPDATE manufacturers
             SET name = ?2, country = ?3, address = ?4
             WHERE manufacturer_id = ?1;",
            params![
                manufacturer.manufacturer_id,
                manufacturer.name,
                manufacturer.country,
                manufacturer.address,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(
                "manufacturer",
                &manufacturer.manufacturer_id,
            ));
        }
        Ok(())
    }

    /// Dependent perfumes are removed by the store (`ON DELETE CASCADE`).
    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .uow
            .execute("DELETE FROM manufacturers WHERE manufacturer_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("manufacturer", id));
        }
        Ok(())
    }
}

/// All manufacturers in ascending display-name order.
pub fn list_manufacturers_sorted(conn: &Connection) -> RepoResult<Vec<Manufacturer>> {
    query_manufacturers(
        conn,
        &format!("{MANUFACTURER_SELECT_SQL} ORDER BY name ASC, manufacturer_id ASC;"),
    )
}

fn query_manufacturers(conn: &Connection, sql: &str) -> RepoResult<Vec<Manufacturer>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut manufacturers = Vec::new();
    while let Some(row) = rows.next()? {
        manufacturers.push(parse_manufacturer_row(row)?);
    }
    Ok(manufacturers)
}

fn parse_manufacturer_row(row: &Row<'_>) -> RepoResult<Manufacturer> {
    Ok(Manufacturer {
        manufacturer_id: row.get("manufacturer_id")?,
        name: row.get("name")?,
        country: row.get("country")?,
        address: row.get("address")?,
    })
}
