//! Perfume catalog use-case service.
//!
//! # Responsibility
//! - Gate every mutation on the manager role and every search on read access.
//! - Validate input before the store is touched.
//! - Check uniqueness, existence and the manufacturer reference, then commit.
//! - Search by ingredients/concentration and group matches by ingredients.
//!
//! # Invariants
//! - Expected failures (permission, validation, duplicate id, unknown id,
//!   unknown manufacturer) come back as `OperationResult` / `false`.
//! - Store failures roll back staged writes and become
//!   `Error <verb>ing perfume: <detail>`; nothing is retried.
//! - `perfume_id` is never changed by `update`.
//! - Groups appear in first-seen key order; members keep match order.

use crate::context::CoreContext;
use crate::model::perfume::{IngredientGroup, Perfume, PerfumeView};
use crate::model::session::Session;
use crate::repo::perfume_repo::{list_perfumes_with_manufacturer, search_perfumes};
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::{RepoError, RepoResult, Repository};
use crate::service::auth_service::{can_mutate, can_read};
use crate::validation::validate_perfume;
use log::{error, info};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MSG_ADDED: &str = "Perfume added successfully";
const MSG_UPDATED: &str = "Perfume updated successfully";
const MSG_DUPLICATE_ID: &str = "A perfume with this ID already exists";
const MSG_NOT_FOUND: &str = "Perfume not found";
const MSG_MANUFACTURER_NOT_FOUND: &str = "Manufacturer not found";
const MSG_ADD_DENIED: &str = "You do not have permission to add perfumes.";
const MSG_UPDATE_DENIED: &str = "You do not have permission to update perfumes.";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failure of a catalog read operation.
#[derive(Debug)]
pub enum CatalogError {
    /// Session lacks read access.
    Unauthorized,
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(
                f,
                "You must be logged in as Manager or Staff to perform search operations."
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unauthorized => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// `(success, message)` outcome of a mutating catalog operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of [`CatalogService::search`].
///
/// An empty term lists the catalog ungrouped; any other term groups matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    All(Vec<PerfumeView>),
    Grouped(Vec<IngredientGroup>),
}

impl SearchOutcome {
    /// Every perfume in the outcome, groups flattened in order.
    pub fn into_views(self) -> Vec<PerfumeView> {
        match self {
            Self::All(views) => views,
            Self::Grouped(groups) => groups
                .into_iter()
                .flat_map(|group| group.perfumes)
                .collect(),
        }
    }
}

pub struct CatalogService<'ctx> {
    uow: &'ctx UnitOfWork,
}

impl<'ctx> CatalogService<'ctx> {
    pub fn new(ctx: &'ctx CoreContext) -> Self {
        Self {
            uow: ctx.unit_of_work(),
        }
    }

    /// Every perfume with its manufacturer name, ordered by id.
    ///
    /// Unrestricted: used for the catalog's own listing needs.
    pub fn list_all(&self) -> CatalogResult<Vec<PerfumeView>> {
        Ok(list_perfumes_with_manufacturer(self.uow.connection())?)
    }

    /// [`Self::list_all`] on behalf of a signed-in caller.
    pub fn list_all_for(&self, session: &Session) -> CatalogResult<Vec<PerfumeView>> {
        require_read(session, "list")?;
        self.list_all()
    }

    pub fn get_by_id(&self, id: &str) -> CatalogResult<Option<PerfumeView>> {
        let Some(perfume) = self.uow.perfumes().get_by_id(id)? else {
            return Ok(None);
        };
        let manufacturer_name = self
            .uow
            .manufacturers()
            .get_by_id(&perfume.manufacturer_id)?
            .map(|manufacturer| manufacturer.name);
        Ok(Some(PerfumeView {
            perfume,
            manufacturer_name,
        }))
    }

    /// Case-sensitive substring search over ingredients and concentration.
    pub fn search(&self, session: &Session, term: &str) -> CatalogResult<SearchOutcome> {
        require_read(session, "search")?;

        if term.is_empty() {
            return Ok(SearchOutcome::All(self.list_all()?));
        }

        let matches = search_perfumes(self.uow.connection(), term)?;
        info!(
            "event=perfume_search module=catalog status=ok term_chars={} matches={}",
            term.chars().count(),
            matches.len()
        );
        Ok(SearchOutcome::Grouped(group_views_by_ingredients(matches)))
    }

    /// Whole catalog grouped by exact ingredients.
    pub fn group_all_by_ingredients(
        &self,
        session: &Session,
    ) -> CatalogResult<Vec<IngredientGroup>> {
        require_read(session, "group")?;
        Ok(group_views_by_ingredients(self.list_all()?))
    }

    pub fn add(&self, session: &Session, perfume: &Perfume) -> OperationResult {
        if !can_mutate(session) {
            info!("event=perfume_add module=catalog status=denied");
            return OperationResult::failure(MSG_ADD_DENIED);
        }
        if let Err(err) = validate_perfume(perfume) {
            info!("event=perfume_add module=catalog status=rejected reason=validation");
            return OperationResult::failure(err.to_string());
        }

        self.add_checked(perfume).unwrap_or_else(|err| {
            self.discard_staged();
            error!(
                "event=perfume_add module=catalog status=error perfume_id={} error={err}",
                perfume.perfume_id
            );
            OperationResult::failure(format!("Error adding perfume: {err}"))
        })
    }

    pub fn update(&self, session: &Session, perfume: &Perfume) -> OperationResult {
        if !can_mutate(session) {
            info!("event=perfume_update module=catalog status=denied");
            return OperationResult::failure(MSG_UPDATE_DENIED);
        }
        if let Err(err) = validate_perfume(perfume) {
            info!("event=perfume_update module=catalog status=rejected reason=validation");
            return OperationResult::failure(err.to_string());
        }

        self.update_checked(perfume).unwrap_or_else(|err| {
            self.discard_staged();
            error!(
                "event=perfume_update module=catalog status=error perfume_id={} error={err}",
                perfume.perfume_id
            );
            OperationResult::failure(format!("Error updating perfume: {err}"))
        })
    }

    /// Removes one perfume; `false` when denied, unknown, or the store fails.
    pub fn delete(&self, session: &Session, id: &str) -> bool {
        if !can_mutate(session) {
            info!("event=perfume_delete module=catalog status=denied");
            return false;
        }

        self.delete_checked(id).unwrap_or_else(|err| {
            self.discard_staged();
            error!("event=perfume_delete module=catalog status=error perfume_id={id} error={err}");
            false
        })
    }

    fn add_checked(&self, perfume: &Perfume) -> RepoResult<OperationResult> {
        let perfumes = self.uow.perfumes();
        if perfumes.get_by_id(&perfume.perfume_id)?.is_some() {
            info!(
                "event=perfume_add module=catalog status=rejected reason=duplicate_id perfume_id={}",
                perfume.perfume_id
            );
            return Ok(OperationResult::failure(MSG_DUPLICATE_ID));
        }
        if !self.manufacturer_exists(&perfume.manufacturer_id)? {
            return Ok(OperationResult::failure(MSG_MANUFACTURER_NOT_FOUND));
        }

        perfumes.add(perfume)?;
        let affected = self.uow.commit()?;
        info!(
            "event=perfume_add module=catalog status=ok perfume_id={} affected_rows={affected}",
            perfume.perfume_id
        );
        Ok(OperationResult::success(MSG_ADDED))
    }

    fn update_checked(&self, perfume: &Perfume) -> RepoResult<OperationResult> {
        let perfumes = self.uow.perfumes();
        let Some(mut stored) = perfumes.get_by_id(&perfume.perfume_id)? else {
            return Ok(OperationResult::failure(MSG_NOT_FOUND));
        };
        if !self.manufacturer_exists(&perfume.manufacturer_id)? {
            return Ok(OperationResult::failure(MSG_MANUFACTURER_NOT_FOUND));
        }

        stored.apply_changes(perfume);
        perfumes.update(&stored)?;
        let affected = self.uow.commit()?;
        info!(
            "event=perfume_update module=catalog status=ok perfume_id={} affected_rows={affected}",
            stored.perfume_id
        );
        Ok(OperationResult::success(MSG_UPDATED))
    }

    fn delete_checked(&self, id: &str) -> RepoResult<bool> {
        let perfumes = self.uow.perfumes();
        if perfumes.get_by_id(id)?.is_none() {
            return Ok(false);
        }

        perfumes.delete(id)?;
        let affected = self.uow.commit()?;
        info!("event=perfume_delete module=catalog status=ok perfume_id={id} affected_rows={affected}");
        Ok(true)
    }

    fn manufacturer_exists(&self, manufacturer_id: &str) -> RepoResult<bool> {
        Ok(self
            .uow
            .manufacturers()
            .get_by_id(manufacturer_id)?
            .is_some())
    }

    fn discard_staged(&self) {
        if let Err(err) = self.uow.rollback() {
            error!("event=uow_rollback module=catalog status=error error={err}");
        }
    }
}

/// Partitions views by exact `ingredients`, keeping first-seen key order.
pub fn group_views_by_ingredients(views: Vec<PerfumeView>) -> Vec<IngredientGroup> {
    let mut groups: Vec<IngredientGroup> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for view in views {
        match positions.get(&view.perfume.ingredients) {
            Some(&position) => groups[position].perfumes.push(view),
            None => {
                positions.insert(view.perfume.ingredients.clone(), groups.len());
                groups.push(IngredientGroup {
                    ingredients: view.perfume.ingredients.clone(),
                    perfumes: vec![view],
                });
            }
        }
    }

    groups
}

fn require_read(session: &Session, action: &'static str) -> CatalogResult<()> {
    if can_read(session) {
        return Ok(());
    }
    info!("event=perfume_{action} module=catalog status=denied");
    Err(CatalogError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::{group_views_by_ingredients, SearchOutcome};
    use crate::model::perfume::{Perfume, PerfumeView};

    fn view(id: &str, ingredients: &str) -> PerfumeView {
        PerfumeView {
            perfume: Perfume::new(id, "Some Name", ingredients, "EDP", "6h", "M1"),
            manufacturer_name: None,
        }
    }

    fn ids(views: &[PerfumeView]) -> Vec<&str> {
        views.iter().map(PerfumeView::perfume_id).collect()
    }

    #[test]
    fn groups_keep_first_seen_key_order_and_member_order() {
        let groups = group_views_by_ingredients(vec![
            view("P1", "Musk"),
            view("P2", "Amber"),
            view("P3", "Musk"),
            view("P4", "Citrus"),
            view("P5", "Amber"),
        ]);

        let keys: Vec<&str> = groups.iter().map(|g| g.ingredients.as_str()).collect();
        assert_eq!(keys, vec!["Musk", "Amber", "Citrus"]);
        assert_eq!(ids(&groups[0].perfumes), vec!["P1", "P3"]);
        assert_eq!(ids(&groups[1].perfumes), vec!["P2", "P5"]);
        assert_eq!(ids(&groups[2].perfumes), vec!["P4"]);
    }

    #[test]
    fn grouping_keys_are_exact_strings() {
        let groups = group_views_by_ingredients(vec![view("P1", "Musk"), view("P2", "musk")]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn grouping_empty_input_yields_no_groups() {
        assert!(group_views_by_ingredients(Vec::new()).is_empty());
    }

    #[test]
    fn into_views_flattens_groups_in_order() {
        let outcome = SearchOutcome::Grouped(group_views_by_ingredients(vec![
            view("P1", "Musk"),
            view("P2", "Amber"),
            view("P3", "Musk"),
        ]));
        assert_eq!(ids(&outcome.into_views()), vec!["P1", "P3", "P2"]);
    }
}
