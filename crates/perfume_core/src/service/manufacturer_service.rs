//! Read-only manufacturer lookups used to fill pickers and enrich perfumes.

use crate::context::CoreContext;
use crate::model::manufacturer::Manufacturer;
use crate::repo::manufacturer_repo::list_manufacturers_sorted;
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::{RepoResult, Repository};

pub struct ManufacturerService<'ctx> {
    uow: &'ctx UnitOfWork,
}

impl<'ctx> ManufacturerService<'ctx> {
    pub fn new(ctx: &'ctx CoreContext) -> Self {
        Self {
            uow: ctx.unit_of_work(),
        }
    }

    /// All manufacturers, ascending by display name.
    pub fn list_all_sorted(&self) -> RepoResult<Vec<Manufacturer>> {
        list_manufacturers_sorted(self.uow.connection())
    }

    pub fn get_by_id(&self, id: &str) -> RepoResult<Option<Manufacturer>> {
        self.uow.manufacturers().get_by_id(id)
    }
}
