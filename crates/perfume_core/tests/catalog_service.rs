use chrono::NaiveDate;
use perfume_core::{
    AccountRole, CatalogError, CatalogService, CoreContext, Manufacturer, Perfume, Repository,
    Session,
};

fn setup() -> CoreContext {
    let ctx = CoreContext::in_memory().unwrap();
    let uow = ctx.unit_of_work();
    uow.manufacturers()
        .add(&Manufacturer::new("M01", "Chanel", "France", "Paris"))
        .unwrap();
    uow.manufacturers()
        .add(&Manufacturer::new("M02", "Dior", "France", "Paris"))
        .unwrap();
    uow.commit().unwrap();
    ctx
}

fn signed_in(role: AccountRole) -> Session {
    Session {
        user_id: Some(1),
        email: "user@shop.com".to_string(),
        note: String::new(),
        role: Some(role),
        authenticated: true,
    }
}

fn manager() -> Session {
    signed_in(AccountRole::Manager)
}

fn staff() -> Session {
    signed_in(AccountRole::Staff)
}

fn sample(id: &str) -> Perfume {
    Perfume::new(
        id,
        "Rose Garden 5",
        "Rose, Musk",
        "Eau de Parfum",
        "6 hours",
        "M01",
    )
}

#[test]
fn add_then_get_round_trips_with_manufacturer_name() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    let perfume = sample("P01").with_release_date(NaiveDate::from_ymd_opt(2019, 5, 1).unwrap());

    let result = service.add(&manager(), &perfume);
    assert!(result.success);
    assert_eq!(result.message, "Perfume added successfully");

    let view = service.get_by_id("P01").unwrap().unwrap();
    assert_eq!(view.perfume, perfume);
    assert_eq!(view.manufacturer_name.as_deref(), Some("Chanel"));
    assert!(!ctx.unit_of_work().has_pending_changes());
}

#[test]
fn duplicate_id_is_rejected_and_first_record_kept() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);

    let mut clash = sample("P01");
    clash.name = "Other Name".to_string();
    let result = service.add(&manager(), &clash);

    assert!(!result.success);
    assert_eq!(result.message, "A perfume with this ID already exists");
    let stored = service.get_by_id("P01").unwrap().unwrap();
    assert_eq!(stored.perfume.name, "Rose Garden 5");
}

#[test]
fn invalid_perfume_is_rejected_before_store() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);

    let mut short_name = sample("P01");
    short_name.name = "Abc".to_string();
    let result = service.add(&manager(), &short_name);
    assert!(!result.success);
    assert_eq!(
        result.message,
        "Perfume Name must be between 5 and 90 characters"
    );

    let mut lower_case = sample("P02");
    lower_case.name = "rose Garden".to_string();
    let result = service.add(&manager(), &lower_case);
    assert_eq!(
        result.message,
        "Each word of Perfume Name must begin with a capital letter or digits 1-9"
    );

    let mut missing = sample("P03");
    missing.ingredients.clear();
    let result = service.add(&manager(), &missing);
    assert_eq!(result.message, "Ingredients are required");

    assert!(service.list_all().unwrap().is_empty());
}

#[test]
fn unknown_manufacturer_is_rejected() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    let mut orphan = sample("P01");
    orphan.manufacturer_id = "M99".to_string();

    let result = service.add(&manager(), &orphan);
    assert!(!result.success);
    assert_eq!(result.message, "Manufacturer not found");
    assert!(service.get_by_id("P01").unwrap().is_none());
}

#[test]
fn non_managers_cannot_mutate() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);

    for session in [staff(), Session::unauthenticated()] {
        let added = service.add(&session, &sample("P02"));
        assert!(!added.success);
        assert_eq!(added.message, "You do not have permission to add perfumes.");

        let updated = service.update(&session, &sample("P01"));
        assert!(!updated.success);
        assert_eq!(
            updated.message,
            "You do not have permission to update perfumes."
        );

        assert!(!service.delete(&session, "P01"));
    }

    assert_eq!(service.list_all().unwrap().len(), 1);
}

#[test]
fn update_replaces_every_field_except_id() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);

    let changed = Perfume::new(
        "P01",
        "Midnight Oud 2",
        "Oud, Saffron",
        "Extrait",
        "12 hours",
        "M02",
    )
    .with_release_date(NaiveDate::from_ymd_opt(2023, 11, 2).unwrap());
    let result = service.update(&manager(), &changed);
    assert!(result.success);
    assert_eq!(result.message, "Perfume updated successfully");

    let view = service.get_by_id("P01").unwrap().unwrap();
    assert_eq!(view.perfume, changed);
    assert_eq!(view.manufacturer_name.as_deref(), Some("Dior"));
    assert_eq!(service.list_all().unwrap().len(), 1);
}

#[test]
fn update_of_unknown_perfume_fails() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);

    let result = service.update(&manager(), &sample("P404"));
    assert!(!result.success);
    assert_eq!(result.message, "Perfume not found");
}

#[test]
fn update_to_unknown_manufacturer_fails() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);

    let mut moved = sample("P01");
    moved.manufacturer_id = "M99".to_string();
    let result = service.update(&manager(), &moved);
    assert_eq!(result.message, "Manufacturer not found");
    assert_eq!(
        service.get_by_id("P01").unwrap().unwrap().perfume.manufacturer_id,
        "M01"
    );
}

#[test]
fn delete_removes_existing_and_reports_unknown() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);
    assert!(service.add(&manager(), &sample("P02")).success);

    assert!(!service.delete(&manager(), "P404"));
    assert_eq!(service.list_all().unwrap().len(), 2);
    assert!(!ctx.unit_of_work().has_pending_changes());

    assert!(service.delete(&manager(), "P01"));
    assert!(service.get_by_id("P01").unwrap().is_none());
    assert!(service.get_by_id("P02").unwrap().is_some());
}

#[test]
fn store_failure_on_add_is_reported_and_rolled_back() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    let mut oversized = sample("P01");
    oversized.ingredients = "Rose, ".repeat(60);

    let result = service.add(&manager(), &oversized);

    assert!(!result.success);
    assert!(result.message.starts_with("Error adding perfume: "));
    assert!(!ctx.unit_of_work().has_pending_changes());
    assert!(service.get_by_id("P01").unwrap().is_none());
}

#[test]
fn store_failure_on_update_is_reported_and_rolled_back() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    assert!(service.add(&manager(), &sample("P01")).success);

    let mut oversized = sample("P01");
    oversized.concentration = "Eau de Parfum ".repeat(10);
    let result = service.update(&manager(), &oversized);

    assert!(!result.success);
    assert!(result.message.starts_with("Error updating perfume: "));
    assert!(!ctx.unit_of_work().has_pending_changes());
    assert_eq!(
        service.get_by_id("P01").unwrap().unwrap().perfume.concentration,
        "Eau de Parfum"
    );
}

#[test]
fn list_all_is_ordered_by_id_and_gated_for_callers() {
    let ctx = setup();
    let service = CatalogService::new(&ctx);
    for id in ["P03", "P01", "P02"] {
        assert!(service.add(&manager(), &sample(id)).success);
    }

    let ids: Vec<String> = service
        .list_all()
        .unwrap()
        .iter()
        .map(|view| view.perfume_id().to_string())
        .collect();
    assert_eq!(ids, vec!["P01", "P02", "P03"]);

    assert_eq!(service.list_all_for(&staff()).unwrap().len(), 3);
    assert!(matches!(
        service.list_all_for(&Session::unauthenticated()),
        Err(CatalogError::Unauthorized)
    ));
}

#[test]
fn perfume_without_manufacturer_row_lists_without_name() {
    let ctx = setup();
    let conn = ctx.unit_of_work().connection();
    conn.execute_batch(
        "PRAGMA foreign_keys = OFF;
         INSERT INTO perfumes (perfume_id, name, ingredients, concentration, longevity, manufacturer_id)
         VALUES ('P01', 'Lost Label', 'Vetiver', 'Eau de Toilette', '4 hours', 'M77');
         PRAGMA foreign_keys = ON;",
    )
    .unwrap();
    let service = CatalogService::new(&ctx);

    let views = service.list_all().unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].manufacturer_name, None);
    assert_eq!(service.get_by_id("P01").unwrap().unwrap().manufacturer_name, None);
}
