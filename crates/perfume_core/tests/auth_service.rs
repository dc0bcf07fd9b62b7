use perfume_core::{can_mutate, can_read, Account, AccountRole, AuthService, CoreContext, Repository};

fn account(id: i64, email: Option<&str>, password: &str, role_code: Option<i64>) -> Account {
    Account {
        account_id: id,
        email: email.map(str::to_string),
        password: password.to_string(),
        note: format!("account {id}"),
        role_code,
    }
}

fn seeded() -> CoreContext {
    let ctx = CoreContext::in_memory().unwrap();
    let uow = ctx.unit_of_work();
    let accounts = uow.accounts();
    accounts
        .add(&account(1, Some("Boss@Shop.com"), "s3cret", Some(2)))
        .unwrap();
    accounts
        .add(&account(2, Some("clerk@shop.com"), "counter", Some(3)))
        .unwrap();
    accounts
        .add(&account(3, Some("admin@shop.com"), "root", Some(1)))
        .unwrap();
    accounts
        .add(&account(4, Some("guest@shop.com"), "guest", None))
        .unwrap();
    accounts.add(&account(5, None, "nomail", Some(2))).unwrap();
    uow.commit().unwrap();
    ctx
}

#[test]
fn manager_login_ignores_email_case() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);

    let session = auth.login("boss@SHOP.com", "s3cret");

    assert!(session.authenticated);
    assert!(session.is_manager());
    assert!(!session.is_staff());
    assert_eq!(session.user_id, Some(1));
    assert_eq!(session.email, "Boss@Shop.com");
    assert_eq!(session.note, "account 1");
    assert_eq!(session.role_label(), Some("Manager"));
    assert!(can_mutate(&session));
    assert!(can_read(&session));
}

#[test]
fn staff_login_can_read_but_not_mutate() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);

    let session = auth.login("clerk@shop.com", "counter");

    assert!(session.is_staff());
    assert_eq!(session.role, Some(AccountRole::Staff));
    assert!(can_read(&session));
    assert!(!can_mutate(&session));
}

#[test]
fn password_comparison_is_exact() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);

    assert!(!auth.login("boss@shop.com", "S3CRET").authenticated);
    assert!(!auth.login("boss@shop.com", "s3cret ").authenticated);
}

#[test]
fn accounts_without_allowed_role_are_denied() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);

    let admin = auth.login("admin@shop.com", "root");
    assert!(!admin.authenticated);
    assert_eq!(admin.user_id, None);
    assert_eq!(admin.role, None);

    assert!(!auth.login("guest@shop.com", "guest").authenticated);
}

#[test]
fn blank_or_unknown_credentials_are_denied() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);

    assert!(!auth.login("", "s3cret").authenticated);
    assert!(!auth.login("boss@shop.com", "").authenticated);
    assert!(!auth.login("", "").authenticated);
    assert!(!auth.login("nobody@shop.com", "s3cret").authenticated);
    assert!(!auth.login("", "nomail").authenticated);
}

#[test]
fn unauthenticated_session_has_no_rights() {
    let ctx = seeded();
    let auth = AuthService::new(&ctx);
    let session = auth.login("nobody@shop.com", "x");

    assert!(!can_read(&session));
    assert!(!can_mutate(&session));
    assert_eq!(session.role_label(), None);
}

#[test]
fn login_folds_non_ascii_email_case() {
    let ctx = CoreContext::in_memory().unwrap();
    let uow = ctx.unit_of_work();
    uow.accounts()
        .add(&account(1, Some("ÉLISE@shop.com"), "parfum", Some(3)))
        .unwrap();
    uow.commit().unwrap();
    let auth = AuthService::new(&ctx);

    let session = auth.login("élise@SHOP.com", "parfum");

    assert!(session.is_staff());
    assert_eq!(session.user_id, Some(1));
    assert_eq!(session.email, "ÉLISE@shop.com");
}
