// tests/identifier_resolution_tests.rs
mod common;

use common::*;
use covenant::identifier::{is_order_number, is_registration_code};
use covenant::{issue_order_number, issue_registration_code, resolve_order, resolve_registration, CovenantError, Stores};
use regex::Regex;
use serial_test::serial;

#[test]
fn test_generated_codes_match_published_formats() {
  let registration_re = Regex::new(r"^RC-[A-Z0-9]{4}-[A-Z0-9]{4}$").unwrap();
  let order_re = Regex::new(r"^ORD-[A-Z0-9]{6}$").unwrap();
  for _ in 0..1_000 {
    let code = issue_registration_code();
    let number = issue_order_number();
    assert!(registration_re.is_match(&code), "{}", code);
    assert!(order_re.is_match(&number), "{}", number);
    assert!(is_registration_code(&code));
    assert!(is_order_number(&number));
  }
}

#[tokio::test]
#[serial]
async fn test_registration_resolves_ignoring_case_and_whitespace() {
  setup_tracing();
  let stores = Stores::in_memory();
  let created = stores
    .registrations
    .create(new_registration("Aurelia", "RC-AB12-CD34"))
    .await
    .unwrap();

  let exact = resolve_registration(stores.registrations.as_ref(), "RC-AB12-CD34").await.unwrap();
  let sloppy = resolve_registration(stores.registrations.as_ref(), " rc-ab12-cd34 ").await.unwrap();

  assert_eq!(exact.id, created.id);
  assert_eq!(sloppy.id, created.id);
}

#[tokio::test]
#[serial]
async fn test_registration_resolution_fails_closed() {
  setup_tracing();
  let stores = Stores::in_memory();
  stores
    .registrations
    .create(new_registration("Aurelia", "RC-AB12-CD34"))
    .await
    .unwrap();

  for probe in ["RC-AB12-CD35", "RC-AB12", "", "   "] {
    let result = resolve_registration(stores.registrations.as_ref(), probe).await;
    assert!(matches!(result, Err(CovenantError::NotFound(_))), "probe {:?}", probe);
  }
}

#[tokio::test]
#[serial]
async fn test_order_resolution_requires_matching_registrant() {
  setup_tracing();
  let stores = Stores::in_memory();
  let owner = stores
    .registrations
    .create(new_registration("Owner", "RC-OWN1-0001"))
    .await
    .unwrap();
  let stranger = stores
    .registrations
    .create(new_registration("Stranger", "RC-STR1-0002"))
    .await
    .unwrap();
  let item = stores.items.create(new_item("Obsidian Mirror", 12_500)).await.unwrap();
  stores
    .orders
    .create(new_order(owner.id, item.id, "ORD-MIRROR", item.price_cents))
    .await
    .unwrap();

  let found = resolve_order(stores.orders.as_ref(), owner.id, " ord-mirror ").await.unwrap();
  assert_eq!(found.order.order_number, "ORD-MIRROR");
  assert_eq!(found.registrant.unique_code, "RC-OWN1-0001");
  assert_eq!(found.item.as_ref().map(|i| i.name.as_str()), Some("Obsidian Mirror"));

  let foreign = resolve_order(stores.orders.as_ref(), stranger.id, "ORD-MIRROR").await;
  assert!(matches!(foreign, Err(CovenantError::NotFound(_))));

  let unknown = resolve_order(stores.orders.as_ref(), owner.id, "ORD-NOPE00").await;
  assert!(matches!(unknown, Err(CovenantError::NotFound(_))));
}
