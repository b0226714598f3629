// tests/memory_store_tests.rs
mod common;

use common::*;
use covenant::models::{NewPaymentMethod, OrderStatus, PaymentMethodPatch, RegistrationStatus};
use covenant::{CovenantError, Stores};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_colliding_order_number_is_rejected_and_first_order_kept() {
  setup_tracing();
  let stores = Stores::in_memory();
  let buyer = stores
    .registrations
    .create(new_registration("Buyer", "RC-BUY0-0001"))
    .await
    .unwrap();
  let candle = stores.items.create(new_item("Ember Candle", 900)).await.unwrap();
  let amulet = stores.items.create(new_item("Silver Amulet", 4_200)).await.unwrap();

  let first = stores
    .orders
    .create(new_order(buyer.id, candle.id, "ORD-SAME00", candle.price_cents))
    .await
    .unwrap();
  let second = stores
    .orders
    .create(new_order(buyer.id, amulet.id, "ORD-SAME00", amulet.price_cents))
    .await;

  match second {
    Err(CovenantError::DuplicateIdentifier { field, value }) => {
      assert_eq!(field, "order_number");
      assert_eq!(value, "ORD-SAME00");
    }
    other => panic!("expected DuplicateIdentifier, got {:?}", other),
  }

  let orders = stores.orders.list_details().await.unwrap();
  assert_eq!(orders.len(), 1);
  assert_eq!(orders[0].order.id, first.id);
  assert_eq!(orders[0].order.item_id, candle.id);
  assert_eq!(orders[0].order.total_price_cents, 900);
}

#[tokio::test]
#[serial]
async fn test_registration_codes_are_not_forced_unique() {
  setup_tracing();
  let stores = Stores::in_memory();
  stores.registrations.create(new_registration("One", "RC-DUPE-0000")).await.unwrap();
  let again = stores.registrations.create(new_registration("Two", "RC-DUPE-0000")).await;
  assert!(again.is_ok());
}

#[tokio::test]
#[serial]
async fn test_listings_are_newest_first_and_statuses_update() {
  setup_tracing();
  let stores = Stores::in_memory();
  let older = stores.registrations.create(new_registration("Older", "RC-OLD0-0001")).await.unwrap();
  let newer = stores.registrations.create(new_registration("Newer", "RC-NEW0-0002")).await.unwrap();
  assert_eq!(older.status, RegistrationStatus::Pending);

  let listed = stores.registrations.list().await.unwrap();
  assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![newer.id, older.id]);

  let approved = stores
    .registrations
    .update_status(older.id, RegistrationStatus::Approved)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(approved.status, RegistrationStatus::Approved);

  let item = stores.items.create(new_item("Rune Stone", 300)).await.unwrap();
  let order = stores
    .orders
    .create(new_order(newer.id, item.id, "ORD-RUNE01", 300))
    .await
    .unwrap();
  assert_eq!(order.status, OrderStatus::Pending);
  let shipped = stores.orders.update_status(order.id, OrderStatus::Shipped).await.unwrap().unwrap();
  assert_eq!(shipped.status, OrderStatus::Shipped);

  assert!(stores
    .orders
    .update_status(uuid::Uuid::new_v4(), OrderStatus::Cancelled)
    .await
    .unwrap()
    .is_none());
}

#[tokio::test]
#[serial]
async fn test_order_details_survive_item_removal() {
  setup_tracing();
  let stores = Stores::in_memory();
  let buyer = stores.registrations.create(new_registration("Buyer", "RC-BUY0-0003")).await.unwrap();
  let item = stores.items.create(new_item("Vanishing Orb", 7_700)).await.unwrap();
  stores
    .orders
    .create(new_order(buyer.id, item.id, "ORD-ORB001", item.price_cents))
    .await
    .unwrap();

  assert!(stores.items.delete(item.id).await.unwrap());
  assert!(!stores.items.delete(item.id).await.unwrap());

  let details = stores.orders.find_for_registrant(buyer.id, "ORD-ORB001").await.unwrap().unwrap();
  assert!(details.item.is_none());
  assert_eq!(details.order.total_price_cents, 7_700);
  assert_eq!(details.registrant.name, "Buyer");
}

#[tokio::test]
#[serial]
async fn test_payment_methods_filter_patch_and_delete() {
  setup_tracing();
  let stores = Stores::in_memory();
  let bank = stores
    .payment_methods
    .create(NewPaymentMethod {
      name: "Bank transfer".to_string(),
      description: Some("SEPA".to_string()),
      details: Some("IBAN PT50 0000".to_string()),
      is_active: true,
    })
    .await
    .unwrap();
  let crypto = stores
    .payment_methods
    .create(NewPaymentMethod {
      name: "Bitcoin".to_string(),
      description: None,
      details: Some("bc1q...".to_string()),
      is_active: true,
    })
    .await
    .unwrap();

  let patched = stores
    .payment_methods
    .update(
      crypto.id,
      PaymentMethodPatch {
        is_active: Some(false),
        ..Default::default()
      },
    )
    .await
    .unwrap()
    .unwrap();
  assert!(!patched.is_active);
  assert_eq!(patched.details.as_deref(), Some("bc1q..."));

  let cleared = stores
    .payment_methods
    .update(
      crypto.id,
      PaymentMethodPatch {
        details: Some(None),
        ..Default::default()
      },
    )
    .await
    .unwrap()
    .unwrap();
  assert_eq!(cleared.details, None);
  assert_eq!(cleared.name, "Bitcoin");

  let active = stores.payment_methods.list_active().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].id, bank.id);
  assert_eq!(stores.payment_methods.list_all().await.unwrap().len(), 2);

  assert!(stores.payment_methods.delete(bank.id).await.unwrap());
  assert!(stores.payment_methods.list_active().await.unwrap().is_empty());
}
