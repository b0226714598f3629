// covenant_server/src/db/pg_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use covenant::models::{
  Item, ItemSummary, NewItem, NewOrder, NewPaymentMethod, NewRegistration, Order, OrderDetails, OrderStatus,
  PaymentMethod, PaymentMethodPatch, RegistrantSummary, Registration, RegistrationStatus,
};
use covenant::{CovenantError, CovenantResult, ItemStore, OrderStore, PaymentMethodStore, RegistrationStore};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{event, info, instrument, warn, Level};
use uuid::Uuid;

use crate::errors::Result as AppResult;

const UNIQUE_VIOLATION: &str = "23505";
const ORDER_NUMBER_CONSTRAINT: &str = "orders_order_number_key";

const REGISTRATION_COLUMNS: &str = "id, name, country, city, date_of_birth, marital_status, occupation, salary, \
   email, phone, payment_method, personal_photo_url, id_card_front_url, id_card_back_url, unique_code, status, \
   created_at";
const ITEM_COLUMNS: &str = "id, name, price_cents, description, mystical_properties, image_url, created_at";
const ORDER_COLUMNS: &str =
  "id, registration_id, item_id, order_number, payment_method, status, total_price_cents, created_at";
const PAYMENT_METHOD_COLUMNS: &str = "id, name, description, details, is_active, created_at";

// Order joined with its registrant and, when still in the catalog, its item.
const ORDER_DETAILS_SELECT: &str = "SELECT o.id, o.registration_id, o.item_id, o.order_number, o.payment_method, \
   o.status, o.total_price_cents, o.created_at, \
   r.name AS registrant_name, r.email AS registrant_email, r.unique_code AS registrant_code, \
   i.name AS item_name, i.price_cents AS item_price_cents, i.description AS item_description, \
   i.image_url AS item_image_url \
   FROM orders o \
   JOIN registrations r ON r.id = o.registration_id \
   LEFT JOIN items i ON i.id = o.item_id";

fn upstream(err: sqlx::Error) -> CovenantError {
  event!(Level::ERROR, error = %err, "Record store query failed.");
  CovenantError::upstream(err)
}

/// A unique violation on the order number is a collision; anything else is
/// the database failing.
fn order_insert_error(err: sqlx::Error, order_number: String) -> CovenantError {
  match err {
    sqlx::Error::Database(db_err)
      if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
        && db_err.constraint() == Some(ORDER_NUMBER_CONSTRAINT) =>
    {
      warn!("Order number already taken.");
      CovenantError::DuplicateIdentifier {
        field: "order_number".to_string(),
        value: order_number,
      }
    }
    other => upstream(other),
  }
}

#[derive(sqlx::FromRow)]
struct OrderDetailsRow {
  id: Uuid,
  registration_id: Uuid,
  item_id: Uuid,
  order_number: String,
  payment_method: String,
  status: OrderStatus,
  total_price_cents: i64,
  created_at: DateTime<Utc>,
  registrant_name: String,
  registrant_email: String,
  registrant_code: String,
  item_name: Option<String>,
  item_price_cents: Option<i64>,
  item_description: Option<String>,
  item_image_url: Option<String>,
}

impl From<OrderDetailsRow> for OrderDetails {
  fn from(row: OrderDetailsRow) -> Self {
    let item = match (row.item_name, row.item_price_cents, row.item_description) {
      (Some(name), Some(price_cents), Some(description)) => Some(ItemSummary {
        id: row.item_id,
        name,
        price_cents,
        description,
        image_url: row.item_image_url,
      }),
      _ => None,
    };
    OrderDetails {
      order: Order {
        id: row.id,
        registration_id: row.registration_id,
        item_id: row.item_id,
        order_number: row.order_number,
        payment_method: row.payment_method,
        status: row.status,
        total_price_cents: row.total_price_cents,
        created_at: row.created_at,
      },
      registrant: RegistrantSummary {
        id: row.registration_id,
        name: row.registrant_name,
        email: row.registrant_email,
        unique_code: row.registrant_code,
      },
      item,
    }
  }
}

/// Record store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  #[instrument(name = "pg_store::connect", skip_all, err(Display))]
  pub async fn connect(database_url: &str) -> AppResult<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    info!("Successfully connected to the database.");
    Ok(Self::new(pool))
  }

  /// Creates the enum types, tables and indexes if they don't exist yet.
  #[instrument(name = "pg_store::apply_schema", skip_all, err(Display))]
  pub async fn apply_schema(&self) -> AppResult<()> {
    sqlx::raw_sql(include_str!("../../schema.sql")).execute(&self.pool).await?;
    info!("Database schema applied.");
    Ok(())
  }
}

#[async_trait]
impl RegistrationStore for PgStore {
  #[instrument(name = "pg_store::create_registration", skip_all, fields(unique_code = %new.unique_code))]
  async fn create(&self, new: NewRegistration) -> CovenantResult<Registration> {
    let sql = format!(
      "INSERT INTO registrations (id, name, country, city, date_of_birth, marital_status, occupation, salary, \
       email, phone, payment_method, personal_photo_url, id_card_front_url, id_card_back_url, unique_code) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) RETURNING {}",
      REGISTRATION_COLUMNS
    );
    sqlx::query_as::<_, Registration>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(&new.country)
      .bind(&new.city)
      .bind(&new.date_of_birth)
      .bind(&new.marital_status)
      .bind(&new.occupation)
      .bind(&new.salary)
      .bind(&new.email)
      .bind(&new.phone)
      .bind(&new.payment_method)
      .bind(&new.personal_photo_url)
      .bind(&new.id_card_front_url)
      .bind(&new.id_card_back_url)
      .bind(&new.unique_code)
      .fetch_one(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Registration>> {
    let sql = format!("SELECT {} FROM registrations WHERE id = $1", REGISTRATION_COLUMNS);
    sqlx::query_as::<_, Registration>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn find_by_code(&self, unique_code: &str) -> CovenantResult<Option<Registration>> {
    // Codes may collide; the earliest registration wins, matching the in-memory store.
    let sql = format!(
      "SELECT {} FROM registrations WHERE unique_code = $1 ORDER BY created_at ASC LIMIT 1",
      REGISTRATION_COLUMNS
    );
    sqlx::query_as::<_, Registration>(&sql)
      .bind(unique_code)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn list(&self) -> CovenantResult<Vec<Registration>> {
    let sql = format!("SELECT {} FROM registrations ORDER BY created_at DESC", REGISTRATION_COLUMNS);
    sqlx::query_as::<_, Registration>(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn update_status(&self, id: Uuid, status: RegistrationStatus) -> CovenantResult<Option<Registration>> {
    let sql = format!(
      "UPDATE registrations SET status = $2 WHERE id = $1 RETURNING {}",
      REGISTRATION_COLUMNS
    );
    sqlx::query_as::<_, Registration>(&sql)
      .bind(id)
      .bind(status)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }
}

#[async_trait]
impl ItemStore for PgStore {
  async fn create(&self, new: NewItem) -> CovenantResult<Item> {
    let sql = format!(
      "INSERT INTO items (id, name, price_cents, description, mystical_properties, image_url) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
      ITEM_COLUMNS
    );
    sqlx::query_as::<_, Item>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(new.price_cents)
      .bind(&new.description)
      .bind(&new.mystical_properties)
      .bind(&new.image_url)
      .fetch_one(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn find_by_id(&self, id: Uuid) -> CovenantResult<Option<Item>> {
    let sql = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
    sqlx::query_as::<_, Item>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn list(&self) -> CovenantResult<Vec<Item>> {
    let sql = format!("SELECT {} FROM items ORDER BY created_at DESC", ITEM_COLUMNS);
    sqlx::query_as::<_, Item>(&sql).fetch_all(&self.pool).await.map_err(upstream)
  }

  async fn delete(&self, id: Uuid) -> CovenantResult<bool> {
    let result = sqlx::query("DELETE FROM items WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(upstream)?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl OrderStore for PgStore {
  #[instrument(name = "pg_store::create_order", skip_all, fields(order_number = %new.order_number))]
  async fn create(&self, new: NewOrder) -> CovenantResult<Order> {
    let sql = format!(
      "INSERT INTO orders (id, registration_id, item_id, order_number, payment_method, total_price_cents) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
      ORDER_COLUMNS
    );
    let result = sqlx::query_as::<_, Order>(&sql)
      .bind(Uuid::new_v4())
      .bind(new.registration_id)
      .bind(new.item_id)
      .bind(&new.order_number)
      .bind(&new.payment_method)
      .bind(new.total_price_cents)
      .fetch_one(&self.pool)
      .await;

    result.map_err(|err| order_insert_error(err, new.order_number))
  }

  async fn find_for_registrant(
    &self,
    registration_id: Uuid,
    order_number: &str,
  ) -> CovenantResult<Option<OrderDetails>> {
    let sql = format!(
      "{} WHERE o.order_number = $1 AND o.registration_id = $2",
      ORDER_DETAILS_SELECT
    );
    let row = sqlx::query_as::<_, OrderDetailsRow>(&sql)
      .bind(order_number)
      .bind(registration_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)?;
    Ok(row.map(OrderDetails::from))
  }

  async fn list_details(&self) -> CovenantResult<Vec<OrderDetails>> {
    let sql = format!("{} ORDER BY o.created_at DESC", ORDER_DETAILS_SELECT);
    let rows = sqlx::query_as::<_, OrderDetailsRow>(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(upstream)?;
    Ok(rows.into_iter().map(OrderDetails::from).collect())
  }

  async fn update_status(&self, id: Uuid, status: OrderStatus) -> CovenantResult<Option<Order>> {
    let sql = format!("UPDATE orders SET status = $2 WHERE id = $1 RETURNING {}", ORDER_COLUMNS);
    sqlx::query_as::<_, Order>(&sql)
      .bind(id)
      .bind(status)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }
}

#[async_trait]
impl PaymentMethodStore for PgStore {
  async fn create(&self, new: NewPaymentMethod) -> CovenantResult<PaymentMethod> {
    let sql = format!(
      "INSERT INTO payment_methods (id, name, description, details, is_active) \
       VALUES ($1, $2, $3, $4, $5) RETURNING {}",
      PAYMENT_METHOD_COLUMNS
    );
    sqlx::query_as::<_, PaymentMethod>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new.name)
      .bind(&new.description)
      .bind(&new.details)
      .bind(new.is_active)
      .fetch_one(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn list_active(&self) -> CovenantResult<Vec<PaymentMethod>> {
    let sql = format!(
      "SELECT {} FROM payment_methods WHERE is_active ORDER BY created_at ASC",
      PAYMENT_METHOD_COLUMNS
    );
    sqlx::query_as::<_, PaymentMethod>(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn list_all(&self) -> CovenantResult<Vec<PaymentMethod>> {
    let sql = format!("SELECT {} FROM payment_methods ORDER BY created_at ASC", PAYMENT_METHOD_COLUMNS);
    sqlx::query_as::<_, PaymentMethod>(&sql)
      .fetch_all(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn update(&self, id: Uuid, patch: PaymentMethodPatch) -> CovenantResult<Option<PaymentMethod>> {
    // COALESCE keeps stored values for fields the patch leaves out; the
    // optional texts carry a flag so that an explicit null clears them.
    let sql = format!(
      "UPDATE payment_methods SET name = COALESCE($2, name), \
       description = CASE WHEN $3 THEN $4 ELSE description END, \
       details = CASE WHEN $5 THEN $6 ELSE details END, \
       is_active = COALESCE($7, is_active) WHERE id = $1 RETURNING {}",
      PAYMENT_METHOD_COLUMNS
    );
    sqlx::query_as::<_, PaymentMethod>(&sql)
      .bind(id)
      .bind(patch.name)
      .bind(patch.description.is_some())
      .bind(patch.description.flatten())
      .bind(patch.details.is_some())
      .bind(patch.details.flatten())
      .bind(patch.is_active)
      .fetch_optional(&self.pool)
      .await
      .map_err(upstream)
  }

  async fn delete(&self, id: Uuid) -> CovenantResult<bool> {
    let result = sqlx::query("DELETE FROM payment_methods WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(upstream)?;
    Ok(result.rows_affected() > 0)
  }
}
