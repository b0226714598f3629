// covenant_server/src/pipelines/registration_pipeline.rs

use crate::errors::{AppError, Result as AppResult};
use crate::pipelines::common_steps;
use crate::pipelines::contexts::{RegistrationCtxData, RegistrationSubmission};
use crate::services::templates;
use covenant::models::NewRegistration;
use covenant::{ContextData, StepControl, Workflow, WorkflowRegistry};
use tracing::{event, info, instrument, warn, Level};

pub const STEPS: &[(&str, bool)] = &[
  ("validate_registration", false),
  ("issue_registration_code", false),
  ("create_registration", false),
  ("notify_admin_of_registration", true),
  ("welcome_registrant", true),
];

pub fn register_registration_pipeline(registry: &WorkflowRegistry<AppError>) {
  let mut workflow = Workflow::<RegistrationCtxData, AppError>::new("registration", STEPS);
  workflow.on("validate_registration", validate_registration);
  workflow.on("issue_registration_code", issue_registration_code);
  workflow.on("create_registration", create_registration);
  workflow.on("notify_admin_of_registration", notify_admin_of_registration);
  workflow.on("welcome_registrant", welcome_registrant);

  registry.register(workflow);
  tracing::info!("Registration pipeline registered.");
}

fn is_plausible_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
    None => false,
  }
}

/// Returns the first problem with a submission, if any.
pub fn check_submission(form: &RegistrationSubmission) -> Option<&'static str> {
  let blank = |value: &str| value.trim().is_empty();

  if form.name.trim().chars().count() < 2 {
    return Some("Name must be at least 2 characters.");
  }
  let required = [
    (&form.country, "Country is required."),
    (&form.city, "City is required."),
    (&form.date_of_birth, "Date of birth is required."),
    (&form.marital_status, "Marital status is required."),
    (&form.occupation, "Occupation is required."),
    (&form.salary, "Salary is required."),
  ];
  if let Some((_, msg)) = required.iter().find(|(value, _)| blank(value.as_str())) {
    return Some(*msg);
  }
  if !is_plausible_email(form.email.trim()) {
    return Some("A valid email address is required.");
  }
  if form.phone.trim().chars().count() < 5 {
    return Some("Phone number must be at least 5 characters.");
  }
  if blank(&form.payment_method) {
    return Some("Payment method is required.");
  }
  if blank(&form.personal_photo_url) {
    return Some("Personal photo is required.");
  }
  if blank(&form.id_card_front_url) {
    return Some("ID card (front) is required.");
  }
  None
}

#[instrument(name = "registration_step::validate", skip_all, err(Display))]
async fn validate_registration(ctx_data: ContextData<RegistrationCtxData>) -> AppResult<StepControl> {
  let problem = {
    let guard = ctx_data.read();
    check_submission(&guard.submission)
  };
  if let Some(msg) = problem {
    warn!(reason = msg, "Registration rejected by validation.");
    return Err(AppError::validation(msg));
  }
  Ok(StepControl::Continue)
}

#[instrument(name = "registration_step::issue_code", skip_all)]
async fn issue_registration_code(ctx_data: ContextData<RegistrationCtxData>) -> AppResult<StepControl> {
  let mut guard = ctx_data.write();
  let code = guard.app_state.identifiers.registration_code();
  event!(Level::DEBUG, unique_code = %code, "Registration code issued.");
  guard.unique_code = Some(code);
  Ok(StepControl::Continue)
}

#[instrument(name = "registration_step::create", skip_all, err(Display))]
async fn create_registration(ctx_data: ContextData<RegistrationCtxData>) -> AppResult<StepControl> {
  let (stores, form, unique_code) = {
    let guard = ctx_data.read();
    let code = guard
      .unique_code
      .clone()
      .ok_or_else(|| AppError::Internal("Registration code was not issued before create.".to_string()))?;
    (guard.app_state.stores.clone(), guard.submission.clone(), code)
  };

  let new = NewRegistration {
    name: form.name.trim().to_string(),
    country: form.country.trim().to_string(),
    city: form.city.trim().to_string(),
    date_of_birth: form.date_of_birth.trim().to_string(),
    marital_status: form.marital_status.trim().to_string(),
    occupation: form.occupation.trim().to_string(),
    salary: form.salary.trim().to_string(),
    email: form.email.trim().to_string(),
    phone: form.phone.trim().to_string(),
    payment_method: form.payment_method.trim().to_string(),
    personal_photo_url: form.personal_photo_url,
    id_card_front_url: form.id_card_front_url,
    id_card_back_url: form.id_card_back_url.filter(|url| !url.trim().is_empty()),
    unique_code,
  };

  let registration = stores.registrations.create(new).await?;
  info!(registration_id = %registration.id, "Registration recorded.");
  ctx_data.write().registration = Some(registration);
  Ok(StepControl::Continue)
}

#[instrument(name = "registration_step::notify_admin", skip_all, err(Display))]
async fn notify_admin_of_registration(ctx_data: ContextData<RegistrationCtxData>) -> AppResult<StepControl> {
  let (app_state, registration) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.registration.clone())
  };
  let Some(registration) = registration else {
    return Ok(StepControl::Continue);
  };

  let rendered = templates::admin_registration_notice(&registration, &app_state.config.admin_dashboard_url());
  common_steps::send_notification(app_state.mailer.as_ref(), &app_state.config.admin_email, rendered).await?;
  ctx_data.write().admin_notified = true;
  Ok(StepControl::Continue)
}

#[instrument(name = "registration_step::welcome", skip_all, err(Display))]
async fn welcome_registrant(ctx_data: ContextData<RegistrationCtxData>) -> AppResult<StepControl> {
  let (app_state, registration) = {
    let guard = ctx_data.read();
    (guard.app_state.clone(), guard.registration.clone())
  };
  let Some(registration) = registration else {
    return Ok(StepControl::Continue);
  };

  let rendered = templates::registrant_welcome(&registration);
  common_steps::send_notification(app_state.mailer.as_ref(), &registration.email, rendered).await?;
  ctx_data.write().welcome_sent = true;
  Ok(StepControl::Continue)
}
