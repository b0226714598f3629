// covenant_server/src/services/templates.rs

//! Themed HTML bodies for outgoing mail. Interpolated values are escaped.

use covenant::models::{Item, Registration};

pub const BRAND: &str = "The Covenant";

const GOLD_PANEL_OPEN: &str = r#"<div style="font-family: serif; background-color: #0a0a0a; color: #d4af37; padding: 40px; border: 1px solid #d4af37; text-align: center;">"#;
const ADMIN_PANEL_OPEN: &str = r#"<div style="font-family: sans-serif; border: 1px solid #d4af37; padding: 20px;">"#;

pub fn escape_html(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for ch in raw.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      other => out.push(other),
    }
  }
  out
}

/// Text bound for a mail header: control characters (CR and LF included)
/// become spaces.
pub fn header_text(raw: &str) -> String {
  raw
    .chars()
    .map(|ch| if ch.is_control() { ' ' } else { ch })
    .collect::<String>()
    .trim()
    .to_string()
}

pub fn format_price(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let abs = cents.unsigned_abs();
  format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

pub struct Rendered {
  pub subject: String,
  pub html: String,
}

pub fn admin_registration_notice(registration: &Registration, dashboard_url: &str) -> Rendered {
  let name = escape_html(&registration.name);
  let id_back = registration
    .id_card_back_url
    .as_deref()
    .map(|url| format!(r#"<p><strong>ID Card (back):</strong> <a href="{}">View Image</a></p>"#, escape_html(url)))
    .unwrap_or_default();
  Rendered {
    subject: format!("NEW REGISTRATION: {}", header_text(&registration.name)),
    html: format!(
      r#"{open}
  <h2 style="color: #d4af37;">New Member Registration: {name}</h2>
  <p><strong>Code:</strong> {code}</p>
  <p><strong>Country:</strong> {country}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Phone:</strong> {phone}</p>
  <p><strong>Payment Method:</strong> {payment}</p>
  <hr />
  <p><strong>Personal Photo:</strong> <a href="{photo}">View Image</a></p>
  <p><strong>ID Card:</strong> <a href="{id_front}">View Image</a></p>
  {id_back}
  <hr />
  <p>View full details in the <a href="{dashboard}">Admin Dashboard</a>.</p>
</div>"#,
      open = ADMIN_PANEL_OPEN,
      name = name,
      code = escape_html(&registration.unique_code),
      country = escape_html(&registration.country),
      email = escape_html(&registration.email),
      phone = escape_html(&registration.phone),
      payment = escape_html(&registration.payment_method),
      photo = escape_html(&registration.personal_photo_url),
      id_front = escape_html(&registration.id_card_front_url),
      id_back = id_back,
      dashboard = escape_html(dashboard_url),
    ),
  }
}

pub fn registrant_welcome(registration: &Registration) -> Rendered {
  Rendered {
    subject: format!("Registration Received - {}", BRAND),
    html: format!(
      r#"{open}
  <h1 style="color: #d4af37;">Welcome to {brand}</h1>
  <div style="text-align: left; max-width: 500px; margin: 0 auto;">
    <p>Dear {name},</p>
    <p>Your registration has been received and added to our records.</p>
    <p>Your registration code is <strong>{code}</strong>. Keep it safe: you will need it to visit the shop and to track your orders.</p>
    <p><strong>Next Steps:</strong></p>
    <ul>
      <li>Verification of your documents.</li>
      <li>Initiation instructions via email.</li>
    </ul>
    <p style="margin-top: 30px;">Light and progress be upon you always.</p>
    <p style="text-align: right;"><em>{brand}</em></p>
  </div>
</div>"#,
      open = GOLD_PANEL_OPEN,
      brand = BRAND,
      name = escape_html(&registration.name),
      code = escape_html(&registration.unique_code),
    ),
  }
}

pub fn admin_order_notice(
  order_number: &str,
  registration: &Registration,
  item: &Item,
  payment_method: &str,
  dashboard_url: &str,
) -> Rendered {
  Rendered {
    subject: format!("NEW ORDER: {}", order_number),
    html: format!(
      r#"{open}
  <h2 style="color: #d4af37;">New Order Received: {number}</h2>
  <p><strong>Member:</strong> {name} ({code})</p>
  <p><strong>Artifact:</strong> {item}</p>
  <p><strong>Price:</strong> {price}</p>
  <p><strong>Payment Method:</strong> {payment}</p>
  <hr />
  <p>Please contact the member to confirm payment and provide instructions.</p>
  <p><a href="{dashboard}">View Order in Dashboard</a></p>
</div>"#,
      open = ADMIN_PANEL_OPEN,
      number = escape_html(order_number),
      name = escape_html(&registration.name),
      code = escape_html(&registration.unique_code),
      item = escape_html(&item.name),
      price = format_price(item.price_cents),
      payment = escape_html(payment_method),
      dashboard = escape_html(dashboard_url),
    ),
  }
}

pub fn order_confirmation(order_number: &str, registration: &Registration, item: &Item) -> Rendered {
  Rendered {
    subject: format!("Order Confirmation - {}", order_number),
    html: format!(
      r#"{open}
  <h1 style="color: #d4af37;">Order Recorded</h1>
  <div style="max-width: 500px; margin: 0 auto 30px; border: 1px dashed #d4af37; padding: 20px;">
    <p style="font-size: 0.8em; text-transform: uppercase;">Order Number</p>
    <p style="font-size: 2em; font-weight: bold;">{number}</p>
  </div>
  <div style="text-align: left; max-width: 500px; margin: 0 auto;">
    <p>Dear {name},</p>
    <p>Your request for the <strong>{item}</strong> ({price}) has been recorded.</p>
    <p><strong>Next Steps:</strong> An administrator will review your order and send the payment details and shipping protocol to your email shortly.</p>
    <p>You can track your order status using your registration code and this order number.</p>
    <p style="margin-top: 30px;">Light and progress be upon you.</p>
    <p style="text-align: right;"><em>{brand}</em></p>
  </div>
</div>"#,
      open = GOLD_PANEL_OPEN,
      number = escape_html(order_number),
      name = escape_html(&registration.name),
      item = escape_html(&item.name),
      price = format_price(item.price_cents),
      brand = BRAND,
    ),
  }
}

/// Free-form message from an administrator to an applicant. Line breaks in
/// `message` are preserved.
pub fn admin_message(applicant_name: &str, message: &str) -> String {
  let body = escape_html(message).replace('\n', "<br />");
  format!(
    r#"<div style="font-family: serif; background-color: #0a0a0a; color: #d4af37; padding: 40px; border: 1px solid #d4af37;">
  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #d4af37; letter-spacing: 5px; text-transform: uppercase;">{brand}</h1>
    <p style="font-size: 12px; letter-spacing: 2px;">Sacred Communication</p>
  </div>
  <div style="background: rgba(212, 175, 55, 0.05); padding: 30px; border-radius: 10px;">
    <p>Dear {name},</p>
    <p style="line-height: 1.6;">{body}</p>
    <div style="margin-top: 40px; border-top: 1px solid rgba(212, 175, 55, 0.2); padding-top: 20px;">
      <p>Light and progress be upon you.</p>
      <p style="font-style: italic;">The Head Master</p>
    </div>
  </div>
</div>"#,
    brand = BRAND,
    name = escape_html(applicant_name),
    body = body,
  )
}

pub fn contact_notice(name: &str, email: &str, subject: &str, message: &str) -> Rendered {
  Rendered {
    subject: format!("Portal Contact: {}", header_text(subject)),
    html: format!(
      r#"<div style="font-family: sans-serif; border: 1px solid #d4af37; padding: 20px; color: #050505;">
  <h2 style="color: #d4af37;">New Contact Message</h2>
  <p><strong>From:</strong> {name} ({email})</p>
  <p><strong>Subject:</strong> {subject}</p>
  <hr />
  <p><strong>Message:</strong></p>
  <p style="white-space: pre-wrap;">{message}</p>
</div>"#,
      name = escape_html(name),
      email = escape_html(email),
      subject = escape_html(subject),
      message = escape_html(message),
    ),
  }
}
