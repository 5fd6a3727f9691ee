use std::collections::HashMap;
use std::time::Instant;

use axum::extract::{RawForm, State};
use axum::Json;
use chrono::Local;
use serde_json::{json, Value};
use url::form_urlencoded;

use crate::error::{AtelierError, AtelierResult};
use crate::mailer::OrderNotification;
use crate::schema::ORDER_CATEGORY;
use crate::state::AppState;

/// Option value meaning "the real value is in the parallel *Other field".
pub const OTHER_SENTINEL: &str = "Бусад";

/// Decoded multi-valued form body. HTML forms repeat keys for list fields;
/// some frontends send `type`, others `type[]`, so both spellings are read.
pub struct FormFields {
    fields: HashMap<String, Vec<String>>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        let mut fields = HashMap::<String, Vec<String>>::new();
        for (key, value) in form_urlencoded::parse(body) {
            fields
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
        Self { fields }
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        if let Some(values) = self.fields.get(key) {
            if !values.is_empty() {
                return values.clone();
            }
        }
        self.fields
            .get(&format!("{}[]", key))
            .cloned()
            .unwrap_or_default()
    }

    pub fn value(&self, key: &str) -> String {
        self.fields
            .get(key)
            .and_then(|v| v.first())
            .cloned()
            .unwrap_or_default()
    }
}

/// One order submission, as parsed off the wire.
pub struct RegisterForm {
    pub phone: String,
    pub category: String,
    pub types: Vec<String>,
    pub type_others: Vec<String>,
    pub sizes: Vec<String>,
    pub size_others: Vec<String>,
    pub colors: Vec<String>,
    pub color_others: Vec<String>,
    pub patterns: Vec<String>,
    pub pattern_others: Vec<String>,
    pub pattern_colors: Vec<String>,
    pub pattern_color_others: Vec<String>,
    pub quantities: Vec<String>,
    pub delivery_date: String,
    pub registered_by: String,
    pub delivery_type: String,
    pub delivery_address: String,
    pub total_payment: String,
    pub advance_payment: String,
    pub balance_payment: String,
    pub paid: String,
}

impl RegisterForm {
    pub fn from_fields(form: &FormFields) -> Self {
        Self {
            phone: form.value("phone"),
            category: form.value("category"),
            types: form.list("type"),
            type_others: form.list("typeOther"),
            sizes: form.list("size"),
            size_others: form.list("sizeOther"),
            colors: form.list("color"),
            color_others: form.list("colorOther"),
            patterns: form.list("pattern"),
            pattern_others: form.list("patternOther"),
            pattern_colors: form.list("patternColor"),
            pattern_color_others: form.list("patternColorOther"),
            quantities: form.list("quantity"),
            delivery_date: form.value("deliveryDate"),
            registered_by: form.value("registeredBy"),
            delivery_type: form.value("deliveryType"),
            delivery_address: form.value("deliveryAddress"),
            total_payment: form.value("totalPayment"),
            advance_payment: form.value("advancePayment"),
            balance_payment: form.value("balancePayment"),
            paid: form.value("paid"),
        }
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 8 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Effective value of one attribute at index `i`: the "other" override when
/// the selected option is the sentinel, else the option. Out-of-range reads
/// yield "".
pub fn pick_value(options: &[String], others: &[String], i: usize) -> String {
    let option = options.get(i).map(String::as_str).unwrap_or("");
    let other = others.get(i).map(String::as_str).unwrap_or("");
    if option == OTHER_SENTINEL {
        other.to_string()
    } else {
        option.to_string()
    }
}

/// Exactly `count` resolved values for one attribute.
pub fn resolve_values(options: &[String], others: &[String], count: usize) -> Vec<String> {
    (0..count).map(|i| pick_value(options, others, i)).collect()
}

pub fn join_values(values: &[String]) -> String {
    values
        .iter()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn normalize_paid(paid: &str) -> String {
    match paid.to_lowercase().as_str() {
        "true" | "1" | "yes" | "тийм" | "on" => "TRUE".to_string(),
        _ => String::new(),
    }
}

/// Resolved line items plus the order-level fields derived from them.
pub struct ResolvedSubmission {
    pub count: usize,
    pub types: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub patterns: Vec<String>,
    pub pattern_colors: Vec<String>,
    pub quantities: Vec<String>,
    pub paid_value: String,
    pub balance_final: String,
}

pub fn resolve_submission(form: &RegisterForm) -> ResolvedSubmission {
    let count = [
        form.types.len(),
        form.sizes.len(),
        form.colors.len(),
        form.patterns.len(),
        form.pattern_colors.len(),
        form.quantities.len(),
        1,
    ]
    .into_iter()
    .max()
    .unwrap_or(1);

    let paid_value = normalize_paid(&form.paid);
    let balance_final = if paid_value.is_empty() {
        form.balance_payment.clone()
    } else {
        // A settled order has nothing outstanding.
        "0".to_string()
    };

    ResolvedSubmission {
        count,
        types: resolve_values(&form.types, &form.type_others, count),
        sizes: resolve_values(&form.sizes, &form.size_others, count),
        colors: resolve_values(&form.colors, &form.color_others, count),
        patterns: resolve_values(&form.patterns, &form.pattern_others, count),
        pattern_colors: resolve_values(&form.pattern_colors, &form.pattern_color_others, count),
        quantities: (0..count)
            .map(|i| {
                form.quantities
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| "1".to_string())
            })
            .collect(),
        paid_value,
        balance_final,
    }
}

/// Exact-match fingerprint of a submission, used by the duplicate suppressor.
pub fn submission_signature(form: &RegisterForm, resolved: &ResolvedSubmission) -> String {
    [
        form.phone.as_str(),
        form.category.as_str(),
        form.delivery_date.as_str(),
        form.registered_by.as_str(),
        form.delivery_type.as_str(),
        form.delivery_address.as_str(),
        &resolved.types.join(";"),
        &resolved.sizes.join(";"),
        &resolved.colors.join(";"),
        &resolved.patterns.join(";"),
        &resolved.pattern_colors.join(";"),
        form.total_payment.as_str(),
        form.advance_payment.as_str(),
        resolved.balance_final.as_str(),
        resolved.paid_value.as_str(),
    ]
    .join("|")
}

/// One sheet row per line item. The delivery date is written twice (the
/// second copy is the historical "order duration" column) and the payment
/// cells go on the first row only: payment is per-order, not per-line-item.
pub fn build_rows(
    timestamp: &str,
    form: &RegisterForm,
    resolved: &ResolvedSubmission,
) -> Vec<Vec<String>> {
    (0..resolved.count)
        .map(|i| {
            let is_first = i == 0;
            let first_or_empty = |v: &str| {
                if is_first {
                    v.to_string()
                } else {
                    String::new()
                }
            };
            vec![
                timestamp.to_string(),
                form.phone.clone(),
                form.category.clone(),
                resolved.types[i].clone(),
                resolved.sizes[i].clone(),
                resolved.colors[i].clone(),
                resolved.patterns[i].clone(),
                resolved.pattern_colors[i].clone(),
                resolved.quantities[i].clone(),
                form.delivery_date.clone(),
                form.delivery_date.clone(),
                form.delivery_type.clone(),
                String::new(), // status, set later through the mutation endpoint
                first_or_empty(&form.total_payment),
                first_or_empty(&form.advance_payment),
                first_or_empty(&resolved.balance_final),
                first_or_empty(&resolved.paid_value),
                form.delivery_address.clone(),
                form.registered_by.clone(),
            ]
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Success,
    Ignored,
}

pub async fn register(
    State(state): State<AppState>,
    RawForm(body): RawForm,
) -> AtelierResult<Json<Value>> {
    let form = RegisterForm::from_fields(&FormFields::parse(&body));
    let outcome = register_internal(&state, &form, Instant::now()).await?;
    let status = match outcome {
        RegisterOutcome::Success => "success",
        RegisterOutcome::Ignored => "ignored",
    };
    Ok(Json(json!({ "status": status })))
}

pub async fn register_internal(
    state: &AppState,
    form: &RegisterForm,
    now: Instant,
) -> AtelierResult<RegisterOutcome> {
    if !is_valid_phone(&form.phone) {
        return Err(AtelierError::Validation(
            "Утас 8 оронтой байх ёстой".to_string(),
        ));
    }

    let resolved = resolve_submission(form);
    let signature = submission_signature(form, &resolved);

    {
        let mut dedup = state
            .dedup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !dedup.check_and_record(&signature, now) {
            tracing::info!("Duplicate submission suppressed for phone {}", form.phone);
            return Ok(RegisterOutcome::Ignored);
        }
    }

    let store = state.store()?;

    // Row-by-row, no transaction: a failure mid-sequence leaves the earlier
    // rows in place and the whole request reports failure.
    let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
    for row in build_rows(&timestamp, form, &resolved) {
        store.append_row(row).await?;
    }

    if form.category == ORDER_CATEGORY {
        notify_new_order(state, form, &resolved).await;
    }

    Ok(RegisterOutcome::Success)
}

/// Fire the notification email; a failure here never fails the request.
async fn notify_new_order(state: &AppState, form: &RegisterForm, resolved: &ResolvedSubmission) {
    let Some(mailer) = state.mailer.as_ref() else {
        tracing::warn!("Email not sent: mailer not configured");
        return;
    };

    let notification = OrderNotification {
        phone: form.phone.clone(),
        kind: join_values(&resolved.types),
        size: join_values(&resolved.sizes),
        color: join_values(&resolved.colors),
        pattern: join_values(&resolved.patterns),
        pattern_color: join_values(&resolved.pattern_colors),
        delivery_date: form.delivery_date.clone(),
        delivery_type: form.delivery_type.clone(),
        delivery_address: form.delivery_address.clone(),
        registered_by: form.registered_by.clone(),
    };

    if let Err(e) = mailer.send_order_email(&notification).await {
        tracing::warn!("Failed to send order email: {}", e);
    }
}
