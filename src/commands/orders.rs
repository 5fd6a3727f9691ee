use axum::extract::{Path, State};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AtelierError, AtelierResult};
use crate::schema::{
    decode_order_row, OrderRecord, ADVANCE_COLUMN, BALANCE_COLUMN, ORDER_CATEGORY, PAID_COLUMN,
    STATUS_COLUMN, TOTAL_COLUMN,
};
use crate::sheets::SheetStore;
use crate::state::AppState;

pub const VALID_STATUSES: [&str; 3] = ["Хийгдэж байгаа", "Бэлэн болсон", "Авсан"];

pub async fn get_orders(State(state): State<AppState>) -> AtelierResult<Json<Value>> {
    let orders = get_orders_internal(state.store()?).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// All order-category rows, decoded through whichever schema variant each
/// row's width selects. Row numbers start at 2: row 1 is the header.
pub async fn get_orders_internal(store: &dyn SheetStore) -> AtelierResult<Vec<OrderRecord>> {
    let all_values = store.get_all_values().await?;

    let mut orders = Vec::new();
    for (row_number, row) in all_values.iter().enumerate().skip(1) {
        let category = row.get(2).map(String::as_str).unwrap_or("");
        if category != ORDER_CATEGORY {
            continue;
        }
        if let Some(record) = decode_order_row(row_number + 1, row) {
            orders.push(record);
        }
    }
    Ok(orders)
}

#[derive(Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(row): Path<u32>,
    Form(form): Form<StatusForm>,
) -> AtelierResult<Json<Value>> {
    update_status_internal(state.store()?, row, &form.status).await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Row {} updated with status: {}", row, form.status),
    })))
}

pub async fn update_status_internal(
    store: &dyn SheetStore,
    row: u32,
    status: &str,
) -> AtelierResult<()> {
    if !VALID_STATUSES.contains(&status) {
        return Err(AtelierError::Validation("Invalid status".to_string()));
    }
    store.update_cell(row, STATUS_COLUMN, status).await
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct PaymentForm {
    pub total: String,
    pub advance: String,
    pub balance: String,
    pub paid: String,
}

pub async fn update_payment(
    State(state): State<AppState>,
    Path(row): Path<u32>,
    Form(form): Form<PaymentForm>,
) -> AtelierResult<Json<Value>> {
    update_payment_internal(state.store()?, row, &form).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// Overwrites the four newest-schema payment cells unconditionally, one cell
/// per call; there is no transaction across them.
pub async fn update_payment_internal(
    store: &dyn SheetStore,
    row: u32,
    form: &PaymentForm,
) -> AtelierResult<()> {
    let paid_value = normalize_paid_update(&form.paid);

    store.update_cell(row, TOTAL_COLUMN, &form.total).await?;
    store.update_cell(row, ADVANCE_COLUMN, &form.advance).await?;
    store.update_cell(row, BALANCE_COLUMN, &form.balance).await?;
    store.update_cell(row, PAID_COLUMN, &paid_value).await?;
    Ok(())
}

// Unlike the intake path this list has never accepted "on"; the update form
// sends explicit values, not a checkbox.
pub fn normalize_paid_update(paid: &str) -> String {
    match paid.to_lowercase().as_str() {
        "true" | "1" | "yes" | "тийм" => "TRUE".to_string(),
        _ => String::new(),
    }
}
