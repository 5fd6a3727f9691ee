//! Positional layout of persisted order rows.
//!
//! Three historical row widths coexist in the sheet. Rows carry no version
//! tag, so the variant is inferred from the column count alone; the predicate
//! lives in [`SheetSchema::detect`] and nowhere else.

use serde::Serialize;

/// Category cell value that marks a row as an order.
pub const ORDER_CATEGORY: &str = "Захиалга";

/// Narrowest row the listing will attempt to decode.
pub const MIN_ROW_WIDTH: usize = 10;

/// Fixed 1-based write columns, valid for [`SheetSchema::Newest`] rows only.
/// The mutation endpoints use these unconditionally while the listing is
/// schema-aware: mutations are assumed to target rows this service appended
/// (always newest width). Deliberately not unified with `FieldOffsets`.
pub const STATUS_COLUMN: u32 = 13;
pub const TOTAL_COLUMN: u32 = 14;
pub const ADVANCE_COLUMN: u32 = 15;
pub const BALANCE_COLUMN: u32 = 16;
pub const PAID_COLUMN: u32 = 17;

/// One historical row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSchema {
    /// No quantity or address columns, registrant right after delivery date.
    Legacy,
    /// Quantity inserted at column 8; address may trail at 17.
    Intermediate,
    /// Quantity + duration column + address, registrant moved to the end.
    Newest,
}

/// 0-based field offsets for one schema variant. `None` means the variant
/// has no such column.
pub struct FieldOffsets {
    pub timestamp: usize,
    pub phone: usize,
    pub category: usize,
    pub kind: usize,
    pub size: usize,
    pub color: usize,
    pub pattern: usize,
    pub pattern_color: usize,
    pub quantity: Option<usize>,
    pub delivery_date: usize,
    /// Historical "order duration" column, a second copy of the delivery
    /// date. Preferred over `delivery_date` when present.
    pub order_duration: Option<usize>,
    pub registered_by: usize,
    pub delivery_type: usize,
    pub status: usize,
    pub total: usize,
    pub advance: usize,
    pub balance: usize,
    pub paid: usize,
    pub delivery_address: Option<usize>,
}

const LEGACY_OFFSETS: FieldOffsets = FieldOffsets {
    timestamp: 0,
    phone: 1,
    category: 2,
    kind: 3,
    size: 4,
    color: 5,
    pattern: 6,
    pattern_color: 7,
    quantity: None,
    delivery_date: 8,
    order_duration: None,
    registered_by: 9,
    delivery_type: 10,
    status: 11,
    total: 12,
    advance: 13,
    balance: 14,
    paid: 15,
    delivery_address: None,
};

const INTERMEDIATE_OFFSETS: FieldOffsets = FieldOffsets {
    timestamp: 0,
    phone: 1,
    category: 2,
    kind: 3,
    size: 4,
    color: 5,
    pattern: 6,
    pattern_color: 7,
    quantity: Some(8),
    delivery_date: 9,
    order_duration: None,
    registered_by: 10,
    delivery_type: 11,
    status: 12,
    total: 13,
    advance: 14,
    balance: 15,
    paid: 16,
    delivery_address: Some(17),
};

const NEWEST_OFFSETS: FieldOffsets = FieldOffsets {
    timestamp: 0,
    phone: 1,
    category: 2,
    kind: 3,
    size: 4,
    color: 5,
    pattern: 6,
    pattern_color: 7,
    quantity: Some(8),
    delivery_date: 9,
    order_duration: Some(10),
    registered_by: 18,
    delivery_type: 11,
    status: 12,
    total: 13,
    advance: 14,
    balance: 15,
    paid: 16,
    delivery_address: Some(17),
};

impl SheetSchema {
    /// Infer the variant from the row width. Returns `None` for rows too
    /// narrow to hold the mandatory fields.
    pub fn detect(width: usize) -> Option<Self> {
        if width >= 19 {
            Some(SheetSchema::Newest)
        } else if width >= 17 {
            Some(SheetSchema::Intermediate)
        } else if width >= MIN_ROW_WIDTH {
            Some(SheetSchema::Legacy)
        } else {
            None
        }
    }

    pub fn offsets(self) -> &'static FieldOffsets {
        match self {
            SheetSchema::Legacy => &LEGACY_OFFSETS,
            SheetSchema::Intermediate => &INTERMEDIATE_OFFSETS,
            SheetSchema::Newest => &NEWEST_OFFSETS,
        }
    }
}

/// Uniform order record served by `GET /orders`, regardless of which schema
/// variant the underlying row follows.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// 1-based sheet row number, the key mutation endpoints address rows by.
    pub row: usize,
    pub timestamp: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub color: String,
    pub pattern: String,
    pub pattern_color: String,
    pub quantity: String,
    pub registered_by: String,
    pub delivery_date: String,
    pub delivery_type: String,
    pub status: String,
    pub total_payment: String,
    pub advance_payment: String,
    pub balance_payment: String,
    pub paid: String,
    pub delivery_address: String,
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

fn opt_cell(row: &[String], index: Option<usize>) -> String {
    index.map(|i| cell(row, i)).unwrap_or_default()
}

/// Decode one stored row into an [`OrderRecord`]. Returns `None` when the
/// row is too narrow for any known schema. Out-of-range reads within a
/// detected schema decode to `""`.
pub fn decode_order_row(row_number: usize, row: &[String]) -> Option<OrderRecord> {
    let schema = SheetSchema::detect(row.len())?;
    let idx = schema.offsets();

    // Newest rows carry the delivery date twice; the duration copy wins.
    let delivery_date = match idx.order_duration {
        Some(i) if row.len() > i => cell(row, i),
        _ => cell(row, idx.delivery_date),
    };

    Some(OrderRecord {
        row: row_number,
        timestamp: cell(row, idx.timestamp),
        phone: cell(row, idx.phone),
        kind: cell(row, idx.kind),
        size: cell(row, idx.size),
        color: cell(row, idx.color),
        pattern: cell(row, idx.pattern),
        pattern_color: cell(row, idx.pattern_color),
        quantity: opt_cell(row, idx.quantity),
        registered_by: cell(row, idx.registered_by),
        delivery_date,
        delivery_type: cell(row, idx.delivery_type),
        status: cell(row, idx.status),
        total_payment: cell(row, idx.total),
        advance_payment: cell(row, idx.advance),
        balance_payment: cell(row, idx.balance),
        paid: cell(row, idx.paid),
        delivery_address: opt_cell(row, idx.delivery_address),
    })
}
