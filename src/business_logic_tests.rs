#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_phone_validation() {
        use crate::commands::intake::is_valid_phone;

        assert!(is_valid_phone("99112233"));
        assert!(!is_valid_phone("9911223"));
        assert!(!is_valid_phone("991122334"));
        assert!(!is_valid_phone("9911223a"));
        assert!(!is_valid_phone("9911 223"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_pick_value_other_substitution() {
        use crate::commands::intake::{pick_value, resolve_values};

        let options = s(&["A", "Бусад"]);
        let others = s(&["", "X"]);

        assert_eq!(resolve_values(&options, &others, 2), s(&["A", "X"]));

        // Index beyond every sequence resolves to "".
        assert_eq!(pick_value(&options, &others, 5), "");

        // Sentinel with no override resolves to the (empty) override.
        assert_eq!(pick_value(&s(&["Бусад"]), &[], 0), "");
    }

    #[test]
    fn test_resolve_values_length_guarantee() {
        use crate::commands::intake::resolve_values;

        let resolved = resolve_values(&s(&["Дээл"]), &[], 3);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved, s(&["Дээл", "", ""]));
    }

    #[test]
    fn test_join_values_skips_empty() {
        use crate::commands::intake::join_values;

        assert_eq!(join_values(&s(&["Дээл", "", "Малгай"])), "Дээл | Малгай");
        assert_eq!(join_values(&s(&["", ""])), "");
    }

    #[test]
    fn test_paid_normalization() {
        use crate::commands::intake::normalize_paid;

        for input in ["TRUE", "true", "1", "yes", "Тийм", "тийм", "ON", "on"] {
            assert_eq!(normalize_paid(input), "TRUE", "input: {}", input);
        }
        for input in ["", "no", "0", "false", "үгүй"] {
            assert_eq!(normalize_paid(input), "", "input: {}", input);
        }
    }

    #[test]
    fn test_paid_normalization_on_update_path_rejects_on() {
        use crate::commands::orders::normalize_paid_update;

        assert_eq!(normalize_paid_update("тийм"), "TRUE");
        assert_eq!(normalize_paid_update("TRUE"), "TRUE");
        // The update form has never treated the checkbox token as truthy.
        assert_eq!(normalize_paid_update("on"), "");
    }

    #[test]
    fn test_balance_forced_to_zero_when_paid() {
        use crate::commands::intake::resolve_submission;

        let mut form = super::support::empty_form();
        form.balance_payment = "50000".to_string();
        form.paid = "тийм".to_string();

        let resolved = resolve_submission(&form);
        assert_eq!(resolved.paid_value, "TRUE");
        assert_eq!(resolved.balance_final, "0");

        form.paid = "no".to_string();
        let resolved = resolve_submission(&form);
        assert_eq!(resolved.paid_value, "");
        assert_eq!(resolved.balance_final, "50000");
    }

    #[test]
    fn test_payment_attached_to_first_row_only() {
        use crate::commands::intake::{build_rows, resolve_submission};

        let mut form = super::support::empty_form();
        form.types = s(&["Дээл", "Малгай", "Бүс"]);
        form.total_payment = "300000".to_string();
        form.advance_payment = "100000".to_string();
        form.balance_payment = "200000".to_string();
        form.paid = "".to_string();

        let resolved = resolve_submission(&form);
        assert_eq!(resolved.count, 3);

        let rows = build_rows("2024-01-05 10:30", &form, &resolved);
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.len(), 19);
        }

        // First row carries the payment cells.
        assert_eq!(rows[0][13], "300000");
        assert_eq!(rows[0][14], "100000");
        assert_eq!(rows[0][15], "200000");

        // Later rows carry empty payment cells.
        for row in &rows[1..] {
            assert_eq!(row[13], "");
            assert_eq!(row[14], "");
            assert_eq!(row[15], "");
            assert_eq!(row[16], "");
        }
    }

    #[test]
    fn test_row_shape() {
        use crate::commands::intake::{build_rows, resolve_submission};

        let mut form = super::support::empty_form();
        form.phone = "88001122".to_string();
        form.category = "Захиалга".to_string();
        form.types = s(&["Дээл"]);
        form.delivery_date = "2024-02-01".to_string();
        form.delivery_type = "Хүргэлт".to_string();
        form.delivery_address = "УБ, СБД".to_string();
        form.registered_by = "Бадам".to_string();

        let resolved = resolve_submission(&form);
        let rows = build_rows("2024-01-05 10:30", &form, &resolved);
        let row = &rows[0];

        assert_eq!(row[0], "2024-01-05 10:30");
        assert_eq!(row[1], "88001122");
        assert_eq!(row[2], "Захиалга");
        assert_eq!(row[3], "Дээл");
        assert_eq!(row[8], "1"); // quantity defaults to "1"
        // Delivery date is written twice, columns 9 and 10.
        assert_eq!(row[9], "2024-02-01");
        assert_eq!(row[10], "2024-02-01");
        assert_eq!(row[12], ""); // status placeholder
        assert_eq!(row[17], "УБ, СБД");
        assert_eq!(row[18], "Бадам");
    }

    #[test]
    fn test_signature_composition() {
        use crate::commands::intake::{resolve_submission, submission_signature};

        let mut form = super::support::empty_form();
        form.phone = "99112233".to_string();
        form.category = "Захиалга".to_string();
        form.types = s(&["Дээл", "Малгай"]);
        form.paid = "1".to_string();

        let resolved = resolve_submission(&form);
        let sig = submission_signature(&form, &resolved);

        assert!(sig.starts_with("99112233|Захиалга|"));
        assert!(sig.contains("Дээл;Малгай"));
        assert!(sig.ends_with("|0|TRUE"));

        // Same content, same signature.
        let sig2 = submission_signature(&form, &resolve_submission(&form));
        assert_eq!(sig, sig2);

        // Any field change breaks the match.
        form.delivery_type = "Хүргэлт".to_string();
        let sig3 = submission_signature(&form, &resolve_submission(&form));
        assert_ne!(sig, sig3);
    }

    #[test]
    fn test_duplicate_suppression_window() {
        use crate::dedup::DuplicateSuppressor;

        let mut dedup = DuplicateSuppressor::new();
        let t0 = Instant::now();

        assert!(dedup.check_and_record("sig", t0));
        assert!(!dedup.check_and_record("sig", t0 + Duration::from_millis(500)));
        assert!(!dedup.check_and_record("sig", t0 + Duration::from_millis(1999)));
        // A different signature is independent.
        assert!(dedup.check_and_record("other", t0 + Duration::from_millis(500)));
        // After the window the same signature is accepted again.
        assert!(dedup.check_and_record("sig", t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_duplicate_suppressor_capacity_bound() {
        use crate::dedup::DuplicateSuppressor;

        let mut dedup = DuplicateSuppressor::with_capacity(8);
        let t0 = Instant::now();

        for i in 0..100 {
            let accepted =
                dedup.check_and_record(&format!("sig-{}", i), t0 + Duration::from_millis(i));
            assert!(accepted);
            assert!(dedup.len() <= 8);
        }
    }

    #[test]
    fn test_schema_detection_by_width() {
        use crate::schema::SheetSchema;

        assert_eq!(SheetSchema::detect(19), Some(SheetSchema::Newest));
        assert_eq!(SheetSchema::detect(25), Some(SheetSchema::Newest));
        assert_eq!(SheetSchema::detect(18), Some(SheetSchema::Intermediate));
        assert_eq!(SheetSchema::detect(17), Some(SheetSchema::Intermediate));
        assert_eq!(SheetSchema::detect(16), Some(SheetSchema::Legacy));
        assert_eq!(SheetSchema::detect(10), Some(SheetSchema::Legacy));
        assert_eq!(SheetSchema::detect(9), None);
        assert_eq!(SheetSchema::detect(0), None);
    }

    #[test]
    fn test_decode_newest_row() {
        use crate::schema::decode_order_row;

        // Newest layout, 19 columns, registrant trailing.
        let row = s(&[
            "2024-01-05 10:30", // 0 timestamp
            "99112233",         // 1 phone
            "Захиалга",         // 2 category
            "Дээл",             // 3 type
            "XL",               // 4 size
            "Хөх",              // 5 color
            "Үүл",              // 6 pattern
            "Цагаан",           // 7 pattern color
            "2",                // 8 quantity
            "2024-02-01",       // 9 delivery date
            "2024-02-15",       // 10 duration copy, wins
            "Хүргэлт",          // 11 delivery type
            "Бэлэн болсон",     // 12 status
            "300000",           // 13 total
            "100000",           // 14 advance
            "200000",           // 15 balance
            "",                 // 16 paid
            "УБ, СБД",          // 17 address
            "Бадам",            // 18 registrant
        ]);
        assert_eq!(row.len(), 19);

        let record = decode_order_row(2, &row).unwrap();
        assert_eq!(record.row, 2);
        assert_eq!(record.delivery_date, "2024-02-15");
        assert_eq!(record.registered_by, "Бадам");
        assert_eq!(record.quantity, "2");
        assert_eq!(record.delivery_address, "УБ, СБД");
        assert_eq!(record.status, "Бэлэн болсон");
        assert_eq!(record.total_payment, "300000");
    }

    #[test]
    fn test_decode_legacy_row() {
        use crate::schema::decode_order_row;

        // Legacy layout, 16 columns: no quantity, no address, registrant at 9.
        let row = s(&[
            "2023-05-01 09:00", // 0 timestamp
            "88001122",         // 1 phone
            "Захиалга",         // 2 category
            "Малгай",           // 3 type
            "M",                // 4 size
            "Улаан",            // 5 color
            "Энгийн",           // 6 pattern
            "Шар",              // 7 pattern color
            "2023-06-01",       // 8 delivery date
            "Сараа",            // 9 registrant
            "Очиж авна",        // 10 delivery type
            "Авсан",            // 11 status
            "150000",           // 12 total
            "150000",           // 13 advance
            "0",                // 14 balance
            "TRUE",             // 15 paid
        ]);
        assert_eq!(row.len(), 16);

        let record = decode_order_row(5, &row).unwrap();
        assert_eq!(record.delivery_date, "2023-06-01");
        assert_eq!(record.registered_by, "Сараа");
        assert_eq!(record.quantity, "");
        assert_eq!(record.delivery_address, "");
        assert_eq!(record.status, "Авсан");
        assert_eq!(record.paid, "TRUE");
    }

    #[test]
    fn test_decode_rejects_narrow_rows() {
        use crate::schema::decode_order_row;

        let row = s(&["2023-05-01", "88001122", "Захиалга"]);
        assert!(decode_order_row(2, &row).is_none());
    }

    #[test]
    fn test_form_fields_accepts_bracket_spelling() {
        use crate::commands::intake::FormFields;

        let body = b"phone=99112233&type=A&type=B&size%5B%5D=XL";
        let form = FormFields::parse(body);

        assert_eq!(form.value("phone"), "99112233");
        assert_eq!(form.list("type"), s(&["A", "B"]));
        assert_eq!(form.list("size"), s(&["XL"]));
        assert_eq!(form.list("color"), Vec::<String>::new());
    }
}

#[cfg(test)]
pub mod support {
    use crate::commands::intake::RegisterForm;

    pub fn empty_form() -> RegisterForm {
        RegisterForm {
            phone: String::new(),
            category: String::new(),
            types: Vec::new(),
            type_others: Vec::new(),
            sizes: Vec::new(),
            size_others: Vec::new(),
            colors: Vec::new(),
            color_others: Vec::new(),
            patterns: Vec::new(),
            pattern_others: Vec::new(),
            pattern_colors: Vec::new(),
            pattern_color_others: Vec::new(),
            quantities: Vec::new(),
            delivery_date: String::new(),
            registered_by: String::new(),
            delivery_type: String::new(),
            delivery_address: String::new(),
            total_payment: String::new(),
            advance_payment: String::new(),
            balance_payment: String::new(),
            paid: String::new(),
        }
    }
}
