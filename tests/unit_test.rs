// Unit tests for booktable
// These tests work with the public API of each module

#[cfg(test)]
mod model_tests {
    use booktable::model::{FieldValue, PageCursor, Pagination, TableListData};

    #[test]
    fn list_payload_with_partial_pagination() {
        let body = r#"{
            "list": [{
                "key": 7,
                "ISBN": "9787506365437",
                "createdAt": "2021-06-01",
                "author": {"label": "Author", "value": "Yu Hua"},
                "translatoer": {"label": "Translator", "value": ""},
                "price": {"label": "Price", "value": "35.5"},
                "pages": {"label": "Pages", "value": 191},
                "book": {"name": "To Live", "desc": "novel", "score": 9.4}
            }],
            "pagination": {"total": 31}
        }"#;
        let data: TableListData = serde_json::from_str(body).expect("parse list");
        assert_eq!(data.list.len(), 1);
        let rec = &data.list[0];
        assert_eq!(rec.key, 7);
        assert_eq!(rec.isbn, "9787506365437");
        assert_eq!(rec.price_value(), 35.5);
        assert_eq!(rec.score(), 9.4);
        assert_eq!(
            rec.pages.as_ref().map(|p| p.value.clone()),
            Some(FieldValue::Number(191.0))
        );
        let values = rec.form_values();
        assert_eq!(values.name.as_deref(), Some("To Live"));
        assert_eq!(values.desc.as_deref(), Some("novel"));
        assert_eq!(values.key, Some(7));

        let mut cursor = PageCursor::new(10);
        cursor.absorb(&data.pagination);
        assert_eq!(cursor.total, 31);
        assert_eq!(cursor.current, 1);
        assert_eq!(cursor.page_count(), 4);
    }

    #[test]
    fn null_display_value_keeps_the_list() {
        let body = r#"{
            "list": [
                {"key": 1, "translatoer": {"label": "Translator", "value": null}},
                {"key": 2, "price": {"label": "Price", "value": "12"}}
            ]
        }"#;
        let data: TableListData = serde_json::from_str(body).expect("parse list");
        assert_eq!(data.list.len(), 2);
        let translator = data.list[0].translator.as_ref().expect("translator");
        assert_eq!(translator.value, FieldValue::default());
        assert_eq!(data.list[1].price_value(), 12.0);
    }

    #[test]
    fn pagination_normalized_clamps() {
        let p = Pagination { total: Some(-3), page_size: Some(0), current: None }.normalized();
        assert_eq!(p, Pagination { total: Some(0), page_size: Some(1), current: None });
    }

    #[test]
    fn null_list_and_pagination_default() {
        let data: TableListData =
            serde_json::from_str(r#"{"list": null, "pagination": null}"#).expect("parse");
        assert!(data.list.is_empty());
        assert_eq!(data.pagination, Pagination::default());
    }
}

#[cfg(test)]
mod grid_tests {
    use booktable::grid::{SortColumn, SortOrder, SortState, price_total, sort_rows};
    use booktable::model::{BookRecord, FieldValue, LabeledField};

    fn priced(key: u64, price: &str) -> BookRecord {
        BookRecord {
            key,
            price: Some(LabeledField::new("Price", FieldValue::Text(price.into()))),
            ..Default::default()
        }
    }

    #[test]
    fn price_sort_cycles_descend_ascend_off() {
        let s = SortState::cycle(None, SortColumn::Price);
        assert_eq!(s.map(|s| s.order), Some(SortOrder::Descend));
        let s = SortState::cycle(s, SortColumn::Price);
        assert_eq!(s.map(|s| s.order), Some(SortOrder::Ascend));
        assert_eq!(SortState::cycle(s, SortColumn::Price), None);

        let mut rows = vec![priced(1, "12"), priced(2, "40"), priced(3, "")];
        sort_rows(
            &mut rows,
            SortState { column: SortColumn::Price, order: SortOrder::Descend },
        );
        let keys: Vec<u64> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![2, 1, 3]);
    }

    #[test]
    fn full_page_with_bad_prices_sorts_both_ways() {
        for order in [SortOrder::Ascend, SortOrder::Descend] {
            let mut rows: Vec<BookRecord> = (0..64u64)
                .map(|k| {
                    let price = if k % 5 == 0 { "n/a".to_string() } else { ((k * 37) % 101).to_string() };
                    priced(k, &price)
                })
                .collect();
            sort_rows(&mut rows, SortState { column: SortColumn::Price, order });

            let prices: Vec<f64> = rows.iter().map(|r| r.price_value()).collect();
            let bad = prices.iter().filter(|p| p.is_nan()).count();
            assert_eq!(bad, 13);
            assert!(prices[64 - bad..].iter().all(|p| p.is_nan()));
            let good = &prices[..64 - bad];
            assert!(good.iter().all(|p| !p.is_nan()));
            match order {
                SortOrder::Ascend => assert!(good.windows(2).all(|w| w[0] <= w[1])),
                SortOrder::Descend => assert!(good.windows(2).all(|w| w[0] >= w[1])),
            }
        }
    }

    #[test]
    fn total_of_two_prices() {
        let rows = [priced(1, "20"), priced(2, "15.5")];
        assert_eq!(price_total(rows.iter()), 35.5);
        assert_eq!(price_total(std::iter::empty()), 0.0);
        assert!(price_total([priced(3, "n/a")].iter()).is_nan());
    }
}

#[cfg(test)]
mod page_tests {
    use booktable::app::page::{Completion, PageMode, Request, TablePage};
    use booktable::app::toast::ToastKind;
    use booktable::model::{
        BookRecord, FieldValue, FormValues, LabeledField, Pagination, TableListData,
    };

    fn rec(key: u64, price: &str) -> BookRecord {
        BookRecord {
            key,
            isbn: format!("isbn-{key}"),
            price: Some(LabeledField::new("Price", FieldValue::Text(price.into()))),
            ..Default::default()
        }
    }

    fn loaded(rows: Vec<BookRecord>) -> TablePage {
        let mut page = TablePage::new(10);
        let Request::List { seq, .. } = page.reload() else {
            panic!("reload must produce a list request");
        };
        let total = rows.len() as i64;
        page.complete(Completion::Listed {
            seq,
            data: Some(TableListData {
                list: rows,
                pagination: Pagination { total: Some(total), ..Default::default() },
            }),
        });
        page
    }

    #[test]
    fn selecting_two_rows_sums_prices() {
        let mut page = loaded(vec![rec(1, "10"), rec(2, "25.5")]);
        page.toggle_select_current();
        page.move_down();
        page.toggle_select_current();
        assert_eq!(page.selection_summary(), (2, 35.5));
    }

    #[test]
    fn failed_remove_keeps_selection_and_skips_reload() {
        let mut page = loaded(vec![rec(1, "20"), rec(2, "15.5")]);
        page.toggle_select_page();
        let Some(Request::Remove { toast, keys }) = page.remove_selected() else {
            panic!("expected a remove request");
        };
        assert_eq!(keys, vec![1, 2]);
        assert!(page.toasts.any(ToastKind::Loading));

        let next = page.complete(Completion::Removed { toast, ok: false });
        assert!(next.is_none());
        assert!(!page.toasts.any(ToastKind::Loading));
        assert!(page.toasts.any(ToastKind::Error));
        assert_eq!(page.selection.len(), 2);
    }

    #[test]
    fn remove_with_empty_selection_is_noop() {
        let mut page = loaded(vec![rec(1, "20")]);
        assert!(page.remove_selected().is_none());
        assert!(page.toasts.is_empty());
    }

    #[test]
    fn empty_update_values_do_not_open_modal() {
        let mut page = loaded(vec![rec(1, "20")]);
        assert!(!page.open_update(FormValues::default()));
        assert_eq!(page.mode, PageMode::Idle);
        assert!(page.edit_snapshot().is_none());
    }

    #[test]
    fn stale_list_response_is_ignored() {
        let mut page = TablePage::new(10);
        let Request::List { seq: first, .. } = page.reload() else { unreachable!() };
        let Request::List { seq: second, .. } = page.reload() else { unreachable!() };
        page.complete(Completion::Listed {
            seq: first,
            data: Some(TableListData { list: vec![rec(9, "1")], ..Default::default() }),
        });
        assert!(page.rows.is_empty());
        assert!(page.loading);

        page.complete(Completion::Listed { seq: second, data: None });
        assert!(!page.loading);
        assert!(page.toasts.any(ToastKind::Error));
    }
}
