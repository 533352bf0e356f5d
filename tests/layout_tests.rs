use bus_seat_layout::*;

fn map_of(entries: &[(u32, &str)]) -> SeatStatusMap {
    SeatStatusMap::from_tokens(entries.iter().map(|(seat, token)| (*seat, Some(*token)))).unwrap()
}

#[test]
fn test_classifier_recognised_tokens() {
    let cases = [
        ("reserved", SeatStatus::Reserved),
        ("processing", SeatStatus::Processing),
        ("freezed", SeatStatus::Frozen),
        ("cancelled", SeatStatus::Cancelled),
    ];

    for (token, expected) in cases {
        let classification = classify(Some(token));
        assert_eq!(classification.category, expected, "token {}", token);
        assert!(classification.is_dark, "token {} should use light text", token);
        assert_eq!(classification.text_color(), "#ffffff");
    }
}

#[test]
fn test_classifier_falls_back_to_available() {
    for token in [Some("bogus"), Some("Reserved"), Some("frozen"), Some(""), None] {
        let classification = classify(token);
        assert_eq!(classification.category, SeatStatus::Available, "token {:?}", token);
        assert!(!classification.is_dark);
        assert_eq!(classification.text_color(), "#111827");
    }
}

#[test]
fn test_status_tokens_deserialize_permissively() {
    let seats = SeatStatusMap::from_json_str(
        r#"{"1": "reserved", "2": "bogus", "3": null, "4": 7, "5": "freezed", "6": "available"}"#,
    )
    .unwrap();

    assert_eq!(seats.len(), 6);
    assert_eq!(seats.status(1), SeatStatus::Reserved);
    assert_eq!(seats.status(2), SeatStatus::Available);
    assert_eq!(seats.status(3), SeatStatus::Available);
    assert_eq!(seats.status(4), SeatStatus::Available);
    assert_eq!(seats.status(5), SeatStatus::Frozen);
    assert_eq!(seats.status(6), SeatStatus::Available);
    // absent keys are available too
    assert_eq!(seats.status(99), SeatStatus::Available);
}

#[test]
fn test_invalid_payload_keys_are_skipped() {
    let seats = SeatStatusMap::from_json_str(
        r#"{"1": "reserved", "note": "x", "A1": "freezed", "0": "cancelled", "-3": "reserved", "201": "reserved"}"#,
    )
    .unwrap();

    assert_eq!(seats.len(), 1);
    assert_eq!(seats.status(1), SeatStatus::Reserved);
    assert!(!seats.contains(0));
    assert!(!seats.contains(201));
}

#[test]
fn test_structured_status_values_are_available() {
    let seats = SeatStatusMap::from_json_str(
        r#"{"1": {"status": "reserved"}, "2": ["freezed"], "3": true, "4": "processing"}"#,
    )
    .unwrap();

    assert_eq!(seats.len(), 4);
    assert_eq!(seats.status(1), SeatStatus::Available);
    assert_eq!(seats.status(2), SeatStatus::Available);
    assert_eq!(seats.status(3), SeatStatus::Available);
    assert_eq!(seats.status(4), SeatStatus::Processing);
}

#[test]
fn test_seat_numbers_are_bounded() {
    assert!(SeatStatusMap::from_entries([(0, SeatStatus::Reserved)]).is_err());
    assert!(SeatStatusMap::from_entries([(MAX_SEAT_NUMBER + 1, SeatStatus::Reserved)]).is_err());
    assert!(SeatStatusMap::from_entries([(MAX_SEAT_NUMBER, SeatStatus::Reserved)]).is_ok());

    let seats = map_of(&[(1, "available")]);
    assert!(matches!(
        seats.with_status(u32::MAX, SeatStatus::Frozen),
        Err(SeatLayoutError::InvalidSeatNumber(_))
    ));
    assert!(seats.with_status(0, SeatStatus::Frozen).is_err());
}

#[test]
fn test_huge_seat_number_does_not_inflate_layout() {
    let seats = SeatStatusMap::from_json_str(r#"{"3000000000": "reserved"}"#).unwrap();
    assert!(seats.is_empty());
    assert_eq!(seats.seat_count(SeatCountPolicy::HighestSeatNumber), 0);
    assert_eq!(
        render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber),
        LayoutView::Empty
    );

    // one valid seat next to the huge key still renders
    let seats =
        SeatStatusMap::from_json_str(r#"{"3000000000": "reserved", "7": "freezed"}"#).unwrap();
    let view = render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber);
    assert_eq!(seat_order_len(&view), 7);
    assert_eq!(view.cell(7).unwrap().category, SeatStatus::Frozen);
}

#[test]
fn test_render_highest_allowed_seat_number() {
    let seats = map_of(&[(MAX_SEAT_NUMBER, "reserved")]);
    let view = render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber);

    let rows = view.rows();
    assert_eq!(rows.len(), 11);
    assert_eq!(seat_order_len(&view), MAX_SEAT_NUMBER as usize);

    let overflow = rows.last().unwrap();
    assert!(overflow.overflow);
    assert_eq!(overflow.cells.len(), (MAX_SEAT_NUMBER - 40) as usize);
    assert_eq!(overflow.cells.first().map(|c| c.seat_number), Some(MAX_SEAT_NUMBER));
    assert_eq!(overflow.cells.last().map(|c| c.seat_number), Some(41));
    assert_eq!(view.cell(MAX_SEAT_NUMBER).unwrap().category, SeatStatus::Reserved);
    assert_eq!(view.cell(1).unwrap().category, SeatStatus::Available);
}

#[test]
fn test_render_map_with_highest_key_far_above_entry_count() {
    let seats = map_of(&[(1, "cancelled"), (120, "freezed")]);

    let by_keys = render_layout(&seats, false, SeatCountPolicy::KeyCardinality);
    assert_eq!(seat_order_len(&by_keys), 2);
    assert_eq!(by_keys.cell(1).unwrap().category, SeatStatus::Cancelled);
    assert!(by_keys.cell(120).is_none());

    let by_highest = render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber);
    assert_eq!(seat_order_len(&by_highest), 120);
    assert_eq!(by_highest.cell(120).unwrap().category, SeatStatus::Frozen);
    assert_eq!(by_highest.cell(1).unwrap().category, SeatStatus::Cancelled);
    assert!((2..120).all(|seat| by_highest.cell(seat).unwrap().category == SeatStatus::Available));
}

fn seat_order_len(view: &LayoutView) -> usize {
    view.rows().iter().map(|row| row.cells.len()).sum()
}

#[test]
fn test_status_map_serializes_with_wire_tokens() {
    let seats = map_of(&[(2, "freezed"), (10, "reserved")]);
    let json = serde_json::to_value(&seats).unwrap();
    assert_eq!(json, serde_json::json!({"2": "freezed", "10": "reserved"}));

    let back: SeatStatusMap = serde_json::from_value(json).unwrap();
    assert_eq!(back, seats);
}

#[test]
fn test_with_status_leaves_original_untouched() {
    let original = map_of(&[(1, "available"), (2, "available")]);
    let updated = original.with_status(2, SeatStatus::Reserved).unwrap();

    assert_eq!(original.status(2), SeatStatus::Available);
    assert_eq!(updated.status(2), SeatStatus::Reserved);
    assert_eq!(updated.len(), 2);
}

#[test]
fn test_floorplan_covers_every_seat_once() {
    for seat_count in [0u32, 1, 4, 5, 40, 41, 44, 100] {
        let rows = build_floorplan(seat_count);
        let mut seats: Vec<u32> = seat_order(&rows).collect();
        seats.sort_unstable();
        let expected: Vec<u32> = (1..=seat_count).collect();
        assert_eq!(seats, expected, "seat count {}", seat_count);
    }
}

#[test]
fn test_floorplan_with_overflow_row() {
    let rows = build_floorplan(44);
    assert_eq!(rows.len(), 11);

    for (k, row) in rows[..10].iter().enumerate() {
        let first = 4 * k as u32 + 1;
        assert_eq!(
            row,
            &RowSpec::Main {
                seats: vec![first, first + 1, first + 2, first + 3]
            }
        );
        assert_eq!(row.aisle_after(), Some(2));
    }

    assert_eq!(
        rows[10],
        RowSpec::Overflow {
            seats: vec![44, 43, 42, 41]
        }
    );
    assert_eq!(rows[10].aisle_after(), None);
}

#[test]
fn test_floorplan_forty_seats_has_no_overflow() {
    let rows = build_floorplan(40);
    assert_eq!(rows.len(), 10);
    assert!(rows.iter().all(|row| !row.is_overflow()));
}

#[test]
fn test_floorplan_partial_last_row() {
    let rows = build_floorplan(6);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].seats(), &[5, 6]);

    assert!(build_floorplan(0).is_empty());
    assert_eq!(build_floorplan(1), vec![RowSpec::Main { seats: vec![1] }]);
}

#[test]
fn test_floorplan_overflow_is_strictly_descending() {
    let rows = build_floorplan(100);
    let overflow = rows.last().unwrap();
    assert!(overflow.is_overflow());
    assert_eq!(overflow.seats().len(), 60);
    assert_eq!(overflow.seats().first(), Some(&100));
    assert_eq!(overflow.seats().last(), Some(&41));
    assert!(overflow.seats().windows(2).all(|pair| pair[0] > pair[1]));
}

#[test]
fn test_floorplan_is_idempotent() {
    for seat_count in [0u32, 7, 40, 53] {
        assert_eq!(build_floorplan(seat_count), build_floorplan(seat_count));
    }
}

#[test]
fn test_render_loading_and_empty_states() {
    let seats = map_of(&[(1, "reserved")]);
    assert_eq!(
        render_layout(&seats, true, SeatCountPolicy::default()),
        LayoutView::Loading
    );
    // loading wins over empty
    assert_eq!(
        render_layout(&SeatStatusMap::new(), true, SeatCountPolicy::default()),
        LayoutView::Loading
    );
    assert_eq!(
        render_layout(&SeatStatusMap::new(), false, SeatCountPolicy::default()),
        LayoutView::Empty
    );
}

#[test]
fn test_render_sparse_map_by_highest_seat() {
    let seats = map_of(&[(5, "freezed"), (6, "freezed"), (10, "reserved"), (44, "cancelled")]);
    let view = render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber);

    let rows = view.rows();
    assert_eq!(rows.len(), 11);
    let overflow = &rows[10];
    assert!(overflow.overflow);
    assert_eq!(overflow.aisle_after, None);
    let overflow_seats: Vec<u32> = overflow.cells.iter().map(|c| c.seat_number).collect();
    assert_eq!(overflow_seats, vec![44, 43, 42, 41]);

    for seat in 1..=44 {
        let cell = view.cell(seat).unwrap();
        let expected = match seat {
            5 | 6 => SeatStatus::Frozen,
            10 => SeatStatus::Reserved,
            44 => SeatStatus::Cancelled,
            _ => SeatStatus::Available,
        };
        assert_eq!(cell.category, expected, "seat {}", seat);
        assert_eq!(cell.is_dark, expected != SeatStatus::Available, "seat {}", seat);
    }
    assert!(view.cell(45).is_none());
}

#[test]
fn test_render_sparse_map_by_key_cardinality() {
    // Four entries render as four seats, however high their numbers go.
    let seats = map_of(&[(5, "freezed"), (6, "freezed"), (10, "reserved"), (44, "cancelled")]);
    let view = render_layout(&seats, false, SeatCountPolicy::KeyCardinality);

    assert_eq!(view.rows().len(), 1);
    let numbers: Vec<u32> = view.rows()[0].cells.iter().map(|c| c.seat_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert!(view.rows()[0].cells.iter().all(|c| c.category == SeatStatus::Available));
}

#[test]
fn test_policies_agree_on_contiguous_maps() {
    let seats = SeatStatusMap::from_tokens((1..=44).map(|seat| {
        let token = match seat {
            5 | 6 => Some("freezed"),
            10 => Some("reserved"),
            44 => Some("cancelled"),
            _ => Some("available"),
        };
        (seat, token)
    }))
    .unwrap();

    let by_keys = render_layout(&seats, false, SeatCountPolicy::KeyCardinality);
    let by_highest = render_layout(&seats, false, SeatCountPolicy::HighestSeatNumber);
    assert_eq!(by_keys, by_highest);
    assert_eq!(by_keys.cell(44).unwrap().category, SeatStatus::Cancelled);
}

#[test]
fn test_render_text_grid() {
    let seats = map_of(&[(1, "reserved"), (2, "available"), (3, "available"), (4, "processing"), (5, "freezed"), (6, "available")]);
    let view = render_layout(&seats, false, SeatCountPolicy::default());

    let text = render_text(&view, TextStyle::default());
    assert_eq!(text, "  1R   2.     3.   4P\n  5F   6.");

    let config = LayoutConfig {
        show_legend: true,
        ..LayoutConfig::default()
    };
    let with_legend = render_text(&view, TextStyle::from(&config));
    assert!(with_legend.ends_with(". available  R reserved  P processing  F freezed  C cancelled"));
}

#[test]
fn test_render_text_overflow_and_placeholders() {
    let seats = SeatStatusMap::from_entries((1..=44).map(|seat| {
        let status = if seat == 44 { SeatStatus::Cancelled } else { SeatStatus::Available };
        (seat, status)
    }))
    .unwrap();
    let view = render_layout(&seats, false, SeatCountPolicy::default());
    let text = render_text(&view, TextStyle::default());
    assert_eq!(text.lines().last(), Some(" 44C  43.  42.  41."));

    assert_eq!(render_text(&LayoutView::Loading, TextStyle::default()), LOADING_TEXT);
    assert_eq!(render_text(&LayoutView::Empty, TextStyle { show_legend: true }), EMPTY_TEXT);
}

#[test]
fn test_layout_view_serializes_for_ui() {
    let seats = map_of(&[(1, "reserved")]);
    let view = render_layout(&seats, false, SeatCountPolicy::default());
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["state"], "grid");
    let cell = &json["rows"][0]["cells"][0];
    assert_eq!(cell["seat_number"], 1);
    assert_eq!(cell["category"], "reserved");
    assert_eq!(cell["is_dark"], true);
    assert_eq!(json["rows"][0]["aisle_after"], 2);

    assert_eq!(
        serde_json::to_value(&LayoutView::Empty).unwrap(),
        serde_json::json!({"state": "empty"})
    );
}
