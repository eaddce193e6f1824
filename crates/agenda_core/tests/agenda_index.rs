use agenda_core::{
    AgendaIndex, AgendaIndexError, CalendarEvent, CalendarModel, HeaderId, Locale,
    TitledPlaceholder, Week,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Ten per-day instances spread 4/3/3 over Tuesday, Wednesday and Friday.
fn ten_events_over_three_days() -> CalendarModel {
    let today = date(2026, 10, 16);
    let week = Week::new(0, date(2026, 10, 12), today).expect("week");
    let days = [
        (date(2026, 10, 13), 4),
        (date(2026, 10, 14), 3),
        (date(2026, 10, 16), 3),
    ];
    let events = days
        .iter()
        .flat_map(|(day, count)| {
            (0..*count).map(move |n| {
                CalendarEvent::all_day(format!("{day} #{n}"), *day).with_instance_day(*day)
            })
        })
        .collect();
    CalendarModel::load_external(
        vec![week],
        Vec::new(),
        events,
        Locale::parse("de-DE").expect("de-DE parse"),
    )
    .expect("external model loads")
}

#[test]
fn ten_events_over_three_days_form_three_sections() {
    let model = ten_events_over_three_days();
    let index = AgendaIndex::build(&model);

    assert_eq!(index.len(), 10);
    assert_eq!(index.section_count(), 3);

    let lens: Vec<usize> = index.sections().iter().map(|section| section.len).collect();
    assert_eq!(lens, vec![4, 3, 3]);

    for position in 1..10 {
        let previous = index.section_of(position - 1).expect("previous row");
        let current = index.section_of(position).expect("current row");
        assert!(previous <= current, "section_of is monotonic at {position}");

        let same_section = previous == current;
        let same_header = index.header_id_of(position - 1) == index.header_id_of(position);
        assert_eq!(same_section, same_header, "header ids follow sections at {position}");
    }
    assert_eq!(index.section_of(10), None);
    assert_eq!(index.header_id_of(10), None);
}

#[test]
fn header_id_is_utc_midnight_millis() {
    let model = ten_events_over_three_days();
    let index = AgendaIndex::build(&model);

    assert_eq!(index.header_id_of(0), Some(HeaderId::for_date(date(2026, 10, 13))));
    assert_eq!(HeaderId::for_date(date(1970, 1, 2)).value(), 86_400_000);
}

#[test]
fn position_of_first_round_trips_through_section_of() {
    let mut model = CalendarModel::build_with_today(
        date(2026, 10, 1),
        date(2026, 10, 31),
        Locale::default(),
        date(2026, 10, 16),
    )
    .expect("model builds");
    model.attach_events(
        vec![
            CalendarEvent::all_day("Review", date(2026, 10, 7)),
            CalendarEvent::all_day("Retro", date(2026, 10, 7)),
            CalendarEvent::new(
                "Offsite",
                date(2026, 10, 20).and_hms_opt(8, 0, 0).expect("valid time"),
                date(2026, 10, 22).and_hms_opt(17, 0, 0).expect("valid time"),
            ),
        ],
        &TitledPlaceholder::default(),
    );
    let index = AgendaIndex::build(&model);
    assert!(index.is_current(&model));

    for day in model.days() {
        let position = index
            .position_of_first(day.date)
            .expect("every day has rows after attach");
        assert_eq!(index.section_of(position), Some(day.date));
        if position > 0 {
            assert_ne!(index.section_of(position - 1), Some(day.date));
        }
    }
}

#[test]
fn day_without_rows_is_not_found() {
    let model = ten_events_over_three_days();
    let index = AgendaIndex::build(&model);

    assert_eq!(
        index.position_of_first(date(2026, 10, 15)),
        Err(AgendaIndexError::DayNotFound(date(2026, 10, 15)))
    );
    assert_eq!(index.position_of_first(date(2026, 10, 16)), Ok(7));
}

#[test]
fn index_goes_stale_when_rows_change() {
    let mut model = ten_events_over_three_days();
    let index = AgendaIndex::build(&model);
    assert!(index.is_current(&model));

    model.attach_events(Vec::new(), &TitledPlaceholder::default());
    assert!(!index.is_current(&model));
    assert_eq!(AgendaIndex::build(&model).section_count(), 7);
}
