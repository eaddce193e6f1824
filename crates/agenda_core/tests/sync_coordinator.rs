use agenda_core::{
    CalendarEvent, CalendarModel, CalendarPickerController, Day, EventBus, Locale,
    SubscriberError, Subscription, SyncCoordinator, SyncEvent, Week,
};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::Rc;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

const TODAY: (i32, u32, u32) = (2026, 10, 16);

fn today() -> NaiveDate {
    date(TODAY.0, TODAY.1, TODAY.2)
}

type Log = Rc<RefCell<Vec<SyncEvent>>>;

fn record(bus: &EventBus) -> (Subscription, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let subscription = bus.subscribe("recorder", move |event| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    });
    (subscription, log)
}

fn commands(log: &Log) -> Vec<SyncEvent> {
    log.borrow()
        .iter()
        .filter(|event| event.is_command())
        .cloned()
        .collect()
}

#[derive(Default)]
struct RecordingController {
    calls: Rc<RefCell<Vec<String>>>,
}

impl CalendarPickerController for RecordingController {
    fn on_day_selected(&mut self, day: &Day) {
        self.calls.borrow_mut().push(format!("day {}", day.date));
    }

    fn on_event_selected(&mut self, event: &CalendarEvent) {
        self.calls.borrow_mut().push(format!("event {}", event.title));
    }

    fn on_scroll_to_date(&mut self, date: NaiveDate) {
        self.calls.borrow_mut().push(format!("scroll {date}"));
    }
}

/// One Monday-first week, one placeholder row per day (Mon = 0 .. Sun = 6).
fn one_week(bus: &EventBus) -> SyncCoordinator {
    let model = CalendarModel::build_with_today(
        date(2026, 10, 12),
        date(2026, 10, 18),
        Locale::parse("fr-FR").expect("fr-FR parse"),
        today(),
    )
    .expect("model builds");
    let mut coordinator = SyncCoordinator::new(model, bus.clone());
    coordinator.dispatch(SyncEvent::EventsReady(Vec::new()));
    coordinator
}

/// October 2026, Monday-first: five weeks starting Sep 28, one row per day.
fn october(bus: &EventBus) -> SyncCoordinator {
    let model = CalendarModel::build_with_today(
        date(2026, 10, 1),
        date(2026, 10, 31),
        Locale::parse("de-DE").expect("de-DE parse"),
        today(),
    )
    .expect("model builds");
    let mut coordinator = SyncCoordinator::new(model, bus.clone());
    coordinator.dispatch(SyncEvent::EventsReady(Vec::new()));
    coordinator
}

fn position_of(coordinator: &SyncCoordinator, day: NaiveDate) -> usize {
    coordinator
        .agenda_index()
        .position_of_first(day)
        .expect("day has rows")
}

#[test]
fn first_refresh_scrolls_both_views_to_today() {
    let bus = EventBus::new();
    let (_subscription, log) = record(&bus);
    let coordinator = october(&bus);

    let today_position = position_of(&coordinator, today());
    assert_eq!(
        commands(&log),
        vec![
            SyncEvent::AgendaRefreshed {
                revision: 1,
                rows: 35
            },
            SyncEvent::ScrollAgendaTo {
                day: today(),
                position: today_position
            },
            SyncEvent::ScrollWeeksTo { week: 2 },
        ]
    );
}

#[test]
fn tapping_wednesday_scrolls_agenda_and_selects_only_wednesday() {
    let bus = EventBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let model = CalendarModel::build_with_today(
        date(2026, 10, 12),
        date(2026, 10, 18),
        Locale::parse("fr-FR").expect("fr-FR parse"),
        today(),
    )
    .expect("model builds");
    let mut coordinator =
        SyncCoordinator::new(model, bus.clone()).with_controller(Box::new(RecordingController {
            calls: Rc::clone(&calls),
        }));
    coordinator.dispatch(SyncEvent::EventsReady(Vec::new()));
    let (_subscription, log) = record(&bus);

    let wednesday = date(2026, 10, 14);
    coordinator.dispatch(SyncEvent::DayTapped(wednesday));

    assert_eq!(
        commands(&log),
        vec![
            SyncEvent::WeekRowsInvalidated(vec![0]),
            SyncEvent::ScrollAgendaTo {
                day: wednesday,
                position: 2
            },
        ]
    );
    let selected: Vec<NaiveDate> = coordinator
        .model()
        .days()
        .filter(|day| day.selected)
        .map(|day| day.date)
        .collect();
    assert_eq!(selected, vec![wednesday]);
    assert_eq!(*calls.borrow(), vec!["day 2026-10-14".to_string()]);
}

#[test]
fn repeated_scroll_request_is_idempotent() {
    let bus = EventBus::new();
    let mut coordinator = one_week(&bus);
    let (_subscription, log) = record(&bus);

    coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 14)));
    coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 14)));
    coordinator.report_agenda_top(2);
    coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 14)));

    let scrolls = commands(&log)
        .into_iter()
        .filter(|event| matches!(event, SyncEvent::ScrollAgendaTo { .. }))
        .count();
    assert_eq!(scrolls, 1);
}

#[test]
fn pending_scroll_is_superseded_by_newer_request() {
    let bus = EventBus::new();
    let mut coordinator = one_week(&bus);
    let (_subscription, log) = record(&bus);

    let sender = coordinator.sender();
    assert!(sender.send(SyncEvent::DayTapped(date(2026, 10, 13))));
    assert!(sender.send(SyncEvent::DayTapped(date(2026, 10, 17))));
    coordinator.run_pending();

    let scrolls: Vec<SyncEvent> = commands(&log)
        .into_iter()
        .filter(|event| matches!(event, SyncEvent::ScrollAgendaTo { .. }))
        .collect();
    assert_eq!(
        scrolls,
        vec![SyncEvent::ScrollAgendaTo {
            day: date(2026, 10, 17),
            position: 5
        }]
    );
}

#[test]
fn section_change_moves_weeks_and_expands_grid() {
    let bus = EventBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let model = CalendarModel::build_with_today(
        date(2026, 10, 1),
        date(2026, 10, 31),
        Locale::parse("de-DE").expect("de-DE parse"),
        today(),
    )
    .expect("model builds");
    let mut coordinator =
        SyncCoordinator::new(model, bus.clone()).with_controller(Box::new(RecordingController {
            calls: Rc::clone(&calls),
        }));
    coordinator.dispatch(SyncEvent::EventsReady(Vec::new()));
    let today_position = position_of(&coordinator, today());
    coordinator.report_agenda_top(today_position);
    let (_subscription, log) = record(&bus);

    let target = date(2026, 10, 27);
    coordinator.sticky_header_changed(position_of(&coordinator, target));

    assert_eq!(
        commands(&log),
        vec![
            SyncEvent::WeekRowsInvalidated(vec![4]),
            SyncEvent::ScrollWeeksTo { week: 4 },
            SyncEvent::ExpandWeeksView,
        ]
    );
    assert!(coordinator.is_weeks_expanded());
    assert_eq!(coordinator.model().selected_day().map(|day| day.date), Some(target));
    assert_eq!(*calls.borrow(), vec!["scroll 2026-10-27".to_string()]);
}

#[test]
fn section_changes_during_agenda_scroll_are_ignored() {
    let bus = EventBus::new();
    let mut coordinator = october(&bus);
    let (_subscription, log) = record(&bus);

    let passing = position_of(&coordinator, date(2026, 10, 3));
    coordinator.sticky_header_changed(passing);
    assert_eq!(coordinator.model().selected_day(), None);
    assert!(commands(&log).is_empty());

    coordinator.sticky_header_changed(position_of(&coordinator, today()));
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(today())
    );
}

#[test]
fn tap_after_scrolling_away_scrolls_agenda_back() {
    let bus = EventBus::new();
    let mut coordinator = one_week(&bus);
    coordinator.report_agenda_top(4);
    let wednesday = date(2026, 10, 14);
    coordinator.dispatch(SyncEvent::DayTapped(wednesday));
    coordinator.report_agenda_top(2);

    coordinator.dispatch(SyncEvent::AgendaTouched);
    coordinator.dispatch(SyncEvent::AgendaSectionChanged(date(2026, 10, 17)));
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(date(2026, 10, 17))
    );

    let (_subscription, log) = record(&bus);
    coordinator.dispatch(SyncEvent::DayTapped(wednesday));

    assert_eq!(
        commands(&log),
        vec![
            SyncEvent::WeekRowsInvalidated(vec![0]),
            SyncEvent::ScrollAgendaTo {
                day: wednesday,
                position: 2
            },
        ]
    );
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(wednesday)
    );
}

#[test]
fn touching_agenda_cancels_scroll_and_collapses_grid() {
    let bus = EventBus::new();
    let mut coordinator = october(&bus);
    let (_subscription, log) = record(&bus);

    coordinator.dispatch(SyncEvent::AgendaTouched);
    assert_eq!(commands(&log), vec![SyncEvent::CollapseWeeksView]);
    assert!(!coordinator.is_weeks_expanded());

    let user_position = position_of(&coordinator, date(2026, 10, 3));
    coordinator.sticky_header_changed(user_position);
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(date(2026, 10, 3))
    );
}

#[test]
fn hidden_weeks_view_gets_no_expand_or_collapse() {
    let bus = EventBus::new();
    let model = CalendarModel::build_with_today(
        date(2026, 10, 1),
        date(2026, 10, 31),
        Locale::default(),
        today(),
    )
    .expect("model builds");
    let mut coordinator = SyncCoordinator::new(model, bus.clone()).with_weeks_view_enabled(false);
    coordinator.dispatch(SyncEvent::EventsReady(Vec::new()));
    let (_subscription, log) = record(&bus);

    coordinator.dispatch(SyncEvent::AgendaTouched);
    assert!(commands(&log).is_empty());
}

#[test]
fn day_without_rows_falls_back_to_today() {
    let bus = EventBus::new();
    let week = Week::new(0, date(2026, 10, 12), today()).expect("week");
    let events = vec![
        CalendarEvent::all_day("Dentist", today()).with_instance_day(today()),
        CalendarEvent::all_day("Standup", date(2026, 10, 13)).with_instance_day(date(2026, 10, 13)),
    ];
    let model = CalendarModel::load_external(
        vec![week],
        vec![Day::new(today(), today(), 0)],
        events,
        Locale::parse("fr-FR").expect("fr-FR parse"),
    )
    .expect("external model loads");
    let mut coordinator = SyncCoordinator::new(model, bus.clone());
    coordinator.refresh_agenda();
    coordinator.run_pending();
    coordinator.report_agenda_top(1);
    coordinator.report_agenda_top(0);
    let (_subscription, log) = record(&bus);

    coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 14)));

    assert_eq!(
        commands(&log),
        vec![
            SyncEvent::WeekRowsInvalidated(vec![0]),
            SyncEvent::ScrollAgendaTo {
                day: today(),
                position: 1
            },
        ]
    );
}

#[test]
fn failing_subscriber_does_not_stop_processing() {
    let bus = EventBus::new();
    let _failing = bus.subscribe("failing", |_| Err(SubscriberError::new("view gone")));
    let (_subscription, log) = record(&bus);
    let mut coordinator = one_week(&bus);

    coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 15)));
    assert!(log
        .borrow()
        .contains(&SyncEvent::ScrollAgendaTo {
            day: date(2026, 10, 15),
            position: 3
        }));
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(date(2026, 10, 15))
    );
}

#[test]
fn view_echo_terminates() {
    let bus = EventBus::new();
    let mut coordinator = one_week(&bus);
    let sender = coordinator.sender();
    let _view = bus.subscribe("agenda view", move |event| {
        if let SyncEvent::ScrollAgendaTo { day, .. } = event {
            sender.send(SyncEvent::AgendaSectionChanged(*day));
        }
        Ok(())
    });
    let (_subscription, log) = record(&bus);

    let processed = coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 13)));
    assert!(processed < 10);
    let scrolls = log
        .borrow()
        .iter()
        .filter(|event| matches!(event, SyncEvent::ScrollAgendaTo { .. }))
        .count();
    assert_eq!(scrolls, 1);
    assert_eq!(
        coordinator.model().selected_day().map(|day| day.date),
        Some(date(2026, 10, 13))
    );
}

#[test]
fn event_tap_and_today_request() {
    let bus = EventBus::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let model = CalendarModel::build_with_today(
        date(2026, 10, 12),
        date(2026, 10, 18),
        Locale::parse("fr-FR").expect("fr-FR parse"),
        today(),
    )
    .expect("model builds");
    let mut coordinator =
        SyncCoordinator::new(model, bus.clone()).with_controller(Box::new(RecordingController {
            calls: Rc::clone(&calls),
        }));
    coordinator.dispatch(SyncEvent::EventsReady(vec![CalendarEvent::all_day(
        "Lunch",
        date(2026, 10, 13),
    )]));
    coordinator.report_agenda_top(4);
    coordinator.report_agenda_top(0);
    let (_subscription, log) = record(&bus);

    coordinator.dispatch(SyncEvent::AgendaEventTapped(1));
    coordinator.dispatch(SyncEvent::AgendaEventTapped(99));
    coordinator.dispatch(SyncEvent::TodayRequested);

    assert_eq!(*calls.borrow(), vec!["event Lunch".to_string()]);
    assert_eq!(
        commands(&log),
        vec![SyncEvent::ScrollAgendaTo {
            day: today(),
            position: 4
        }]
    );
}

#[test]
fn teardown_unsubscribes_and_ignores_input() {
    let bus = EventBus::new();
    let (_subscription, log) = record(&bus);
    let mut coordinator = one_week(&bus);
    log.borrow_mut().clear();

    coordinator.teardown();
    assert!(coordinator.is_torn_down());
    assert_eq!(bus.subscriber_count(), 0);
    assert_eq!(coordinator.dispatch(SyncEvent::DayTapped(date(2026, 10, 14))), 0);
    assert!(log.borrow().is_empty());
    assert_eq!(coordinator.model().selected_day(), None);
}
