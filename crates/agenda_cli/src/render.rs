use agenda_core::{AgendaCalendar, SyncEvent};

/// Prints the weeks grid with today in brackets and the selection starred.
pub fn print_grid(widget: &AgendaCalendar) {
    let labels = widget.weekday_labels();
    let header: Vec<String> = labels
        .iter()
        .map(|label| format!("{:>5}", label.chars().take(3).collect::<String>()))
        .collect();
    println!("     {}", header.join(""));

    for week in widget.coordinator().week_index().rows(widget.model()) {
        let cells: Vec<String> = week
            .days
            .iter()
            .map(|day| {
                let number = day.day_of_month();
                let cell = if day.is_today {
                    format!("[{number:>2}]")
                } else if day.selected {
                    format!("*{number:>2}*")
                } else {
                    format!(" {number:>2} ")
                };
                format!("{cell:>5}")
            })
            .collect();
        println!("{:>4} {}", week.month_label(), cells.join(""));
    }
}

/// Prints agenda rows grouped under their day headers.
pub fn print_agenda(widget: &AgendaCalendar) {
    let index = widget.coordinator().agenda_index();
    for section in index.sections() {
        println!("\n{}", section.day.format("%A %d %B %Y"));
        for position in section.first_position..section.first_position + section.len {
            let Some(row) = widget.render_row(position) else {
                continue;
            };
            match row.location {
                Some(location) => println!("  {position:>3}  {}  @ {location}", row.title),
                None => println!("  {position:>3}  {}", row.title),
            }
        }
    }
}

/// Prints the commands the views would execute.
pub fn print_commands(stage: &str, commands: &[SyncEvent]) {
    if commands.is_empty() {
        println!("{stage}: no commands");
        return;
    }
    for command in commands {
        match command {
            SyncEvent::ScrollAgendaTo { day, position } => {
                println!("{stage}: scroll agenda to {day} (row {position})")
            }
            SyncEvent::ScrollWeeksTo { week } => println!("{stage}: scroll weeks to row {week}"),
            SyncEvent::AgendaRefreshed { revision, rows } => {
                println!("{stage}: agenda refreshed revision={revision} rows={rows}")
            }
            SyncEvent::WeekRowsInvalidated(rows) => {
                println!("{stage}: redraw week rows {rows:?}")
            }
            other => println!("{stage}: {}", other.name()),
        }
    }
}
