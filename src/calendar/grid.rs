use time::{Date, Month};

/// Cells for a 7-column month view: one leading `None` per weekday before
/// the 1st (weeks start on Sunday), then `Some(day)` for each day of the
/// month.
pub fn month_grid(month: Date) -> Vec<Option<u8>> {
    let first = first_of_month(month);
    let leading = first.weekday().number_days_from_sunday() as usize;
    let days_in_month = time::util::days_in_year_month(first.year(), first.month());

    let mut cells: Vec<Option<u8>> = Vec::with_capacity(leading + days_in_month as usize);
    cells.extend(std::iter::repeat(None).take(leading));
    cells.extend((1..=days_in_month).map(Some));
    cells
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).expect("every month has a day 1")
}

/// First of the month `delta` months away from `month`'s month.
pub fn add_months(month: Date, delta: i32) -> Date {
    let zero_based = month.year() * 12 + (i32::from(u8::from(month.month())) - 1) + delta;
    let year = zero_based.div_euclid(12);
    let month_number = (zero_based.rem_euclid(12) + 1) as u8;
    Date::from_calendar_date(
        year,
        Month::try_from(month_number).expect("month number is 1..=12"),
        1,
    )
    .expect("first of month")
}

/// Tracks the first of the two displayed months, bounded below by the
/// earliest bookable month.
#[derive(Debug, Clone, Copy)]
pub struct MonthCursor {
    current: Date,
    min: Date,
}

impl MonthCursor {
    pub fn new(initial: Date, min: Date) -> Self {
        Self {
            current: first_of_month(initial),
            min: first_of_month(min),
        }
    }

    pub fn current(&self) -> Date {
        self.current
    }

    /// The second displayed month is always the one after the current.
    pub fn second_month(&self) -> Date {
        add_months(self.current, 1)
    }

    pub fn is_selectable(&self, month: Date) -> bool {
        first_of_month(month) >= self.min
    }

    /// Move one month forward or back; a move landing before the minimum
    /// bookable month is a no-op.
    pub fn navigate(&mut self, direction: i32) {
        let next = add_months(self.current, direction);
        if self.is_selectable(next) {
            self.current = next;
        }
    }

    pub fn can_navigate_back(&self) -> bool {
        self.is_selectable(add_months(self.current, -1))
    }

    /// Same predicate as navigation: the second panel renders only when its
    /// month is selectable.
    pub fn shows_second_month(&self) -> bool {
        self.is_selectable(self.second_month())
    }
}
