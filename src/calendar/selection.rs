use time::Date;

/// Check-in/check-out selection as an explicit state machine:
/// `Empty` → `Start` on the first click, `Start` → `Range` on the second,
/// and any click on a completed range starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Empty,
    Start(Date),
    Range {
        start: Date,
        end: Date,
    },
}

impl Selection {
    /// Apply one calendar click. Clicks on days before `today` are ignored.
    /// A click below a pending start swaps roles: the clicked day becomes
    /// the start and the old start becomes the end.
    pub fn click(&mut self, day: Date, today: Date) {
        if day < today {
            return;
        }
        *self = match *self {
            Selection::Empty | Selection::Range { .. } => Selection::Start(day),
            Selection::Start(start) => {
                if day < start {
                    Selection::Range {
                        start: day,
                        end: start,
                    }
                } else {
                    Selection::Range { start, end: day }
                }
            }
        };
    }

    pub fn clear(&mut self) {
        *self = Selection::Empty;
    }

    pub fn start(&self) -> Option<Date> {
        match *self {
            Selection::Empty => None,
            Selection::Start(start) | Selection::Range { start, .. } => Some(start),
        }
    }

    pub fn end(&self) -> Option<Date> {
        match *self {
            Selection::Range { end, .. } => Some(end),
            _ => None,
        }
    }

    /// Nights in the selected stay; 0 until both bounds are set.
    pub fn nights(&self) -> i32 {
        match *self {
            Selection::Range { start, end } => nights_between(start, end),
            _ => 0,
        }
    }

    pub fn total(&self, price_per_night: i32) -> i32 {
        self.nights() * price_per_night
    }

    /// Whether `day` falls inside the selected range (bounds included), for
    /// highlighting.
    pub fn contains(&self, day: Date) -> bool {
        match *self {
            Selection::Range { start, end } => start <= day && day <= end,
            _ => false,
        }
    }
}

/// Whole nights between check-in and check-out.
pub fn nights_between(start: Date, end: Date) -> i32 {
    (end - start).whole_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 08 - 01);

    #[test]
    fn first_click_sets_the_start() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        assert_eq!(sel, Selection::Start(date!(2025 - 08 - 10)));
        assert_eq!(sel.nights(), 0);
    }

    #[test]
    fn second_click_completes_the_range() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 15), TODAY);
        assert_eq!(
            sel,
            Selection::Range {
                start: date!(2025 - 08 - 10),
                end: date!(2025 - 08 - 15),
            }
        );
        assert_eq!(sel.nights(), 5);
    }

    #[test]
    fn clicking_before_the_start_swaps_the_bounds() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 05), TODAY);
        assert_eq!(
            sel,
            Selection::Range {
                start: date!(2025 - 08 - 05),
                end: date!(2025 - 08 - 10),
            }
        );
    }

    #[test]
    fn third_click_starts_a_fresh_selection() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 15), TODAY);
        sel.click(date!(2025 - 08 - 20), TODAY);
        assert_eq!(sel, Selection::Start(date!(2025 - 08 - 20)));
    }

    #[test]
    fn past_days_are_ignored() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 07 - 31), TODAY);
        assert_eq!(sel, Selection::Empty);

        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 07 - 20), TODAY);
        assert_eq!(sel, Selection::Start(date!(2025 - 08 - 10)));
    }

    #[test]
    fn same_day_click_yields_a_zero_night_range() {
        // The widget allows it; the server rejects it as start >= end.
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 10), TODAY);
        assert_eq!(sel.nights(), 0);
    }

    #[test]
    fn clear_resets_both_bounds() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 15), TODAY);
        sel.clear();
        assert_eq!(sel, Selection::Empty);
        assert_eq!(sel.start(), None);
        assert_eq!(sel.end(), None);
    }

    #[test]
    fn total_is_nights_times_rate() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 15), TODAY);
        assert_eq!(sel.total(2500), 12_500);
    }

    #[test]
    fn contains_is_inclusive_of_both_bounds() {
        let mut sel = Selection::default();
        sel.click(date!(2025 - 08 - 10), TODAY);
        sel.click(date!(2025 - 08 - 15), TODAY);
        assert!(sel.contains(date!(2025 - 08 - 10)));
        assert!(sel.contains(date!(2025 - 08 - 12)));
        assert!(sel.contains(date!(2025 - 08 - 15)));
        assert!(!sel.contains(date!(2025 - 08 - 16)));
    }
}
