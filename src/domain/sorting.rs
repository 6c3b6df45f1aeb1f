use crate::domain::itinerary::Itinerary;
use std::str::FromStr;

/// Fields available for ordering the trip list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Start,
    End,
    Days,
    Items,
    Updated,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "start" => Ok(SortField::Start),
            "end" => Ok(SortField::End),
            "days" => Ok(SortField::Days),
            "items" => Ok(SortField::Items),
            "updated" => Ok(SortField::Updated),
            _ => Err(format!(
                "Invalid sort field '{}'. Valid fields: name, start, end, days, items, updated",
                s
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(format!(
                "Invalid sort order '{}'. Valid orders: asc, desc",
                s
            )),
        }
    }
}

/// Sorts trips in-place for list views.
///
/// The sort is stable, so trips that compare equal keep their relative order.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use itinerary_core::domain::itinerary::Itinerary;
/// use itinerary_core::domain::sorting::{sort_itineraries, SortField, SortOrder};
///
/// let day = |d| NaiveDate::from_ymd_opt(2025, 7, d).unwrap();
/// let mut trips = vec![
///     Itinerary::new("Rome", day(10), day(12)).unwrap(),
///     Itinerary::new("Oslo", day(1), day(3)).unwrap(),
/// ];
///
/// sort_itineraries(&mut trips, SortField::Start, SortOrder::Ascending);
/// assert_eq!(trips[0].name(), "Oslo");
/// ```
pub fn sort_itineraries(itineraries: &mut [Itinerary], field: SortField, order: SortOrder) {
    itineraries.sort_by(|a, b| {
        let cmp = match field {
            SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            SortField::Start => a.start_date().cmp(&b.start_date()),
            SortField::End => a.end_date().cmp(&b.end_date()),
            SortField::Days => a.day_count().cmp(&b.day_count()),
            SortField::Items => a.item_count().cmp(&b.item_count()),
            SortField::Updated => a.updated_at().cmp(&b.updated_at()),
        };

        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}
