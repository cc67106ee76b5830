//! Backend records and the session token.

mod bus;
mod company;
mod dashboard;
mod eticket;
mod payment;
mod review;
mod token;
mod trip;
mod user;

pub use bus::{Bus, BusCategory};
pub use company::Company;
pub use dashboard::CompanyDashboard;
pub use eticket::{ETicket, Passenger, TicketStatus};
pub use payment::Payment;
pub use review::Review;
pub use token::{SessionToken, TokenClaims};
pub use trip::Trip;
pub use user::User;

#[cfg(test)]
pub(crate) use token::fixtures;

use chrono::{DateTime, NaiveDate};

/// Reads the calendar date of a backend timestamp or date string.
pub(crate) fn date_of(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_of_formats() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1);

        assert_eq!(date_of(Some("2024-05-01")), day);
        assert_eq!(date_of(Some("2024-05-01T08:30:00.000Z")), day);
        assert_eq!(date_of(Some("2024-05-01 08:30")), day);
        assert_eq!(date_of(Some("soon")), None);
        assert_eq!(date_of(None), None);
    }
}
