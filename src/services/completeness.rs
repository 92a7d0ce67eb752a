use crate::models::{FlightSearchParams, HotelSearchParams, Intent, IntentRecord};

pub const FLIGHT_ORIGIN_LABEL: &str = "departure city/airport";
pub const FLIGHT_DESTINATION_LABEL: &str = "destination city/airport";
pub const FLIGHT_DEPARTURE_LABEL: &str = "departure date";

pub const HOTEL_DESTINATION_LABEL: &str = "destination city";
pub const HOTEL_CHECK_IN_LABEL: &str = "check-in date";
pub const HOTEL_CHECK_OUT_LABEL: &str = "check-out date";

#[derive(Debug, Clone, PartialEq)]
pub struct Completeness {
    pub complete: bool,
    pub missing: Vec<String>,
}

/// What the chat flow can do next with an extracted record.
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    /// The intent needs no provider call.
    NotRequired,
    Flight(FlightSearchParams),
    Hotel(HotelSearchParams),
    /// Labels of the absent mandatory fields, in declaration order.
    Incomplete { missing: Vec<String> },
}

pub fn check(record: &IntentRecord) -> Completeness {
    match evaluate(record) {
        Readiness::Incomplete { missing } => Completeness {
            complete: false,
            missing,
        },
        _ => Completeness {
            complete: true,
            missing: Vec::new(),
        },
    }
}

pub fn evaluate(record: &IntentRecord) -> Readiness {
    match record.intent {
        Intent::FlightSearch => flight_readiness(record),
        Intent::HotelSearch => hotel_readiness(record),
        Intent::GeneralTravel | Intent::Greeting | Intent::Help => Readiness::NotRequired,
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn missing_labels(fields: &[(&str, bool)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(label, _)| label.to_string())
        .collect()
}

fn flight_readiness(record: &IntentRecord) -> Readiness {
    match (
        text(&record.origin),
        text(&record.destination),
        record.departure_date,
    ) {
        (Some(origin), Some(destination), Some(departure_date)) => {
            let mut params =
                FlightSearchParams::new(origin.to_string(), destination.to_string(), departure_date);
            params.adults = record.adults.max(1);
            params.return_date = record.return_date;
            Readiness::Flight(params)
        }
        (origin, destination, departure_date) => Readiness::Incomplete {
            missing: missing_labels(&[
                (FLIGHT_ORIGIN_LABEL, origin.is_some()),
                (FLIGHT_DESTINATION_LABEL, destination.is_some()),
                (FLIGHT_DEPARTURE_LABEL, departure_date.is_some()),
            ]),
        },
    }
}

fn hotel_readiness(record: &IntentRecord) -> Readiness {
    match (text(&record.destination), record.check_in, record.check_out) {
        (Some(destination), Some(check_in), Some(check_out)) => {
            let mut params = HotelSearchParams::new(destination.to_string(), check_in, check_out);
            params.adults = record.adults.max(1);
            Readiness::Hotel(params)
        }
        (destination, check_in, check_out) => Readiness::Incomplete {
            missing: missing_labels(&[
                (HOTEL_DESTINATION_LABEL, destination.is_some()),
                (HOTEL_CHECK_IN_LABEL, check_in.is_some()),
                (HOTEL_CHECK_OUT_LABEL, check_out.is_some()),
            ]),
        },
    }
}
