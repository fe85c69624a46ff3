//! Deterministic synthetic records, the terminal tier of every lookup.
//!
//! All values derive from a seed that is the sum of the character codes of
//! the canonical registration number, pushed through one linear congruential
//! step. The seed is never advanced within a generation pass, so two draws
//! with the same bound always agree: a chassis number is fourteen copies of
//! one digit, and a vehicle that gets challans always gets three. Callers
//! that need identical output across runs must pin the reference date.

use chrono::{Datelike, Days, Months, NaiveDate};
use drivemeter_core::{
    resolve_rto, ChallanRecord, ChallanStatus, DataSource, InsuranceDetails, PucDetails,
    RcRecord, RegistrationNumber, TaxDetails, VehicleRecord,
};

const MAKES: [&str; 6] = ["Maruti Suzuki", "Hyundai", "Tata", "Mahindra", "Honda", "Toyota"];
const COLORS: [&str; 6] = ["White", "Silver", "Black", "Red", "Blue", "Grey"];
const FUEL_TYPES: [&str; 3] = ["Petrol", "Diesel", "CNG"];
const TRANSMISSIONS: [&str; 4] = ["Manual", "Automatic", "CVT", "AMT"];
const FIRST_NAMES: [&str; 6] = ["Rajesh", "Priya", "Amit", "Sneha", "Vikram", "Kavya"];
const LAST_NAMES: [&str; 6] = ["Kumar", "Sharma", "Patel", "Singh", "Gupta", "Reddy"];
const FATHER_NAMES: [&str; 5] = ["Ramesh", "Suresh", "Mahesh", "Dinesh", "Naresh"];
const STREETS: [&str; 5] = [
    "MG Road",
    "Brigade Road",
    "Koramangala",
    "Indiranagar",
    "Whitefield",
];
const INSURERS: [&str; 5] = [
    "HDFC ERGO",
    "ICICI Lombard",
    "Bajaj Allianz",
    "New India Assurance",
    "Oriental Insurance",
];
const VIOLATION_TYPES: [&str; 9] = [
    "Over Speeding",
    "Signal Jump",
    "Wrong Parking",
    "No Helmet",
    "Triple Riding",
    "Wrong Side Driving",
    "Mobile Phone Usage",
    "Seat Belt Violation",
    "Document Missing",
];
const FINE_AMOUNTS: [u32; 6] = [500, 1000, 1500, 2000, 2500, 5000];
const STATUSES: [ChallanStatus; 3] = [
    ChallanStatus::Paid,
    ChallanStatus::Unpaid,
    ChallanStatus::Pending,
];

/// Years a fitness certificate is valid after registration.
const FITNESS_YEARS: u32 = 15;

fn models_for(make: &str) -> &'static [&'static str; 5] {
    match make {
        "Maruti Suzuki" => &["Swift", "Baleno", "Alto", "Wagon R", "Vitara Brezza"],
        "Hyundai" => &["i20", "Creta", "Verna", "Grand i10", "Venue"],
        "Tata" => &["Nexon", "Harrier", "Safari", "Altroz", "Punch"],
        "Mahindra" => &["XUV300", "Scorpio", "XUV700", "Thar", "Bolero"],
        "Honda" => &["City", "Amaze", "WR-V", "Jazz", "CR-V"],
        _ => &["Innova Crysta", "Fortuner", "Glanza", "Urban Cruiser", "Camry"],
    }
}

/// Seeded draw for one registration number.
#[derive(Debug, Clone, Copy)]
struct Draw {
    seed: u64,
}

impl Draw {
    fn new(registration: &RegistrationNumber) -> Self {
        Self {
            seed: registration
                .as_str()
                .chars()
                .map(|c| u64::from(u32::from(c)))
                .sum(),
        }
    }

    /// `floor(((seed * 9301 + 49297) mod 233280) / 233280 * max)`, in `0..max`.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn draw(self, max: usize) -> usize {
        let residue = (self.seed * 9301 + 49297) % 233_280;
        (residue as f64 / 233_280.0 * max as f64).floor() as usize
    }

    fn signed(self, max: usize) -> i32 {
        i32::try_from(self.draw(max)).unwrap_or(0)
    }

    fn days(self, max: usize) -> Days {
        Days::new(self.draw(max) as u64)
    }

    fn pick<T: Copy>(self, items: &[T]) -> T {
        items[self.draw(items.len())]
    }

    fn digits(self, count: usize) -> String {
        (0..count).map(|_| self.draw(10).to_string()).collect()
    }
}

/// Date built the way a calendar with day and month overflow does it:
/// months outside `0..12` roll the year, days past the end of the month roll
/// into the next one (31 January plus one month is 3 March).
fn overflowing_date(year: i32, month0: i32, day: u32) -> NaiveDate {
    let year = year + month0.div_euclid(12);
    let month = month0.rem_euclid(12).unsigned_abs() + 1;

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day.saturating_sub(1)))))
        .unwrap_or(NaiveDate::MIN)
}

fn month0(date: NaiveDate) -> i32 {
    i32::try_from(date.month0()).unwrap_or(0)
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Deterministic synthetic-data generator.
///
/// Never fails: any valid registration number yields a fully populated
/// record tagged [`DataSource::Simulated`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer;

impl Synthesizer {
    /// Create a synthesizer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Synthesize a vehicle record relative to `today`.
    #[must_use]
    pub fn vehicle(&self, registration: &RegistrationNumber, today: NaiveDate) -> VehicleRecord {
        let draw = Draw::new(registration);
        let rto = resolve_rto(registration.rto_prefix());

        let make = draw.pick(&MAKES);
        let model = draw.pick(models_for(make));
        let year = today.year() - draw.signed(10) - 1;

        let last_name = draw.pick(&LAST_NAMES);
        let owner_name = format!("{} {}", draw.pick(&FIRST_NAMES), last_name);
        let father_name = format!("{} {}", draw.pick(&FATHER_NAMES), last_name);

        let registration_month = draw.draw(12) + 1;
        let registration_day = draw.draw(28) + 1;
        let registration_date = format!("{year}-{registration_month:02}-{registration_day:02}");
        let fitness_expiry = NaiveDate::parse_from_str(&registration_date, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.checked_add_months(Months::new(FITNESS_YEARS * 12)))
            .map(iso);

        // Year shifted first, then the month replaced, each step overflowing.
        let shifted = overflowing_date(
            today.year() + if draw.draw(2) == 0 { -1 } else { 1 },
            month0(today),
            today.day(),
        );
        let insurance = overflowing_date(shifted.year(), draw.signed(12), shifted.day());

        let puc = overflowing_date(
            today.year(),
            month0(today) + if draw.draw(2) == 0 { -6 } else { 6 },
            today.day(),
        );
        let tax = overflowing_date(today.year() + 1, month0(today), today.day());

        let address = format!(
            "{}, {}, {} City - {}",
            draw.draw(999) + 1,
            draw.pick(&STREETS),
            registration.state_code(),
            560_000 + draw.draw(900)
        );

        let tax_amount = u32::try_from(10_000 + draw.draw(20_000)).ok();

        VehicleRecord {
            registration_number: registration.as_str().to_string(),
            owner_name,
            father_name,
            address,
            vehicle_class: "Motor Car".to_string(),
            make: make.to_string(),
            model: model.to_string(),
            fuel_type: draw.pick(&FUEL_TYPES).to_string(),
            color: draw.pick(&COLORS).to_string(),
            transmission: draw.pick(&TRANSMISSIONS).to_string(),
            manufacturing_year: year.to_string(),
            manufacturing_date: format!("{year}-01-15"),
            registration_date,
            chassis_number: format!("MA3{}", draw.digits(14)),
            engine_number: format!("K{}", draw.digits(8)),
            rto_code: registration.rto_prefix().to_string(),
            rto_name: rto.name,
            rto_state: rto.state,
            insurance_expiry: iso(insurance),
            puc_expiry: iso(puc),
            tax_status: "PAID".to_string(),
            fitness_expiry,
            insurance_details: InsuranceDetails {
                valid_upto: iso(insurance),
                insurer_name: draw.pick(&INSURERS).to_string(),
                is_expired: insurance < today,
            },
            puc_details: PucDetails {
                valid_upto: iso(puc),
                test_result: if draw.draw(10) > 1 { "PASS" } else { "FAIL" }.to_string(),
                is_expired: puc < today,
            },
            tax_details: TaxDetails {
                tax_paid_upto: iso(tax),
                tax_amount,
                is_overdue: draw.draw(10) > 8,
            },
            data_source: DataSource::Simulated,
        }
    }

    /// Synthesize challan entries relative to `today`.
    ///
    /// Roughly seven in ten registration numbers get none.
    #[must_use]
    pub fn challans(
        &self,
        registration: &RegistrationNumber,
        today: NaiveDate,
    ) -> Vec<ChallanRecord> {
        let draw = Draw::new(registration);

        if draw.draw(10) < 7 {
            return Vec::new();
        }

        let count = draw.draw(3) + 1;
        let stamp = today.format("%Y%m%d");
        let violation_date = today.checked_sub_days(draw.days(365)).unwrap_or(today);

        (0..count)
            .map(|i| ChallanRecord {
                challan_number: format!("CH{stamp}{i}{}", draw.draw(1000)),
                vehicle_number: registration.as_str().to_string(),
                violation_date: iso(violation_date),
                violation_type: draw.pick(&VIOLATION_TYPES).to_string(),
                fine_amount: draw.pick(&FINE_AMOUNTS),
                status: draw.pick(&STATUSES),
                location: format!("{}, Bangalore", draw.pick(&STREETS)),
                data_source: DataSource::Simulated,
            })
            .collect()
    }

    /// Synthesize a registration certificate, projected from the vehicle record.
    #[must_use]
    pub fn rc(&self, registration: &RegistrationNumber, today: NaiveDate) -> RcRecord {
        RcRecord::from_vehicle(&self.vehicle(registration, today), "5")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn reg(raw: &str) -> RegistrationNumber {
        RegistrationNumber::parse(raw).expect("valid registration")
    }

    fn today() -> NaiveDate {
        date(2026, 10, 16)
    }

    #[test]
    fn test_seed_and_draws() {
        let draw = Draw::new(&reg("MH12AB1234"));
        assert_eq!(draw.seed, 581);
        assert_eq!(draw.draw(2), 0);
        assert_eq!(draw.draw(6), 2);
        assert_eq!(draw.draw(10), 3);
        assert_eq!(draw.draw(365), 137);
        assert_eq!(draw.draw(20_000), 7522);

        let draw = Draw::new(&reg("DL01CA0001"));
        assert_eq!(draw.seed, 566);
        assert_eq!(draw.draw(10), 7);
        assert_eq!(draw.draw(1000), 778);
    }

    #[test]
    fn test_overflowing_date() {
        assert_eq!(overflowing_date(2026, 1, 31), date(2026, 3, 3));
        assert_eq!(overflowing_date(2026, 15, 16), date(2027, 4, 16));
        assert_eq!(overflowing_date(2026, -3, 16), date(2025, 10, 16));
        assert_eq!(overflowing_date(2027, 1, 29), date(2027, 3, 1));
        assert_eq!(overflowing_date(2026, 9, 16), date(2026, 10, 16));
    }

    #[test]
    fn test_vehicle_fields() {
        let vehicle = Synthesizer::new().vehicle(&reg("MH12AB1234"), today());

        assert_eq!(vehicle.registration_number, "MH12AB1234");
        assert_eq!(vehicle.make, "Tata");
        assert_eq!(vehicle.model, "Harrier");
        assert_eq!(vehicle.manufacturing_year, "2022");
        assert_eq!(vehicle.manufacturing_date, "2022-01-15");
        assert_eq!(vehicle.owner_name, "Amit Patel");
        assert_eq!(vehicle.father_name, "Suresh Patel");
        assert_eq!(vehicle.fuel_type, "Diesel");
        assert_eq!(vehicle.color, "Black");
        assert_eq!(vehicle.transmission, "Automatic");
        assert_eq!(vehicle.registration_date, "2022-05-11");
        assert_eq!(vehicle.chassis_number, format!("MA3{}", "3".repeat(14)));
        assert_eq!(vehicle.engine_number, "K33333333");
        assert_eq!(vehicle.address, "376, Brigade Road, MH City - 560338");
        assert_eq!(vehicle.rto_code, "MH12");
        assert_eq!(vehicle.rto_name, "Pune RTO");
        assert_eq!(vehicle.rto_state, "Maharashtra");
        assert_eq!(vehicle.fitness_expiry.as_deref(), Some("2037-05-11"));
        assert_eq!(vehicle.data_source, DataSource::Simulated);

        assert_eq!(vehicle.insurance_expiry, "2025-05-16");
        assert_eq!(vehicle.insurance_details.insurer_name, "ICICI Lombard");
        assert!(vehicle.insurance_details.is_expired);

        assert_eq!(vehicle.puc_expiry, "2026-04-16");
        assert_eq!(vehicle.puc_details.test_result, "PASS");
        assert!(vehicle.puc_details.is_expired);

        assert_eq!(vehicle.tax_details.tax_paid_upto, "2027-10-16");
        assert_eq!(vehicle.tax_details.tax_amount, Some(17522));
        assert!(!vehicle.tax_details.is_overdue);
    }

    #[test]
    fn test_vehicle_forward_offsets() {
        let vehicle = Synthesizer::new().vehicle(&reg("DL01CA0001"), today());

        assert_eq!(vehicle.insurance_expiry, "2027-10-16");
        assert!(!vehicle.insurance_details.is_expired);
        assert_eq!(vehicle.puc_expiry, "2027-04-16");
        assert!(!vehicle.puc_details.is_expired);
        assert_eq!(vehicle.rto_name, "Delhi Central RTO");
    }

    #[test]
    fn test_vehicle_is_idempotent() {
        let synthesizer = Synthesizer::new();
        let registration = reg("MH12AB1234");

        let first = serde_json::to_string(&synthesizer.vehicle(&registration, today()))
            .expect("serialize vehicle");
        let second = serde_json::to_string(&synthesizer.vehicle(&registration, today()))
            .expect("serialize vehicle");
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_prefix() {
        let vehicle = Synthesizer::new().vehicle(&reg("ZZ99AB1234"), today());
        assert_eq!(vehicle.rto_name, "ZZ99 RTO");
        assert_eq!(vehicle.rto_state, "India");
        assert!(vehicle.address.contains("ZZ City"));
    }

    #[test]
    fn test_no_challans_below_gate() {
        let synthesizer = Synthesizer::new();
        assert!(synthesizer.challans(&reg("MH12AB1234"), today()).is_empty());
        assert!(synthesizer.challans(&reg("MH01AB1234"), today()).is_empty());
    }

    #[test]
    fn test_challans_above_gate() {
        let challans = Synthesizer::new().challans(&reg("DL01CA0001"), today());

        assert_eq!(challans.len(), 3);
        for (i, challan) in challans.iter().enumerate() {
            assert_eq!(challan.challan_number, format!("CH20261016{i}778"));
            assert_eq!(challan.vehicle_number, "DL01CA0001");
            assert_eq!(challan.violation_date, "2026-01-06");
            assert_eq!(challan.violation_type, "Seat Belt Violation");
            assert_eq!(challan.fine_amount, 2500);
            assert_eq!(challan.status, ChallanStatus::Pending);
            assert_eq!(challan.location, "Indiranagar, Bangalore");
            assert_eq!(challan.data_source, DataSource::Simulated);
        }
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_challan_ratio_over_sample() {
        let synthesizer = Synthesizer::new();
        let mut total = 0usize;
        let mut empty = 0usize;

        for state in ["MH", "DL", "KA", "TN", "GJ"] {
            for district in 1..=20 {
                for first in ['A', 'B', 'C'] {
                    for second in ['X', 'Y', 'Z'] {
                        for number in ["1234", "5678", "9012"] {
                            let raw = format!("{state}{district:02}{first}{second}{number}");
                            let challans = synthesizer.challans(&reg(&raw), today());
                            total += 1;
                            if challans.is_empty() {
                                empty += 1;
                            } else {
                                assert!((1..=3).contains(&challans.len()));
                            }
                        }
                    }
                }
            }
        }

        let ratio = empty as f64 / total as f64;
        assert!((0.6..=0.85).contains(&ratio), "zero-challan ratio {ratio}");
    }

    #[test]
    fn test_rc_projection() {
        let synthesizer = Synthesizer::new();
        let registration = reg("MH12AB1234");
        let rc = synthesizer.rc(&registration, today());
        let vehicle = synthesizer.vehicle(&registration, today());

        assert_eq!(rc.owner_name, vehicle.owner_name);
        assert_eq!(rc.father_name, "Suresh Patel");
        assert_eq!(rc.make, "Tata");
        assert_eq!(rc.model, "Harrier");
        assert_eq!(rc.manufacturing_date, "2022-01-15");
        assert_eq!(rc.seating_capacity, "5");
        assert_eq!(rc.fitness_upto, vehicle.fitness_expiry);
        assert_eq!(rc.data_source, DataSource::Simulated);
    }
}
