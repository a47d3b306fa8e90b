use crate::types::{AuctionRecord, PropertyType};

use chrono::{Days, NaiveDate};

pub const DEFAULT_WINDOW_DAYS: u32 = 60;

const RELEVANT_KEYWORDS: [&str; 5] = ["casa", "departamento", "depto", "dpto", "vivienda"];

/// Date window anchored on a reference date captured once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionFilter {
    pub today: NaiveDate,
    pub window_days: u32,
}

impl AuctionFilter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_window(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.window_days == 0 {
            return Err("Window must be at least 1 day".to_string());
        }
        if self.today.checked_add_days(Days::new(self.window_days.into())).is_none() {
            return Err(format!(
                "Window of {} days from {} is out of range",
                self.window_days, self.today
            ));
        }
        Ok(self)
    }

    /// Last day still inside the window.
    pub fn last_day(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(self.window_days.into()))
            .unwrap_or(NaiveDate::MAX)
    }

    /// `today < date <= today + window_days`. The reference day is excluded.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.today < date && date <= self.last_day()
    }

    pub fn is_relevant(text: &str) -> bool {
        let lower = text.to_lowercase();
        RELEVANT_KEYWORDS.iter().any(|k| lower.contains(k))
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct AuctionStats {
    pub houses: usize,
    pub apartments: usize,
    pub other: usize,
    pub total: usize,
}

impl AuctionStats {
    pub fn from_records(records: &[AuctionRecord]) -> AuctionStats {
        let count = |kind: PropertyType| {
            records
                .iter()
                .filter(|r| r.property_type == kind)
                .count()
        };

        AuctionStats {
            houses: count(PropertyType::House),
            apartments: count(PropertyType::Apartment),
            other: count(PropertyType::Other),
            total: records.len(),
        }
    }
}

impl std::fmt::Display for AuctionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nResumen por tipo:")?;
        if self.houses > 0 {
            writeln!(f, "  - {}: {}", PropertyType::House, self.houses)?;
        }
        if self.apartments > 0 {
            writeln!(f, "  - {}: {}", PropertyType::Apartment, self.apartments)?;
        }
        if self.other > 0 {
            writeln!(f, "  - {}: {}", PropertyType::Other, self.other)?;
        }
        writeln!(f, "  Total remates: {}", self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NOT_SPECIFIED;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn record(property_type: PropertyType) -> AuctionRecord {
        AuctionRecord {
            date: today(),
            time: "10:00".to_string(),
            court: NOT_SPECIFIED.to_string(),
            roll: NOT_SPECIFIED.to_string(),
            property_type,
            comuna: "Maipú".to_string(),
            address: "Los Aromos 123".to_string(),
            min_price: NOT_SPECIFIED.to_string(),
            email: NOT_SPECIFIED.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_window_bounds() {
        let filter = AuctionFilter::new(today());

        assert!(filter.contains(today() + Days::new(1)));
        assert!(filter.contains(today() + Days::new(60)));
        assert!(!filter.contains(today() + Days::new(61)));
        assert!(!filter.contains(today() - Days::new(1)));
    }

    #[test]
    fn test_window_excludes_reference_day() {
        let filter = AuctionFilter::new(today());
        assert!(!filter.contains(today()));
    }

    #[test]
    fn test_custom_window() {
        let filter = AuctionFilter::new(today()).with_window(7);

        assert_eq!(filter.last_day(), NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        assert!(filter.contains(today() + Days::new(7)));
        assert!(!filter.contains(today() + Days::new(8)));
    }

    #[test]
    fn test_validate_rejects_empty_window() {
        assert!(AuctionFilter::new(today()).with_window(0).validate().is_err());
        assert!(AuctionFilter::new(today()).validate().is_ok());
    }

    #[test]
    fn test_relevance_keywords() {
        assert!(AuctionFilter::is_relevant("Se remata DEPTO en Ñuñoa"));
        assert!(AuctionFilter::is_relevant("vivienda social"));
        assert!(AuctionFilter::is_relevant("Dpto. 301"));
        assert!(!AuctionFilter::is_relevant("Remate de vehículo y maquinaria"));
    }

    #[test]
    fn test_stats_counts_by_type() {
        let records = vec![
            record(PropertyType::House),
            record(PropertyType::Apartment),
            record(PropertyType::House),
        ];

        let stats = AuctionStats::from_records(&records);
        assert_eq!(
            stats,
            AuctionStats {
                houses: 2,
                apartments: 1,
                other: 0,
                total: 3,
            }
        );

        let rendered = stats.to_string();
        assert!(rendered.contains("  - Casa: 2"));
        assert!(rendered.contains("  - Departamento: 1"));
        assert!(!rendered.contains("Inmueble"));
        assert!(rendered.contains("Total remates: 3"));
    }
}
