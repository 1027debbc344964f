//! Industry margin benchmarks.

use serde::Serialize;

use crate::estimation::underscored;

/// Typical margins for an industry, as percentages of revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndustryBenchmark {
    pub key: &'static str,
    pub label: &'static str,
    pub gross_margin_percent: f64,
    pub net_margin_percent: f64,
}

const fn benchmark(key: &'static str, label: &'static str, gross: f64, net: f64) -> IndustryBenchmark {
    IndustryBenchmark {
        key,
        label,
        gross_margin_percent: gross,
        net_margin_percent: net,
    }
}

/// Fallback for industries without their own row.
pub static GENERAL_BENCHMARK: IndustryBenchmark =
    benchmark("general", "General Business", 40.0, 10.0);

/// Benchmarks by industry.
pub static INDUSTRY_BENCHMARKS: &[IndustryBenchmark] = &[
    benchmark("professional_services", "Professional Services", 60.0, 15.0),
    benchmark("construction", "Construction & Trades", 25.0, 7.0),
    benchmark("retail", "Retail", 35.0, 5.0),
    benchmark("hospitality", "Hospitality", 65.0, 6.0),
    benchmark("manufacturing", "Manufacturing", 30.0, 8.0),
    benchmark("technology", "Technology & Software", 70.0, 15.0),
    benchmark("healthcare", "Health & Wellness", 55.0, 12.0),
    benchmark("wholesale", "Wholesale & Distribution", 20.0, 4.0),
    benchmark("real_estate", "Real Estate", 50.0, 18.0),
    benchmark("education", "Education & Training", 55.0, 10.0),
    benchmark("transport", "Transport & Logistics", 25.0, 5.0),
];

static INDUSTRY_ALIASES: &[(&str, &str)] = &[
    ("consulting", "professional_services"),
    ("accounting", "professional_services"),
    ("legal", "professional_services"),
    ("agency", "professional_services"),
    ("trades", "construction"),
    ("trade", "construction"),
    ("building", "construction"),
    ("plumbing", "construction"),
    ("electrical", "construction"),
    ("ecommerce", "retail"),
    ("shop", "retail"),
    ("cafe", "hospitality"),
    ("restaurant", "hospitality"),
    ("food", "hospitality"),
    ("saas", "technology"),
    ("software", "technology"),
    ("it", "technology"),
    ("health", "healthcare"),
    ("medical", "healthcare"),
    ("fitness", "healthcare"),
    ("property", "real_estate"),
    ("logistics", "transport"),
    ("freight", "transport"),
];

/// Benchmark for a free-text industry, falling back to `general`.
pub fn industry_benchmark(industry: Option<&str>) -> &'static IndustryBenchmark {
    let Some(industry) = industry else {
        return &GENERAL_BENCHMARK;
    };
    let key = underscored(industry);

    if let Some(b) = INDUSTRY_BENCHMARKS.iter().find(|b| b.key == key) {
        return b;
    }

    let padded = format!("_{}_", key);
    let target = INDUSTRY_BENCHMARKS
        .iter()
        .find(|b| padded.contains(&format!("_{}_", b.key)))
        .map(|b| b.key)
        .or_else(|| {
            INDUSTRY_ALIASES
                .iter()
                .find(|(alias, _)| padded.contains(&format!("_{}_", alias)))
                .map(|(_, target)| *target)
        });

    match target.and_then(|t| INDUSTRY_BENCHMARKS.iter().find(|b| b.key == t)) {
        Some(b) => b,
        None => &GENERAL_BENCHMARK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_in_range() {
        for b in INDUSTRY_BENCHMARKS.iter().chain([&GENERAL_BENCHMARK]) {
            assert!((0.0..=100.0).contains(&b.gross_margin_percent), "{}", b.key);
            assert!(b.net_margin_percent <= b.gross_margin_percent, "{}", b.key);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(industry_benchmark(Some("Construction")).key, "construction");
        assert_eq!(industry_benchmark(Some("Real Estate")).key, "real_estate");
        assert_eq!(industry_benchmark(Some("Boutique retail")).key, "retail");
        assert_eq!(industry_benchmark(Some("Plumbing & Gas")).key, "construction");
        assert_eq!(industry_benchmark(Some("Cafe")).key, "hospitality");
        assert_eq!(industry_benchmark(Some("Beekeeping")).key, "general");
        assert_eq!(industry_benchmark(None).key, "general");
    }
}
