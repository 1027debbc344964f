//! Static salary and project cost guides.
//!
//! Figures are annual salaries and one-off project costs in whole dollars
//! (AUD). Entries are matched in declaration order, so the order of rows is
//! part of the normaliser's tie-break behaviour.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A min/typical/max range in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationBand {
    pub min: Decimal,
    pub max: Decimal,
    pub typical: Decimal,
}

impl CompensationBand {
    pub fn new(min: u32, typical: u32, max: u32) -> Self {
        Self {
            min: Decimal::from(min),
            max: Decimal::from(max),
            typical: Decimal::from(typical),
        }
    }

    /// Scale every value by `factor`, rounding to whole units.
    pub fn scaled(&self, factor: Decimal) -> Self {
        let round = |v: Decimal| {
            (v * factor).round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        };
        Self {
            min: round(self.min),
            max: round(self.max),
            typical: round(self.typical),
        }
    }
}

/// One row of a reference guide.
#[derive(Debug, Clone, Copy)]
pub struct GuideEntry {
    /// Canonical lookup key.
    pub key: &'static str,
    /// Display name.
    pub label: &'static str,
    min: u32,
    typical: u32,
    max: u32,
}

impl GuideEntry {
    const fn new(key: &'static str, label: &'static str, min: u32, typical: u32, max: u32) -> Self {
        Self {
            key,
            label,
            min,
            typical,
            max,
        }
    }

    pub fn band(&self) -> CompensationBand {
        CompensationBand::new(self.min, self.typical, self.max)
    }
}

/// Annual salary ranges keyed by role.
pub static SALARY_GUIDE: &[GuideEntry] = &[
    GuideEntry::new("bookkeeper", "Bookkeeper", 55_000, 62_000, 70_000),
    GuideEntry::new("accountant", "Accountant", 65_000, 78_000, 95_000),
    GuideEntry::new("senior_accountant", "Senior Accountant", 90_000, 105_000, 125_000),
    GuideEntry::new("financial_controller", "Financial Controller", 120_000, 145_000, 170_000),
    GuideEntry::new("chief_financial_officer", "Chief Financial Officer", 180_000, 230_000, 300_000),
    GuideEntry::new("receptionist", "Receptionist", 50_000, 56_000, 62_000),
    GuideEntry::new("administrator", "Administrator", 55_000, 62_000, 70_000),
    GuideEntry::new("administration_assistant", "Administration Assistant", 50_000, 57_000, 65_000),
    GuideEntry::new("executive_assistant", "Executive Assistant", 75_000, 88_000, 105_000),
    GuideEntry::new("office_manager", "Office Manager", 70_000, 82_000, 95_000),
    GuideEntry::new("virtual_assistant", "Virtual Assistant", 35_000, 45_000, 55_000),
    GuideEntry::new("customer_service", "Customer Service Representative", 52_000, 58_000, 65_000),
    GuideEntry::new("sales_representative", "Sales Representative", 60_000, 72_000, 90_000),
    GuideEntry::new("account_manager", "Account Manager", 75_000, 90_000, 110_000),
    GuideEntry::new("business_development", "Business Development Manager", 90_000, 110_000, 140_000),
    GuideEntry::new("sales_manager", "Sales Manager", 100_000, 125_000, 155_000),
    GuideEntry::new("marketing_coordinator", "Marketing Coordinator", 60_000, 68_000, 78_000),
    GuideEntry::new("marketing_manager", "Marketing Manager", 100_000, 120_000, 145_000),
    GuideEntry::new("social_media_manager", "Social Media Manager", 65_000, 75_000, 90_000),
    GuideEntry::new("content_writer", "Content Writer", 60_000, 70_000, 85_000),
    GuideEntry::new("graphic_designer", "Graphic Designer", 60_000, 72_000, 88_000),
    GuideEntry::new("junior_developer", "Junior Developer", 65_000, 75_000, 85_000),
    GuideEntry::new("developer", "Developer", 90_000, 110_000, 130_000),
    GuideEntry::new("senior_developer", "Senior Developer", 130_000, 150_000, 175_000),
    GuideEntry::new("it_support", "IT Support Officer", 60_000, 70_000, 82_000),
    GuideEntry::new("project_manager", "Project Manager", 100_000, 120_000, 145_000),
    GuideEntry::new("operations_manager", "Operations Manager", 100_000, 120_000, 150_000),
    GuideEntry::new("general_manager", "General Manager", 140_000, 170_000, 220_000),
    GuideEntry::new("hr_manager", "HR Manager", 100_000, 118_000, 140_000),
    GuideEntry::new("recruiter", "Recruiter", 65_000, 78_000, 95_000),
    GuideEntry::new("warehouse_worker", "Warehouse Worker", 52_000, 58_000, 65_000),
    GuideEntry::new("delivery_driver", "Delivery Driver", 52_000, 58_000, 66_000),
    GuideEntry::new("apprentice", "Apprentice", 35_000, 45_000, 55_000),
    GuideEntry::new("tradesperson", "Qualified Tradesperson", 70_000, 85_000, 105_000),
    GuideEntry::new("site_supervisor", "Site Supervisor", 100_000, 120_000, 145_000),
    GuideEntry::new("estimator", "Estimator", 85_000, 100_000, 120_000),
    GuideEntry::new("chef", "Chef", 60_000, 70_000, 85_000),
    GuideEntry::new("barista", "Barista", 48_000, 53_000, 58_000),
    GuideEntry::new("retail_assistant", "Retail Assistant", 48_000, 53_000, 58_000),
    GuideEntry::new("store_manager", "Store Manager", 65_000, 75_000, 90_000),
];

/// One-off project cost ranges keyed by project type.
pub static PROJECT_COST_GUIDE: &[GuideEntry] = &[
    GuideEntry::new("website_redesign", "Website Redesign", 8_000, 15_000, 30_000),
    GuideEntry::new("ecommerce_website", "E-commerce Website", 15_000, 30_000, 60_000),
    GuideEntry::new("crm_implementation", "CRM Implementation", 10_000, 25_000, 60_000),
    GuideEntry::new("erp_implementation", "ERP Implementation", 50_000, 120_000, 300_000),
    GuideEntry::new("accounting_system_setup", "Accounting System Setup", 3_000, 6_000, 12_000),
    GuideEntry::new("mobile_app", "Mobile App Development", 40_000, 80_000, 200_000),
    GuideEntry::new("custom_software", "Custom Software Development", 30_000, 75_000, 200_000),
    GuideEntry::new("brand_refresh", "Brand Refresh", 5_000, 15_000, 40_000),
    GuideEntry::new("marketing_campaign", "Marketing Campaign", 5_000, 15_000, 50_000),
    GuideEntry::new("seo_campaign", "SEO Campaign", 6_000, 12_000, 30_000),
    GuideEntry::new("video_production", "Video Production", 3_000, 8_000, 25_000),
    GuideEntry::new("office_fitout", "Office Fit-out", 30_000, 80_000, 200_000),
    GuideEntry::new("it_infrastructure", "IT Infrastructure Upgrade", 10_000, 25_000, 70_000),
    GuideEntry::new("cybersecurity_audit", "Cybersecurity Audit", 5_000, 12_000, 30_000),
    GuideEntry::new("recruitment_campaign", "Recruitment Campaign", 5_000, 12_000, 25_000),
    GuideEntry::new("staff_training", "Staff Training Program", 3_000, 10_000, 30_000),
    GuideEntry::new("process_automation", "Process Automation", 8_000, 20_000, 50_000),
    GuideEntry::new("business_plan", "Business Plan Development", 3_000, 8_000, 20_000),
    GuideEntry::new("market_research", "Market Research", 5_000, 15_000, 40_000),
    GuideEntry::new("legal_review", "Legal Review", 2_000, 6_000, 15_000),
];

/// Look up a salary band by canonical role key.
pub fn salary_band(key: &str) -> Option<&'static GuideEntry> {
    SALARY_GUIDE.iter().find(|e| e.key == key)
}

/// Look up a project cost band by canonical project-type key.
pub fn project_band(key: &str) -> Option<&'static GuideEntry> {
    PROJECT_COST_GUIDE.iter().find(|e| e.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn assert_ordered(guide: &[GuideEntry]) {
        for entry in guide {
            let band = entry.band();
            assert!(
                band.min <= band.typical && band.typical <= band.max,
                "{} violates min <= typical <= max",
                entry.key
            );
        }
    }

    #[test]
    fn test_salary_bands_ordered() {
        assert_ordered(SALARY_GUIDE);
    }

    #[test]
    fn test_project_bands_ordered() {
        assert_ordered(PROJECT_COST_GUIDE);
    }

    #[test]
    fn test_keys_unique_and_canonical() {
        for guide in [SALARY_GUIDE, PROJECT_COST_GUIDE] {
            let mut seen = HashSet::new();
            for entry in guide {
                assert!(seen.insert(entry.key), "duplicate key {}", entry.key);
                assert!(
                    entry
                        .key
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c == '_'),
                    "non-canonical key {}",
                    entry.key
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        let entry = salary_band("bookkeeper").unwrap();
        assert_eq!(entry.band().typical, dec!(62000));
        assert!(salary_band("astronaut").is_none());
        assert!(project_band("crm_implementation").is_some());
    }

    #[test]
    fn test_scaled_rounds_to_whole_units() {
        let band = CompensationBand::new(55_555, 60_000, 70_001).scaled(dec!(1.10));
        assert_eq!(band.min, dec!(61111));
        assert_eq!(band.typical, dec!(66000));
        assert_eq!(band.max, dec!(77001));

        let half = CompensationBand::new(5, 5, 5).scaled(dec!(0.9));
        // 4.5 rounds away from zero
        assert_eq!(half.min, dec!(5));
    }
}
