//! Free-text role and project-type normalisation.
//!
//! Both normalisers reduce input to lowercase letter-only words joined with
//! underscores before matching it against the canonical keys of the guides
//! in [`super::tables`].

use super::tables::{PROJECT_COST_GUIDE, SALARY_GUIDE};

/// Minimum token-overlap score for a fuzzy role match.
const MIN_ROLE_SCORE: f64 = 5.0;

/// Shorthand and alternative spellings for roles.
static ROLE_ALIASES: &[(&str, &str)] = &[
    ("pm", "project_manager"),
    ("bdm", "business_development"),
    ("bd", "business_development"),
    ("business_development_manager", "business_development"),
    ("ea", "executive_assistant"),
    ("pa", "executive_assistant"),
    ("personal_assistant", "executive_assistant"),
    ("va", "virtual_assistant"),
    ("gm", "general_manager"),
    ("cfo", "chief_financial_officer"),
    ("fc", "financial_controller"),
    ("hr", "hr_manager"),
    ("human_resources_manager", "hr_manager"),
    ("book_keeper", "bookkeeper"),
    ("admin", "administrator"),
    ("admin_assistant", "administration_assistant"),
    ("office_admin", "administrator"),
    ("csr", "customer_service"),
    ("customer_service_representative", "customer_service"),
    ("sales_rep", "sales_representative"),
    ("software_engineer", "developer"),
    ("software_developer", "developer"),
    ("web_developer", "developer"),
    ("programmer", "developer"),
    ("designer", "graphic_designer"),
    ("social_media", "social_media_manager"),
    ("copywriter", "content_writer"),
    ("tradie", "tradesperson"),
    ("ops_manager", "operations_manager"),
    ("it_technician", "it_support"),
    ("storeperson", "warehouse_worker"),
];

/// Common phrasings for project types, most specific first.
static PROJECT_ALIASES: &[(&str, &str)] = &[
    ("online_store", "ecommerce_website"),
    ("ecommerce", "ecommerce_website"),
    ("shopify", "ecommerce_website"),
    ("website", "website_redesign"),
    ("web_site", "website_redesign"),
    ("crm", "crm_implementation"),
    ("salesforce", "crm_implementation"),
    ("hubspot", "crm_implementation"),
    ("erp", "erp_implementation"),
    ("xero", "accounting_system_setup"),
    ("myob", "accounting_system_setup"),
    ("accounting_software", "accounting_system_setup"),
    ("app", "mobile_app"),
    ("software", "custom_software"),
    ("rebrand", "brand_refresh"),
    ("branding", "brand_refresh"),
    ("logo", "brand_refresh"),
    ("seo", "seo_campaign"),
    ("advertising", "marketing_campaign"),
    ("marketing", "marketing_campaign"),
    ("video", "video_production"),
    ("fitout", "office_fitout"),
    ("fit_out", "office_fitout"),
    ("renovation", "office_fitout"),
    ("network", "it_infrastructure"),
    ("servers", "it_infrastructure"),
    ("cyber_security", "cybersecurity_audit"),
    ("security_audit", "cybersecurity_audit"),
    ("recruitment", "recruitment_campaign"),
    ("hiring", "recruitment_campaign"),
    ("training", "staff_training"),
    ("automation", "process_automation"),
    ("legal", "legal_review"),
];

/// Lowercase `text`, drop everything but letters and whitespace, and split
/// on whitespace. "E-commerce" is one token, `ecommerce`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Tokens of `text` joined with underscores.
pub fn underscored(text: &str) -> String {
    tokenize(text).join("_")
}

fn lookup_alias(aliases: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    aliases
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, target)| *target)
}

fn contains_tokens(haystack: &str, needle: &str) -> bool {
    format!("_{}_", haystack).contains(&format!("_{}_", needle))
}

/// Map a free-text job title to a salary guide key.
///
/// Returns the underscored input unchanged when nothing matches, which the
/// caller sees as a key missing from the guide.
pub fn normalize_role(text: &str) -> String {
    let tokens = tokenize(text);
    let joined = tokens.join("_");

    if SALARY_GUIDE.iter().any(|e| e.key == joined) {
        return joined;
    }

    if let Some(target) = lookup_alias(ROLE_ALIASES, &joined) {
        return target.to_string();
    }

    let mut best: Option<(&str, f64)> = None;
    for entry in SALARY_GUIDE {
        let score = role_score(entry.key, &tokens, &joined);
        // strictly greater: first key wins ties
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((entry.key, score));
        }
    }
    if let Some((key, score)) = best
        && score >= MIN_ROLE_SCORE
    {
        tracing::debug!(input = %text, key, score, "Fuzzy role match");
        return key.to_string();
    }

    if let Some(token) = tokens
        .iter()
        .find(|t| SALARY_GUIDE.iter().any(|e| e.key == t.as_str()))
    {
        return token.clone();
    }

    joined
}

fn role_score(key: &str, tokens: &[String], joined: &str) -> f64 {
    let key_tokens: Vec<&str> = key.split('_').collect();
    let mut score = 0.0;

    let all_found = key_tokens.iter().all(|kt| {
        tokens
            .iter()
            .any(|t| t == kt || t.starts_with(kt) || kt.starts_with(t.as_str()))
    });
    if all_found {
        score += 10.0 * key_tokens.len() as f64;
    }

    let exact = key_tokens
        .iter()
        .filter(|kt| tokens.iter().any(|t| t == *kt))
        .count();
    score += 5.0 * exact as f64;

    score += key.len() as f64 * 0.1;

    if joined.contains(key) {
        score += key.len() as f64;
    }

    score
}

/// Map a free-text project description to a project cost guide key.
pub fn normalize_project_type(text: &str) -> Option<&'static str> {
    let joined = underscored(text);
    if joined.is_empty() {
        return None;
    }

    if let Some(entry) = PROJECT_COST_GUIDE.iter().find(|e| e.key == joined) {
        return Some(entry.key);
    }

    if let Some(target) = lookup_alias(PROJECT_ALIASES, &joined) {
        return Some(target);
    }

    if let Some(entry) = PROJECT_COST_GUIDE
        .iter()
        .find(|e| contains_tokens(&joined, e.key) || contains_tokens(e.key, &joined))
    {
        return Some(entry.key);
    }

    PROJECT_ALIASES
        .iter()
        .find(|(alias, _)| contains_tokens(&joined, alias))
        .map(|(_, target)| *target)
}
