//! Heuristic intake classification.
//!
//! Keyword rules are deterministic and easy to audit; no scoring, no
//! training data. Groups are checked in a fixed priority order (billing,
//! then technical support, then new matter/project) and the first group
//! with any substring match wins. Everything else falls through to
//! [`Category::Other`].

use crate::model::Category;

const BILLING_KEYWORDS: &[&str] = &[
    "invoice",
    "invoices",
    "invoicing",
    "payment",
    "payments",
    "paying",
    "paid",
    "bill",
    "bills",
    "billing",
    "charge",
    "charges",
    "charged",
    "charging",
    "fee",
    "fees",
    "refund",
    "refunds",
    "cost",
    "costs",
    "pricing",
    "price",
];

const TECHNICAL_KEYWORDS: &[&str] = &[
    "login",
    "log in",
    "logged in",
    "logging",
    "error",
    "errors",
    "errored",
    "broken",
    "break",
    "breaks",
    "bug",
    "bugs",
    "can't access",
    "cannot access",
    "access denied",
    "access issue",
    "not working",
    "doesn't work",
    "not functioning",
    "crash",
    "crashes",
    "crashed",
    "crashing",
    "slow",
    "slowly",
    "performance",
    "password",
    "reset password",
    "forgot password",
    "connection",
    "connectivity",
    "network",
    "down",
    "down time",
    "outage",
];

const NEW_MATTER_KEYWORDS: &[&str] = &[
    "quote",
    "quotes",
    "quotation",
    "quote request",
    "new project",
    "new matter",
    "new engagement",
    "proposal",
    "proposals",
    "engagement",
    "engagements",
    "start",
    "starting",
    "begin",
    "beginning",
    "onboard",
    "onboarding",
    "on-board",
    "hire",
    "hiring",
    "retain",
    "retainer",
];

/// Classify an intake description into a category.
///
/// Total function: every input, including the empty string, yields exactly
/// one of the four labels. A description matching several groups gets the
/// highest-priority one; `"invoice error"` is billing solely because
/// billing is checked first.
pub fn classify(description: &str) -> Category {
    let lower = description.to_lowercase();

    if BILLING_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Category::Billing;
    }
    if TECHNICAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Category::TechnicalSupport;
    }
    if NEW_MATTER_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Category::NewMatterProject;
    }

    Category::Other
}
