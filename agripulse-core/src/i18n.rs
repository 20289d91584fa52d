//! Localized headline and change message for a recommendation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Action;

/// Output language of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    /// Parse a language code; anything unrecognized falls back to English.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "hi" => Self::Hi,
            _ => Self::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

struct Templates {
    sell_now: &'static str,
    wait_days: &'static str,
    hold: &'static str,
    increase: &'static str,
    drop: &'static str,
}

const EN: Templates = Templates {
    sell_now: "Recommended: Sell Now",
    wait_days: "Recommended: Wait {days} Days",
    hold: "Recommended: Hold",
    increase: "Expected {pct}% price increase",
    drop: "Downward trend expected ({pct}%)",
};

const HI: Templates = Templates {
    sell_now: "सलाह: अभी बेचें",
    wait_days: "सलाह: {days} दिन रुकें",
    hold: "सलाह: फसल रोक कर रखें",
    increase: "कीमत में {pct}% वृद्धि की संभावना",
    drop: "कीमत गिरने की संभावना ({pct}%)",
};

fn templates(language: Language) -> &'static Templates {
    match language {
        Language::En => &EN,
        Language::Hi => &HI,
    }
}

/// Short call to action, e.g. "Recommended: Wait 7 Days".
pub fn headline(action: Action, horizon_days: usize, language: Language) -> String {
    let t = templates(language);
    match action {
        Action::SellNow => t.sell_now.to_string(),
        Action::Wait => t.wait_days.replace("{days}", &horizon_days.to_string()),
        Action::Hold => t.hold.to_string(),
    }
}

/// One-line expected move, e.g. "Expected 4.29% price increase".
///
/// A negative change uses the drop wording and keeps its sign.
pub fn change_message(change_pct: f64, language: Language) -> String {
    let t = templates(language);
    let pct = format!("{change_pct:.2}");
    if change_pct < 0.0 {
        t.drop.replace("{pct}", &pct)
    } else {
        t.increase.replace("{pct}", &pct)
    }
}
