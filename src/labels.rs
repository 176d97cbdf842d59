use crate::schema::StatementKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[schemars(description = "Simplified Chinese labels")]
    Zh,

    #[schemars(description = "English labels")]
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zh => write!(f, "zh"),
            Self::En => write!(f, "en"),
        }
    }
}

/// Anything with a fixed (Chinese, English) label pair.
///
/// Labels are only looked up at the assembly boundary; computation never
/// branches on language.
pub trait Localized {
    fn labels(&self) -> (&'static str, &'static str);

    fn label(&self, language: Language) -> &'static str {
        let (zh, en) = self.labels();
        match language {
            Language::Zh => zh,
            Language::En => en,
        }
    }
}

impl Localized for StatementKind {
    fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Self::Balance => ("资产负债表", "Balance Sheet"),
            Self::Income => ("利润表", "Income Statement"),
            Self::CashFlow => ("现金流量表", "Cash-Flow Statement"),
        }
    }
}

/// Free-text notes attached to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    MixedFrequency,
    EbitdaApproximation,
    /// No period reports a non-zero depreciation and amortization figure.
    DepreciationUnavailable,
    EmptyStatement(StatementKind),
}

impl Note {
    pub fn render(&self, language: Language) -> String {
        match (self, language) {
            (Self::MixedFrequency, Language::Zh) => {
                "注意：报告期频率不一致（可能混合年报/季报），请谨慎比较。".to_string()
            }
            (Self::MixedFrequency, Language::En) => {
                "Note: reporting periods are spaced inconsistently (annual and quarterly reports may be mixed); compare with care.".to_string()
            }
            (Self::EbitdaApproximation, Language::Zh) => {
                "EBITDA利润率为近似值：以管理费用的10%估算折旧摊销，并非精确EBITDA。".to_string()
            }
            (Self::EbitdaApproximation, Language::En) => {
                "The EBITDA margin is an approximation: depreciation and amortization are estimated as 10% of administrative expenses, so it is not an exact EBITDA margin.".to_string()
            }
            (Self::DepreciationUnavailable, Language::Zh) => {
                "折旧/摊销数据缺失或均为0，现金再投资比率无法反映资产更新需求，请谨慎解读。"
                    .to_string()
            }
            (Self::DepreciationUnavailable, Language::En) => {
                "Depreciation and amortization are missing or zero in every period; the cash reinvestment ratio is unavailable or overstated.".to_string()
            }
            (Self::EmptyStatement(kind), Language::Zh) => {
                format!("{}无可用数据，相关指标未计算。", kind.label(language))
            }
            (Self::EmptyStatement(kind), Language::En) => {
                format!(
                    "The {} has no usable periods; its metrics were not computed.",
                    kind.label(language)
                )
            }
        }
    }
}

/// Display text for an NA value.
pub const fn not_available(language: Language) -> &'static str {
    match language {
        Language::Zh => "无数据",
        Language::En => "N/A",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_serde_tags() {
        assert_eq!(serde_json::to_string(&Language::Zh).unwrap(), "\"zh\"");
        let en: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(en, Language::En);
        assert_eq!(Language::default(), Language::Zh);
    }

    #[test]
    fn test_notes_differ_by_language_only() {
        let zh = Note::EmptyStatement(StatementKind::CashFlow).render(Language::Zh);
        let en = Note::EmptyStatement(StatementKind::CashFlow).render(Language::En);
        assert!(zh.contains("现金流量表"));
        assert!(en.contains("Cash-Flow Statement"));
    }
}
