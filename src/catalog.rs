use lazy_static::lazy_static;
use serde::Serialize;

/// One indicator code with its human-readable label.
#[derive(Clone, Debug, Serialize)]
pub struct Indicator {
    pub code: &'static str,
    pub label: &'static str,
}

/// A display grouping of related indicators for navigation.
///
/// The catalog is pure configuration: loaded once, immutable for the
/// process lifetime. Categories and their indicators keep declaration
/// order, which drives display order in the UI.
#[derive(Clone, Debug, Serialize)]
pub struct Category {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub indicators: Vec<Indicator>,
}

lazy_static! {
    static ref CATEGORIES: Vec<Category> = vec![
        Category {
            key: "economy",
            display_name: "💰 Economic Development",
            description: "Key indicators measuring economic growth, financial inclusion, and trade performance",
            color: "#3B82F6",
            indicators: vec![
                Indicator { code: "SL_EMP_EARN", label: "8.5.1 Average hourly earnings of employees" },
                Indicator { code: "DC_TOF_TRDCML", label: "8.1.1 Total official flows commitments for Aid for Trade" },
                Indicator { code: "DC_TOF_TRDDBML", label: "8.1.2 Total official flows disbursed for Aid for Trade" },
                Indicator { code: "FB_BNK_ACCSS", label: "8.10.1 Account at a financial institution or mobile-money-service provider" },
            ],
        },
        Category {
            key: "work",
            display_name: "👥 Employment & Labor",
            description: "Metrics related to employment rates, productivity, and youth engagement",
            color: "#10B981",
            indicators: vec![
                Indicator { code: "NY_GDP_PCAP", label: "8.2.1 Annual growth rate of real GDP per employed person" },
                Indicator { code: "SL_TLF_UEM", label: "8.5.2 Unemployment rate, by sex, age and persons with disabilities" },
                Indicator { code: "SL_TLF_NEET", label: "8.6.1 Proportion of youth not in education, employment or training" },
            ],
        },
        Category {
            key: "trade_resources",
            display_name: "🏝️ Trade & Tourism",
            description: "Indicators focusing on tourism development and resource utilization",
            color: "#F59E0B",
            indicators: vec![
                Indicator { code: "SL_TLF_CHD", label: "8.7.1 Proportion and number of children aged 5‑17 years engaged in child labour" },
                Indicator { code: "SPC_8_9_1", label: "8.9.1 Tourism direct GDP as a proportion of total GDP" },
                Indicator { code: "SPC_8_9_1IN", label: "8.9.1 Tourism direct GDP as a proportion of total GDP (inbound)" },
            ],
        },
        Category {
            key: "social_growth",
            display_name: "🌱 Social Development",
            description: "Social indicators measuring sustainable development and growth patterns",
            color: "#8B5CF6",
            indicators: vec![
                Indicator { code: "SPC_8_9_1OUT", label: "8.9.1 Tourism direct GDP as a proportion of total GDP (outbound)" },
            ],
        },
    ];
}

/// All categories in display order.
pub fn categories() -> &'static [Category] {
    &CATEGORIES
}

/// Look up one category by key.
pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.key == key)
}

/// Resolve an indicator code to its label within a category, falling back
/// to the raw code when the catalog has no entry for it.
pub fn indicator_label(category_key: &str, code: &str) -> String {
    find_category(category_key)
        .and_then(|category| {
            category
                .indicators
                .iter()
                .find(|indicator| indicator.code == code)
        })
        .map(|indicator| indicator.label.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Resolve an indicator code against every category, for callers that do
/// not carry a category key (the export endpoint).
pub fn label_for_code(code: &str) -> String {
    CATEGORIES
        .iter()
        .flat_map(|category| category.indicators.iter())
        .find(|indicator| indicator.code == code)
        .map(|indicator| indicator.label.to_string())
        .unwrap_or_else(|| code.to_string())
}
