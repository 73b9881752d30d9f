use serde::{Deserialize, Serialize};

/// Business area an agent conversation and its tasks belong to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Logistics gateway that routes requests to the other two agents.
    Gateway,
    RiskManagement,
    Operations,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Gateway, Domain::RiskManagement, Domain::Operations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Gateway => "gateway",
            Domain::RiskManagement => "risk-management",
            Domain::Operations => "operations",
        }
    }

    pub fn config(&self) -> &'static DomainConfig {
        get_domain_config(*self)
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gateway" => Ok(Domain::Gateway),
            "risk-management" | "risk_management" | "risk" => Ok(Domain::RiskManagement),
            "operations" | "ops" => Ok(Domain::Operations),
            other => Err(format!("Unknown domain: {}", other)),
        }
    }
}

/// Static presentation and prompt metadata for a domain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    pub id: Domain,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
    pub system_prompt: &'static str,
}

static DOMAIN_CONFIGS: [DomainConfig; 3] = [
    DomainConfig {
        id: Domain::Gateway,
        name: "Logistics AI Agent",
        description: "Route requests to the risk-management and operations agents",
        color: "bg-blue-500",
        icon: "💼",
        system_prompt: "You are a logistics AI assistant. Help with risk-management and operation domains.",
    },
    DomainConfig {
        id: Domain::RiskManagement,
        name: "Risk Management AI Agent",
        description: "Track incidents, compliance checks and audit follow-ups",
        color: "bg-green-500",
        icon: "🛡️",
        system_prompt: "You are a risk management AI assistant. Help with incident response, compliance, audits and security reviews.",
    },
    DomainConfig {
        id: Domain::Operations,
        name: "Operations AI Agent",
        description: "Coordinate schedules, reorders, and logistics",
        color: "bg-purple-500",
        icon: "⚙️",
        system_prompt: "You are an operations AI assistant. Help with scheduling, inventory reorders, logistics coordination, and operational efficiency.",
    },
];

pub fn domain_configs() -> &'static [DomainConfig] {
    &DOMAIN_CONFIGS
}

pub fn get_domain_config(domain: Domain) -> &'static DomainConfig {
    // The table is indexed in declaration order of `Domain`.
    &DOMAIN_CONFIGS[domain as usize]
}
