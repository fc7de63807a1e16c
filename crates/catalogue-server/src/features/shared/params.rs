//! Query parameters of the lifecycle endpoints

use serde::Deserialize;

use crate::domain::ActionType;

/// `?status=&active=`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyParams {
    pub status: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// `?active=`
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveParams {
    pub active: bool,
}

/// `?suspend=`
#[derive(Debug, Clone, Deserialize)]
pub struct SuspendParams {
    pub suspend: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AuditVerdict {
    #[serde(rename = "VALID", alias = "valid")]
    Valid,
    #[serde(rename = "INVALID", alias = "invalid")]
    Invalid,
}

impl AuditVerdict {
    pub fn action_type(self) -> ActionType {
        match self {
            Self::Valid => ActionType::Valid,
            Self::Invalid => ActionType::Invalid,
        }
    }
}

/// `?action=VALID|INVALID&comment=`
#[derive(Debug, Clone, Deserialize)]
pub struct AuditParams {
    pub action: AuditVerdict,
    #[serde(default)]
    pub comment: Option<String>,
}

/// `?comment=` on updates
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentParams {
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_quantity() -> usize {
    10
}

fn default_interval() -> u32 {
    12
}

/// `?quantity=&interval=`, interval in months
#[derive(Debug, Clone, Deserialize)]
pub struct RandomParams {
    #[serde(default = "default_quantity")]
    pub quantity: usize,
    #[serde(default = "default_interval")]
    pub interval: u32,
}

impl Default for RandomParams {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
            interval: default_interval(),
        }
    }
}
