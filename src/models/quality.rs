use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Rating given to a night once it has been stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SleepQuality {
    VeryBad,    // 0
    Poor,       // 1
    SoSo,       // 2
    Ok,         // 3
    PrettyGood, // 4
    Excellent,  // 5
}

impl SleepQuality {
    pub fn from_value(value: i32) -> AppResult<Self> {
        match value {
            0 => Ok(Self::VeryBad),
            1 => Ok(Self::Poor),
            2 => Ok(Self::SoSo),
            3 => Ok(Self::Ok),
            4 => Ok(Self::PrettyGood),
            5 => Ok(Self::Excellent),
            other => Err(AppError::InvalidQuality(other)),
        }
    }

    /// Convert enum → DB value
    pub fn value(&self) -> i32 {
        match self {
            Self::VeryBad => 0,
            Self::Poor => 1,
            Self::SoSo => 2,
            Self::Ok => 3,
            Self::PrettyGood => 4,
            Self::Excellent => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryBad => "Very bad",
            Self::Poor => "Poor",
            Self::SoSo => "So-so",
            Self::Ok => "OK",
            Self::PrettyGood => "Pretty good",
            Self::Excellent => "Excellent",
        }
    }

    /// Label for a raw stored value; unset or unknown values render as `--`.
    pub fn label_for(value: i32) -> &'static str {
        Self::from_value(value).map(|q| q.label()).unwrap_or("--")
    }
}
