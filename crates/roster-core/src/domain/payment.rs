use crate::domain::ids::{ParticipantId, PaymentId};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "unpaid" => Ok(PaymentStatus::Unpaid),
            _ => Err(CoreError::InvalidPaymentStatus(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub participant_id: ParticipantId,
    pub status: PaymentStatus,
    pub amount: f64,
    pub paid_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub fn validate_payment_amount(amount: f64) -> Result<f64, CoreError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CoreError::InvalidPaymentAmount(amount.to_string()));
    }
    Ok(amount)
}
