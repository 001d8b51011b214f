use serde::Serialize;

/// Outcome of classifying a message, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamCategory {
    UpiPinScam,
    OtpScam,
    GenericScam,
    Safe,
}

impl ScamCategory {
    /// Rule tier that produces this category; `None` for [`ScamCategory::Safe`].
    pub fn tier(self) -> Option<u8> {
        match self {
            ScamCategory::UpiPinScam => Some(1),
            ScamCategory::OtpScam => Some(2),
            ScamCategory::GenericScam => Some(3),
            ScamCategory::Safe => None,
        }
    }

    pub fn warning(self) -> &'static str {
        match self {
            ScamCategory::UpiPinScam => {
                "⚠️ UPI SCAM ALERT! Never enter your UPI PIN to receive money. This message is trying to steal from your account. DO NOT APPROVE."
            }
            ScamCategory::OtpScam => {
                "⚠️ OTP SCAM ALERT! Never share an OTP with anyone. This message is trying to gain access to your account."
            }
            ScamCategory::GenericScam => {
                "⚠️ WARNING: This message looks like a scam. Do not click any links or share personal information."
            }
            ScamCategory::Safe => {
                "✅ This message appears to be safe. Always be careful with unknown senders."
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScamCategory::UpiPinScam => "upi_pin_scam",
            ScamCategory::OtpScam => "otp_scam",
            ScamCategory::GenericScam => "generic_scam",
            ScamCategory::Safe => "safe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub category: ScamCategory,
    pub warning: &'static str,
}

impl From<ScamCategory> for Verdict {
    fn from(category: ScamCategory) -> Self {
        Self {
            category,
            warning: category.warning(),
        }
    }
}
