/// Currencies accepted at the point of sale.
///
/// Only the exponent matters to the capture flow: every amount crossing an
/// interface is an integer count of minor units.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Currency {
    Aud,
    Cad,
    Chf,
    Eur,
    #[default]
    Gbp,
    Jpy,
    Krw,
    Nzd,
    Usd,
    Kwd,
    Bhd,
}

impl Currency {
    /// Number of decimal places between the major and minor unit.
    pub fn minor_unit_exponent(self) -> u32 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }

    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::Jpy | Self::Krw)
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(self, Self::Kwd | Self::Bhd)
    }

    /// Symbol typed by staff in front of an amount, stripped during parsing.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gbp => "£",
            Self::Eur => "€",
            Self::Jpy => "¥",
            Self::Krw => "₩",
            Self::Chf => "CHF",
            Self::Kwd => "KD",
            Self::Bhd => "BD",
            Self::Aud | Self::Cad | Self::Nzd | Self::Usd => "$",
        }
    }
}

/// Processor-side state of an authorization.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Succeeded,
    Failed,
    Canceled,
}

impl AuthorizationStatus {
    /// The processor has accepted the payment method and is holding funds.
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::RequiresCapture | Self::Succeeded)
    }
}

/// How the charge is being collected, sent with the authorization request.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FlowType {
    /// Card holder present, payment method collected through the wallet sheet.
    #[default]
    InPersonWallet,
}

/// Form factor hint sent with the authorization request.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceType {
    Mobile,
    #[default]
    Desktop,
}

/// Wallets the provider SDK may report as usable.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WalletKind {
    ApplePay,
    GooglePay,
    Link,
}

/// Category of a failed capture attempt.
///
/// The category decides the recovery advice shown to staff.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// Provider initialization or configuration fetch failed.
    Setup,
    /// The device cannot present a wallet sheet.
    Capability,
    /// The processor refused to create an authorization.
    Authorization,
    /// Payment method confirmation or step-up failed; nothing was charged.
    Confirmation,
    /// Confirmed on the device but the server-side capture failed; funds may be held.
    CaptureConfirmation,
    /// Staff aborted the attempt.
    Canceled,
}

impl FailureKind {
    /// Whether a fresh attempt is a sensible next step.
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::CaptureConfirmation | Self::Setup)
    }
}
