//! SMS alert composition (message text only; nothing is sent)

use serde::{Deserialize, Serialize};

use crate::classifier::CropLabel;
use crate::error::{AdvisoryError, AdvisoryResult};
use crate::knowledge::Language;
use crate::render::TemplateRenderer;

const PHONE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsAlert {
    pub phone_number: String,
    pub sms_message: String,
}

/// Check a 10-digit mobile number (country code is added by the template)
pub fn validate_phone(phone: &str) -> AdvisoryResult<&str> {
    let phone = phone.trim();
    if phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(phone)
    } else {
        Err(AdvisoryError::Validation(format!(
            "phone number must be exactly {} digits",
            PHONE_DIGITS
        )))
    }
}

pub fn compose(
    renderer: &TemplateRenderer,
    crop: CropLabel,
    phone: &str,
    language: &Language,
) -> AdvisoryResult<SmsAlert> {
    let phone = validate_phone(phone)?;
    let crop_name = crop.title();
    let message = renderer.render(
        "sms.alert",
        language,
        &[("phone", phone), ("crop", &crop_name)],
    );

    Ok(SmsAlert {
        phone_number: phone.to_string(),
        sms_message: message,
    })
}
