//! Share and confirmation links.
//!
//! Referral links look like `<appUrl>?ref=<code>`; confirmation links look
//! like `<appUrl>/confirm?code=<code>`.

use crate::{ReferralCode, ReferralError, Result};

/// Query parameter carrying a referral code.
pub const REFERRAL_PARAM: &str = "ref";

/// Query parameter carrying a confirmation code.
pub const CONFIRM_PARAM: &str = "code";

/// Path of the confirmation page.
pub const CONFIRM_PATH: &str = "/confirm";

/// Build `<appUrl>?ref=<code>`.
pub fn referral_link(app_url: &str, code: &ReferralCode) -> String {
    format!("{}?{REFERRAL_PARAM}={code}", base(app_url))
}

/// Build `<appUrl>/confirm?code=<code>`.
pub fn confirmation_link(app_url: &str, code: &ReferralCode) -> String {
    format!("{}{CONFIRM_PATH}?{CONFIRM_PARAM}={code}", base(app_url))
}

/// Extract the referral code from a share link.
pub fn referral_code_from_url(url: &str) -> Result<ReferralCode> {
    code_from_param(url, REFERRAL_PARAM)
}

/// Extract the confirmation code from a confirmation link.
pub fn confirmation_code_from_url(url: &str) -> Result<ReferralCode> {
    code_from_param(url, CONFIRM_PARAM)
}

fn code_from_param(url: &str, param: &str) -> Result<ReferralCode> {
    let value = query_param(url, param)
        .ok_or_else(|| ReferralError::InvalidUrl(format!("missing {param}= parameter")))?;
    ReferralCode::parse(value)
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

fn base(app_url: &str) -> &str {
    app_url.trim_end_matches('/')
}
