//! Waitlist email bodies.

use plug_types::UserType;

use crate::EmailMessage;

/// Sender used when none is configured.
pub const DEFAULT_FROM: &str = "PLUG <hello@plugservices.ng>";

/// Which moment of the flow the email belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmailKind {
    /// Sent right after signup.
    Welcome,
    /// Sent again on request while the entrant is unconfirmed.
    Reminder,
}

/// Welcome / confirmation email for one entrant.
#[derive(Clone, Debug)]
pub struct ConfirmationEmail<'a> {
    pub kind: EmailKind,
    pub first_name: &'a str,
    pub user_type: Option<UserType>,
    pub referral_code: &'a str,
    pub referral_link: &'a str,
    pub confirm_link: &'a str,
}

impl ConfirmationEmail<'_> {
    pub fn subject(&self) -> String {
        match self.kind {
            EmailKind::Welcome => format!("Welcome to PLUG, {}!", self.first_name),
            EmailKind::Reminder => format!("Confirm your PLUG waitlist spot, {}", self.first_name),
        }
    }

    fn role_label(&self) -> &'static str {
        self.user_type.map(|t| t.label()).unwrap_or("member")
    }

    pub fn html(&self) -> String {
        let name = escape_html(self.first_name);
        let code = escape_html(self.referral_code);
        let referral_link = escape_html(self.referral_link);
        let confirm_link = escape_html(self.confirm_link);
        let role = self.role_label();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Welcome to PLUG</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f8fafc; margin: 0; padding: 0;">
  <div style="max-width: 600px; margin: 40px auto; background-color: #ffffff; border-radius: 16px; overflow: hidden;">
    <div style="background: #2563EB; padding: 40px 20px; text-align: center; color: white;">
      <div style="font-size: 32px; font-weight: 700;">plug.</div>
      <p style="font-size: 18px; margin: 0;">Welcome to the waitlist!</p>
    </div>
    <div style="padding: 40px 30px; color: #64748b; font-size: 16px; line-height: 1.6;">
      <h1 style="color: #1e293b; font-size: 24px;">Hi {name}!</h1>
      <p>You're officially on the PLUG waitlist as a <strong>{role}</strong>! We're excited to have you.</p>
      <p>Click the button below to confirm your email and secure your spot:</p>
      <p style="text-align: center;">
        <a href="{confirm_link}" style="display: inline-block; background-color: #2563EB; color: white; text-decoration: none; padding: 14px 32px; border-radius: 9999px; font-weight: 600;">Confirm My Email</a>
      </p>
      <h1 style="color: #1e293b; font-size: 24px;">Start Referring, Start Earning</h1>
      <p>Share your unique referral code with friends and climb the leaderboard. The top referrer wins <strong>&pound;1,500</strong> at launch!</p>
      <div style="background-color: #f1f5f9; border: 2px dashed #cbd5e1; border-radius: 12px; padding: 20px; text-align: center;">
        <p style="font-size: 14px; margin: 0 0 8px 0;">Your Referral Code</p>
        <div style="font-size: 32px; font-weight: 700; color: #2563EB; letter-spacing: 2px; font-family: Monaco, 'Courier New', monospace;">{code}</div>
      </div>
      <p>Share this link:</p>
      <p style="background-color: #f8fafc; padding: 12px; border-radius: 8px; font-family: Monaco, 'Courier New', monospace; font-size: 14px; word-break: break-all;">{referral_link}</p>
      <ul>
        <li>3 referrals: Unlock booking credit</li>
        <li>5 referrals: Get premium badge</li>
        <li>10 referrals: VIP status with priority support</li>
        <li>Top referrer: Win &pound;1,500!</li>
      </ul>
      <p>We're launching in <strong>February 2026</strong>. You'll be among the first to know when we go live.</p>
      <p style="color: #2563EB; font-weight: 600;">The PLUG Team</p>
    </div>
    <div style="background-color: #f8fafc; padding: 30px; text-align: center; font-size: 12px; color: #94a3b8;">
      You received this email because you signed up for the PLUG waitlist.
    </div>
  </div>
</body>
</html>
"#
        )
    }

    pub fn text(&self) -> String {
        format!(
            "Hi {name}!

You're officially on the PLUG waitlist! We're excited to have you.

Confirm your email: {confirm_link}

YOUR REFERRAL CODE: {code}

Share this link to earn rewards:
{referral_link}

Referral Rewards:
- 3 referrals: Unlock booking credit
- 5 referrals: Get premium badge
- 10 referrals: VIP status
- Top referrer: Win £1,500!

We're launching in February 2026. You'll be among the first to know!

See you soon on PLUG!
The PLUG Team

---
You received this email because you signed up for the PLUG waitlist.
",
            name = self.first_name,
            confirm_link = self.confirm_link,
            code = self.referral_code,
            referral_link = self.referral_link,
        )
    }

    /// Assemble the full send request.
    pub fn to_message(&self, from: &str, to: &str) -> EmailMessage {
        EmailMessage {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: self.subject(),
            html: self.html(),
            text: Some(self.text()),
        }
    }
}

/// Minimal HTML escaping for user-supplied values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(kind: EmailKind, first_name: &str) -> ConfirmationEmail<'_> {
        ConfirmationEmail {
            kind,
            first_name,
            user_type: Some(UserType::Provider),
            referral_code: "ADA12345",
            referral_link: "https://plugservices.ng?ref=ADA12345",
            confirm_link: "https://plugservices.ng/confirm?code=ADA12345",
        }
    }

    #[test]
    fn test_subjects() {
        assert_eq!(email(EmailKind::Welcome, "Ada").subject(), "Welcome to PLUG, Ada!");
        assert_eq!(
            email(EmailKind::Reminder, "Ada").subject(),
            "Confirm your PLUG waitlist spot, Ada"
        );
    }

    #[test]
    fn test_bodies_carry_links_and_code() {
        let e = email(EmailKind::Welcome, "Ada");
        let html = e.html();
        let text = e.text();
        for body in [&html, &text] {
            assert!(body.contains("https://plugservices.ng/confirm?code=ADA12345"));
            assert!(body.contains("https://plugservices.ng?ref=ADA12345"));
            assert!(body.contains("ADA12345"));
        }
        assert!(html.contains("service provider"));
    }

    #[test]
    fn test_name_is_escaped_in_html() {
        let html = email(EmailKind::Welcome, "<script>").html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_to_message() {
        let msg = email(EmailKind::Reminder, "Ada").to_message(DEFAULT_FROM, "ada@x.com");
        assert_eq!(msg.to, vec!["ada@x.com".to_string()]);
        assert_eq!(msg.from, DEFAULT_FROM);
        assert!(msg.text.is_some());
        assert!(msg.validate().is_ok());
    }

    #[test]
    fn test_missing_role_falls_back() {
        let mut e = email(EmailKind::Welcome, "Ada");
        e.user_type = None;
        assert!(e.html().contains("<strong>member</strong>"));
    }
}
