use crate::models::Seller;
use url::Url;

pub const MISSING_PHONE_WARNING: &str =
    "This seller hasn't shared a phone number yet. Please use the enquiry form instead.";
pub const INVALID_PHONE_WARNING: &str =
    "This seller's phone number looks incomplete. Please use the enquiry form instead.";

/// Ghana country calling code, applied to numbers in local 0XX format
const LOCAL_COUNTRY_CODE: &str = "233";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactAction {
    Call,
    WhatsApp,
}

impl ContactAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContactAction::Call => "Call",
            ContactAction::WhatsApp => "WhatsApp",
        }
    }

    pub fn css_modifier(&self) -> &'static str {
        match self {
            ContactAction::Call => "call",
            ContactAction::WhatsApp => "whatsapp",
        }
    }
}

/// Result of pressing a contact button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Open this `tel:` or `wa.me` link
    Open(String),
    /// Show this message; no link is opened
    Warning(String),
}

/// International digits without the leading `+`, or None when the number
/// cannot be dialled.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let international = if trimmed.starts_with('+') {
        digits
    } else if let Some(rest) = digits.strip_prefix("00") {
        rest.to_string()
    } else if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", LOCAL_COUNTRY_CODE, rest)
    } else {
        digits
    };

    (9..=15).contains(&international.len()).then_some(international)
}

pub fn contact(seller: &Seller, action: ContactAction, listing_title: &str) -> ContactOutcome {
    if seller.phone.trim().is_empty() {
        return ContactOutcome::Warning(MISSING_PHONE_WARNING.to_string());
    }
    let Some(number) = normalize_phone(&seller.phone) else {
        return ContactOutcome::Warning(INVALID_PHONE_WARNING.to_string());
    };

    match action {
        ContactAction::Call => ContactOutcome::Open(format!("tel:+{}", number)),
        ContactAction::WhatsApp => {
            let greeting = if seller.name.trim().is_empty() {
                "Hi".to_string()
            } else {
                format!("Hi {}", seller.name.trim())
            };
            let message = format!("{}, I'm interested in your listing: {}", greeting, listing_title);
            match Url::parse_with_params(&format!("https://wa.me/{}", number), &[("text", message)]) {
                Ok(url) => ContactOutcome::Open(url.into()),
                Err(_) => ContactOutcome::Warning(INVALID_PHONE_WARNING.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seller(phone: &str) -> Seller {
        Seller {
            id: "s-1".to_string(),
            name: "Kofi Boateng".to_string(),
            phone: phone.to_string(),
            verified: true,
        }
    }

    #[test]
    fn empty_phone_warns_for_both_actions() {
        for action in [ContactAction::Call, ContactAction::WhatsApp] {
            match contact(&seller(""), action, "Villa") {
                ContactOutcome::Warning(message) => {
                    assert!(!message.contains("tel:"));
                    assert!(!message.contains("wa.me"));
                }
                other => panic!("expected warning, got {:?}", other),
            }
        }
        assert!(matches!(
            contact(&seller("   "), ContactAction::Call, "Villa"),
            ContactOutcome::Warning(_)
        ));
    }

    #[test]
    fn local_numbers_get_country_code() {
        assert_eq!(normalize_phone("024 123 4567").as_deref(), Some("233241234567"));
        assert_eq!(normalize_phone("+44 20 7946 0958").as_deref(), Some("442079460958"));
        assert_eq!(normalize_phone("0044 20 7946 0958").as_deref(), Some("442079460958"));
        assert_eq!(normalize_phone("12-34"), None);
    }

    #[test]
    fn call_opens_tel_link() {
        assert_eq!(
            contact(&seller("(024) 123-4567"), ContactAction::Call, "Villa"),
            ContactOutcome::Open("tel:+233241234567".to_string())
        );
    }

    #[test]
    fn whatsapp_link_carries_message() {
        let ContactOutcome::Open(link) = contact(&seller("0241234567"), ContactAction::WhatsApp, "3 bed house")
        else {
            panic!("expected link");
        };
        assert!(link.starts_with("https://wa.me/233241234567?text="));
        let url = Url::parse(&link).unwrap();
        let text = url.query_pairs().find(|(k, _)| k == "text").unwrap().1.into_owned();
        assert_eq!(text, "Hi Kofi Boateng, I'm interested in your listing: 3 bed house");
    }

    #[test]
    fn short_number_warns() {
        assert_eq!(
            contact(&seller("12-34"), ContactAction::WhatsApp, "Villa"),
            ContactOutcome::Warning(INVALID_PHONE_WARNING.to_string())
        );
    }
}
