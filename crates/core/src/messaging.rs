//! WhatsApp deep links.
//!
//! Inquiries leave the site as a `wa.me` link addressed to the business
//! number with the message pre-filled.

use url::Url;

use crate::types::PhoneNumber;

/// Base URL of the WhatsApp click-to-chat service.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// The business WhatsApp number.
pub const BUSINESS_PHONE: &str = "+919548114154";

/// Build a click-to-chat link: `https://wa.me/<phone>?text=<encoded message>`.
///
/// The message is percent-encoded in full, so spaces become `%20` and
/// reserved characters such as `&`, `?` and `#` cannot leak into the query.
///
/// # Errors
///
/// Returns a parse error only if the assembled link is not a valid URL.
///
/// # Example
///
/// ```
/// use balaji_core::PhoneNumber;
/// use balaji_core::messaging::whatsapp_link;
///
/// let phone = PhoneNumber::parse("+919548114154").unwrap();
/// let link = whatsapp_link(&phone, "Gate A & Gate B").unwrap();
/// assert_eq!(
///     link.as_str(),
///     "https://wa.me/+919548114154?text=Gate%20A%20%26%20Gate%20B"
/// );
/// ```
pub fn whatsapp_link(phone: &PhoneNumber, message: &str) -> Result<Url, url::ParseError> {
    let encoded = urlencoding::encode(message);
    Url::parse(&format!("{WHATSAPP_BASE_URL}/{phone}?text={encoded}"))
}
