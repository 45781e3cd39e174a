//! TwiML rendering for synchronous webhook replies.

/// `<Response><Message>..</Message></Response>` for a single text reply.
pub fn messaging_response(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(body)
    )
}

/// Empty response: acknowledges the webhook without replying.
pub fn empty_response() -> String {
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>".to_string()
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_body_is_escaped() {
        let xml = messaging_response("Rated <False> by A&B");
        assert!(xml.contains("<Message>Rated &lt;False&gt; by A&amp;B</Message>"));
        assert!(xml.starts_with("<?xml"));
    }

    #[test]
    fn empty_response_has_no_message() {
        assert!(!empty_response().contains("<Message>"));
    }
}
