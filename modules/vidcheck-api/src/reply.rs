//! Chat replies: fixed messages and the formatting of a finished run.

use vidcheck_common::{ConfidenceTier, RunRecord};
use vidcheck_core::link;

/// WhatsApp rejects longer bodies.
pub const MAX_REPLY_CHARS: usize = 1500;

const WELCOME_MESSAGE: &str = "Hi! I'm here to help you check if videos are trustworthy.\n\n\
Just send me a YouTube or TikTok link, and I'll:\n\
1. Check what the video claims\n\
2. Look for fact-checks from trusted sources\n\
3. Give you a clear, sourced explanation\n\n\
Try sending a link now!";

pub const NO_URL_MESSAGE: &str = "I didn't see a video link in your message.\n\n\
Send me a YouTube or TikTok URL and I'll research it for you.";

pub const PROCESSING_MESSAGE: &str = "Got it! I'm researching this video now.\n\n\
I'll check:\n\
- What the video claims\n\
- The creator's content history\n\
- Fact-check databases\n\
- Trusted news sources\n\n\
Give me a moment...";

pub const UNSUPPORTED_MESSAGE: &str = "I can only check YouTube and TikTok videos right now.\n\n\
Send me a link from one of those platforms and I'll help!";

pub const ERROR_MESSAGE: &str =
    "Sorry, I had trouble analyzing that video. Please try again, or try a different link.";

const GREETINGS: &[&str] = &["hi", "hello", "hey", "start", "help"];

/// What an inbound chat message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Empty,
    Greeting,
    NoLink,
    Unsupported,
    Analyze(String),
}

impl Inbound {
    pub fn kind(&self) -> &'static str {
        match self {
            Inbound::Empty => "empty",
            Inbound::Greeting => "greeting",
            Inbound::NoLink => "no_link",
            Inbound::Unsupported => "unsupported",
            Inbound::Analyze(_) => "analyze",
        }
    }
}

pub fn classify(body: &str) -> Inbound {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Inbound::Empty;
    }
    if GREETINGS.contains(&trimmed.to_lowercase().as_str()) {
        return Inbound::Greeting;
    }
    match link::extract_url_from_message(trimmed) {
        None => Inbound::NoLink,
        Some(url) if !link::resolve(&url).is_supported() => Inbound::Unsupported,
        Some(url) => Inbound::Analyze(url),
    }
}

pub fn welcome(dashboard_url: Option<&str>) -> String {
    match dashboard_url {
        Some(url) => format!("{WELCOME_MESSAGE}\n\nSee all checked videos: {url}"),
        None => WELCOME_MESSAGE.to_string(),
    }
}

/// Explanation plus confidence footer and creator note, cut to fit one message.
pub fn format_reply(record: &RunRecord) -> String {
    let footer = match record.confidence {
        ConfidenceTier::High => "[Confidence: High - formal fact-check found]",
        ConfidenceTier::Medium => "[Confidence: Medium - trusted news coverage found]",
        ConfidenceTier::Low => "[Confidence: Low - limited information available]",
    };
    let mut reply = format!("{}\n\n{footer}", record.explanation.trim());
    if record.channel_is_suspect {
        reply.push_str("\n[Note: This creator frequently posts alarmist content]");
    }
    truncate_reply(reply)
}

fn truncate_reply(reply: String) -> String {
    if reply.chars().count() <= MAX_REPLY_CHARS {
        return reply;
    }
    let mut cut: String = reply.chars().take(MAX_REPLY_CHARS - 3).collect();
    cut.push_str("...");
    cut
}
