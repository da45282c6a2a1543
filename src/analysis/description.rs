// src/analysis/description.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub twitter: String,
    pub instagram: String,
    pub facebook: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            twitter: "https://twitter.com/our_channel".to_string(),
            instagram: "https://instagram.com/our_channel".to_string(),
            facebook: "https://facebook.com/our_channel".to_string(),
        }
    }
}

impl SocialLinks {
    fn block(&self) -> String {
        format!(
            "Follow us on social media:\n- Twitter: {}\n- Instagram: {}\n- Facebook: {}",
            self.twitter, self.instagram, self.facebook
        )
    }
}

/// Append the channel's social media block after a blank line. The
/// content itself is kept as written.
pub fn enhance_description(content: &str, links: &SocialLinks) -> String {
    if content.trim().is_empty() {
        return links.block();
    }
    format!("{}\n\n{}", content, links.block())
}
