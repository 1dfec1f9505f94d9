//! Story body blocks.
//!
//! A story's body is an ordered list of tagged blocks. The `type` tag on the
//! wire selects the variant; unknown tags are rejected at deserialization.

use serde::{Deserialize, Serialize};

use crate::validate::{self, Issues};

/// One block of story content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph {
        text: String,
    },
    Heading {
        text: String,
        #[serde(default = "default_heading_level")]
        level: u8,
    },
    Image {
        url: String,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        alt: String,
    },
    Quote {
        text: String,
        #[serde(default)]
        source: String,
    },
}

fn default_heading_level() -> u8 {
    2
}

impl ContentBlock {
    /// Validate one block, recording failures under `content[i].<field>`.
    pub fn validate_into(&self, index: usize, issues: &mut Issues) {
        match self {
            ContentBlock::Paragraph { text } => {
                issues.check(&format!("content[{index}].text"), validate::required(text));
            }
            ContentBlock::Heading { text, level } => {
                issues.check(&format!("content[{index}].text"), validate::required(text));
                if !(1..=6).contains(level) {
                    issues.push(
                        &format!("content[{index}].level"),
                        "must be between 1 and 6",
                    );
                }
            }
            ContentBlock::Image { url, .. } => {
                issues.check(&format!("content[{index}].url"), validate::http_url(url));
            }
            ContentBlock::Quote { text, .. } => {
                issues.check(&format!("content[{index}].text"), validate::required(text));
            }
        }
    }
}

/// Validate a whole story body.
pub fn validate_blocks(blocks: &[ContentBlock], issues: &mut Issues) {
    for (index, block) in blocks.iter().enumerate() {
        block.validate_into(index, issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_variants() {
        let raw = serde_json::json!([
            {"type": "paragraph", "text": "Opening."},
            {"type": "heading", "text": "Act One", "level": 3},
            {"type": "image", "url": "https://x/y.jpg", "caption": "still"},
            {"type": "quote", "text": "Cut!", "source": "Director"}
        ]);
        let blocks: Vec<ContentBlock> = serde_json::from_value(raw).expect("valid blocks");
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[0],
            ContentBlock::Paragraph {
                text: "Opening.".to_string()
            }
        );
        match &blocks[1] {
            ContentBlock::Heading { level, .. } => assert_eq!(*level, 3),
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn heading_level_defaults_to_two() {
        let block: ContentBlock =
            serde_json::from_value(serde_json::json!({"type": "heading", "text": "T"}))
                .expect("valid heading");
        assert_eq!(
            block,
            ContentBlock::Heading {
                text: "T".to_string(),
                level: 2
            }
        );
    }

    #[test]
    fn rejects_unknown_block_type() {
        let result: Result<ContentBlock, _> =
            serde_json::from_value(serde_json::json!({"type": "video", "url": "https://x"}));
        assert!(result.is_err());
    }

    #[test]
    fn validation_reports_indexed_fields() {
        let blocks = vec![
            ContentBlock::Paragraph {
                text: String::new(),
            },
            ContentBlock::Image {
                url: "not-a-url".to_string(),
                caption: String::new(),
                alt: String::new(),
            },
        ];
        let mut issues = Issues::new();
        validate_blocks(&blocks, &mut issues);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|(f, _)| f == "content[0].text"));
        assert!(issues.iter().any(|(f, _)| f == "content[1].url"));
    }
}
