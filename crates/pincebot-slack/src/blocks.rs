//! Block Kit rendering for answers.

use pincebot_assistant::Answer;
use serde_json::{json, Value};

pub const FEEDBACK_POSITIVE: &str = "feedback_pos";
pub const FEEDBACK_NEGATIVE: &str = "feedback_neg";

/// Notification text for clients that cannot render blocks.
pub const ANSWER_FALLBACK_TEXT: &str = "Answer found.";

pub fn render_answer(answer: &Answer) -> Vec<Value> {
    let mut blocks = vec![
        section(&format!("*Pincebot Response:*\n\n{}", answer.text)),
        json!({ "type": "divider" }),
    ];

    if !answer.links.is_empty() {
        let list = answer
            .links
            .iter()
            .map(|l| format!("• <{}|{}>", l.url, l.title))
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(section(&format!("*Related Documentation:*\n{list}")));
    }

    blocks.push(json!({
        "type": "actions",
        "elements": [
            button("👍 Useful", FEEDBACK_POSITIVE, "primary"),
            button("👎 Tag Support", FEEDBACK_NEGATIVE, "danger"),
        ]
    }));
    blocks
}

fn section(mrkdwn: &str) -> Value {
    json!({ "type": "section", "text": { "type": "mrkdwn", "text": mrkdwn } })
}

fn button(label: &str, action_id: &str, style: &str) -> Value {
    json!({
        "type": "button",
        "text": { "type": "plain_text", "text": label },
        "action_id": action_id,
        "style": style,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincebot_core::RelatedLink;

    #[test]
    fn answer_without_links() {
        let blocks = render_answer(&Answer {
            text: "Use *COPY*.".into(),
            links: vec![],
        });
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0]["text"]["text"], "*Pincebot Response:*\n\nUse *COPY*.");
        assert_eq!(blocks[1]["type"], "divider");
        assert_eq!(blocks[2]["type"], "actions");
    }

    #[test]
    fn links_and_buttons() {
        let blocks = render_answer(&Answer {
            text: "x".into(),
            links: vec![
                RelatedLink {
                    title: "Setup Guide".into(),
                    url: "https://docs.firebolt.io/setup".into(),
                },
                RelatedLink {
                    title: "COPY".into(),
                    url: "https://docs.firebolt.io/sql/copy".into(),
                },
            ],
        });
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[2]["text"]["text"],
            "*Related Documentation:*\n• <https://docs.firebolt.io/setup|Setup Guide>\n• <https://docs.firebolt.io/sql/copy|COPY>"
        );
        let buttons = blocks[3]["elements"].as_array().unwrap();
        assert_eq!(buttons[0]["action_id"], FEEDBACK_POSITIVE);
        assert_eq!(buttons[0]["style"], "primary");
        assert_eq!(buttons[0]["text"]["text"], "👍 Useful");
        assert_eq!(buttons[1]["action_id"], FEEDBACK_NEGATIVE);
        assert_eq!(buttons[1]["style"], "danger");
    }
}
