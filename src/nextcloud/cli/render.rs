//! # Rendering Module
//!
//! Turns `CmdResult` pieces into terminal text. Every `render_*` function
//! returns a `String` so output can be tested without a terminal; the
//! `print_*` wrappers write to stdout with automatic color detection.

use colored::Colorize;
use nextcloud::commands::{CmdMessage, MessageLevel};
use nextcloud::error::Result;
use nextcloud::model::ShareResult;

fn use_color() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

fn style(content: &str, level: MessageLevel, color: bool) -> String {
    if !color {
        return content.to_string();
    }
    match level {
        MessageLevel::Info => content.dimmed().to_string(),
        MessageLevel::Success => content.green().to_string(),
        MessageLevel::Warning => content.yellow().to_string(),
        MessageLevel::Error => content.red().to_string(),
    }
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    render_messages_internal(messages, use_color())
}

fn render_messages_internal(messages: &[CmdMessage], color: bool) -> String {
    messages
        .iter()
        .map(|m| format!("{}\n", style(&m.content, m.level, color)))
        .collect()
}

pub fn print_messages(messages: &[CmdMessage]) {
    let output = render_messages(messages);
    if !output.is_empty() {
        print!("{}", output);
    }
}

/// A created share: the public link, or the id when there is none.
pub fn render_created_share(share: &ShareResult, json: bool) -> Result<String> {
    if json {
        return render_json(share);
    }
    if share.url.is_empty() {
        Ok(format!("{}\n", share.id))
    } else {
        Ok(format!("{}\n", share.url))
    }
}

/// One `id<TAB>url` line per listed share.
pub fn render_share_list(share: &ShareResult, json: bool) -> Result<String> {
    if json {
        return render_json(share);
    }
    Ok(share
        .elements
        .iter()
        .map(|e| format!("{}\t{}\n", e.id, e.url))
        .collect())
}

fn render_json(share: &ShareResult) -> Result<String> {
    let mut out = serde_json::to_string_pretty(share)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextcloud::model::ShareElement;

    fn share(id: u64, url: &str) -> ShareResult {
        ShareResult {
            status: "ok".into(),
            status_code: 200,
            message: "OK".into(),
            id,
            url: url.into(),
            elements: Vec::new(),
        }
    }

    #[test]
    fn test_render_messages_empty() {
        assert!(render_messages_internal(&[], false).is_empty());
    }

    #[test]
    fn test_render_messages_plain() {
        let messages = vec![
            CmdMessage::info("Uploading a.txt"),
            CmdMessage::error("Upload failed a.txt"),
        ];
        let output = render_messages_internal(&messages, false);
        assert_eq!(output, "Uploading a.txt\nUpload failed a.txt\n");
    }

    #[test]
    fn test_render_messages_with_color_includes_ansi() {
        colored::control::set_override(true);
        let output = render_messages_internal(&[CmdMessage::success("done")], true);
        colored::control::unset_override();
        assert!(output.contains("\u{1b}["));
        assert!(output.contains("done"));
    }

    #[test]
    fn test_created_share_prints_url() {
        let output = render_created_share(&share(7, "https://cloud.example.com/s/abc"), false).unwrap();
        assert_eq!(output, "https://cloud.example.com/s/abc\n");
    }

    #[test]
    fn test_created_share_without_url_prints_id() {
        let output = render_created_share(&share(7, ""), false).unwrap();
        assert_eq!(output, "7\n");
    }

    #[test]
    fn test_share_list_lines() {
        let mut listed = share(0, "");
        listed.elements = vec![
            ShareElement {
                id: 1,
                url: "https://cloud.example.com/s/one".into(),
            },
            ShareElement {
                id: 2,
                url: "https://cloud.example.com/s/two".into(),
            },
        ];
        let output = render_share_list(&listed, false).unwrap();
        assert_eq!(
            output,
            "1\thttps://cloud.example.com/s/one\n2\thttps://cloud.example.com/s/two\n"
        );
    }

    #[test]
    fn test_share_json() {
        let output = render_created_share(&share(7, "https://cloud.example.com/s/abc"), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["status_code"], 200);
        assert_eq!(value["url"], "https://cloud.example.com/s/abc");
        assert!(value["elements"].as_array().unwrap().is_empty());
    }
}
