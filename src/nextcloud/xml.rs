//! # XML Decoding
//!
//! Nextcloud answers in two XML shapes this crate cares about:
//!
//! ```text
//! <ocs>                              <d:error xmlns:d="DAV:" xmlns:s="...">
//!   <meta>                             <s:exception>...</s:exception>
//!     <status/><statuscode/>           <s:message>...</s:message>
//!     <message/>                     </d:error>
//!   </meta>
//!   <data>
//!     <id/><url/>
//!     <element><id/><url/></element>*
//!   </data>
//! </ocs>
//! ```
//!
//! Both are read into a small element tree first and then picked apart by
//! local name, so namespace prefixes (`s:`, `d:`) never matter. Only the
//! first root element is read; anything after it is ignored.

use crate::error::{CloudError, Result};
use crate::model::{RequestError, ShareElement, ShareResult};
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child_text(&self, name: &str) -> &str {
        self.child(name).map(|c| c.text.as_str()).unwrap_or_default()
    }
}

fn parse_root(body: &[u8]) -> Result<Element> {
    let mut reader = Reader::from_reader(body);
    reader.expand_empty_elements(true);
    reader.check_end_names(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                stack.push(Element {
                    name,
                    ..Default::default()
                });
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CloudError::Decode("unexpected closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => {
                let reason = if stack.is_empty() {
                    "no root element"
                } else {
                    "unexpected end of document"
                };
                return Err(CloudError::Decode(reason.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn parse_uint(text: &str, field: &str) -> Result<u64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .map_err(|e| CloudError::Decode(format!("invalid {field} '{trimmed}': {e}")))
}

/// Decode an `<ocs>` envelope. The root element must be `ocs`.
pub fn decode_share_result(body: &[u8]) -> Result<ShareResult> {
    let root = parse_root(body)?;
    if root.name != "ocs" {
        return Err(CloudError::Decode(format!(
            "expected element <ocs> but have <{}>",
            root.name
        )));
    }

    let mut result = ShareResult::default();

    if let Some(meta) = root.child("meta") {
        result.status = meta.child_text("status").to_string();
        result.status_code = parse_uint(meta.child_text("statuscode"), "statuscode")?;
        result.message = meta.child_text("message").to_string();
    }

    if let Some(data) = root.child("data") {
        result.id = parse_uint(data.child_text("id"), "id")?;
        result.url = data.child_text("url").to_string();
        for element in data.children_named("element") {
            result.elements.push(ShareElement {
                id: parse_uint(element.child_text("id"), "element id")?,
                url: element.child_text("url").to_string(),
            });
        }
    }

    Ok(result)
}

/// Decode a WebDAV error body. Any root element is accepted; `exception`
/// and `message` are looked up among its direct children.
pub fn decode_request_error(body: &[u8]) -> Result<RequestError> {
    let root = parse_root(body)?;
    Ok(RequestError {
        exception: root.child_text("exception").to_string(),
        message: root.child_text("message").to_string(),
    })
}
