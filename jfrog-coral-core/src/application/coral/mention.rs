use crate::types::Mention;
use serde_json::Value;

/// Concatenated text blocks of a `wait_for_mentions` result.
pub fn mention_text(result: &Value) -> String {
    result
        .get("content")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mentions carried by a `wait_for_mentions` result. Coral answers either
/// with JSON (`{"messages":[...]}` or a bare array) or with XML-like
/// elements such as `<ResolvedMessage threadId="..." senderId="..." content="..."/>`.
/// A timeout without messages yields an empty list.
pub fn parse_mentions(result: &Value) -> Vec<Mention> {
    let text = mention_text(result);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => from_json(&value),
        Err(_) => from_elements(trimmed),
    }
}

fn from_json(value: &Value) -> Vec<Mention> {
    match value {
        Value::Array(items) => items.iter().filter_map(mention_from_object).collect(),
        Value::Object(map) => match map.get("messages") {
            Some(messages) => from_json(messages),
            None => mention_from_object(value).into_iter().collect(),
        },
        _ => Vec::new(),
    }
}

fn mention_from_object(value: &Value) -> Option<Mention> {
    let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
    Some(Mention {
        thread_id: field("threadId")?,
        sender_id: field("senderId")?,
        content: field("content").unwrap_or_default(),
    })
}

fn from_elements(text: &str) -> Vec<Mention> {
    let mut mentions = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let tail = &rest[start + 1..];
        let Some(end) = element_end(tail) else {
            break;
        };
        let element = &tail[..end];
        rest = &tail[end + 1..];

        let attribute = |name: &str| attribute_value(element, name);
        if let (Some(thread_id), Some(sender_id)) = (attribute("threadId"), attribute("senderId")) {
            mentions.push(Mention {
                thread_id,
                sender_id,
                content: attribute("content").unwrap_or_default(),
            });
        }
    }
    mentions
}

/// Index of the `>` closing an element, skipping any inside quoted values.
fn element_end(tail: &str) -> Option<usize> {
    let mut quote = None;
    for (index, ch) in tail.char_indices() {
        match (quote, ch) {
            (None, '"' | '\'') => quote = Some(ch),
            (Some(open), _) if ch == open => quote = None,
            (None, '>') => return Some(index),
            _ => {}
        }
    }
    None
}

fn attribute_value(element: &str, name: &str) -> Option<String> {
    let mut search = element;
    loop {
        let found = search.find(name)?;
        let preceded_by_space = search[..found]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        let after = search[found + name.len()..].trim_start();
        if preceded_by_space {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next().filter(|ch| *ch == '"' || *ch == '\'')?;
                let body = &value[1..];
                let close = body.find(quote)?;
                return Some(unescape(&body[..close]));
            }
        }
        search = &search[found + name.len()..];
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#10;", "\n")
        .replace("&amp;", "&")
}
