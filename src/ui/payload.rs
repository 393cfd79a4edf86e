//! JSON shapes of the messaging platform's message content.

use super::texts::Lang;
use serde_json::{Map, Value, json};

/// One string per language, with the default language listed first.
pub type I18n = Vec<(Lang, String)>;

fn default_of(texts: &I18n, lang: Lang) -> String {
    texts
        .iter()
        .find(|(l, _)| *l == lang)
        .or_else(|| texts.first())
        .map(|(_, t)| t.clone())
        .unwrap_or_default()
}

fn i18n_array(texts: &I18n, field: &str) -> Value {
    Value::Array(
        texts
            .iter()
            .map(|(l, t)| {
                let mut m = Map::new();
                m.insert("language".into(), json!(l.locale()));
                m.insert(field.into(), json!(t));
                Value::Object(m)
            })
            .collect(),
    )
}

pub fn text(texts: &I18n, lang: Lang) -> Value {
    json!({
        "type": "text",
        "text": default_of(texts, lang),
        "i18nTexts": i18n_array(texts, "text"),
    })
}

/// Action that posts `data` back without showing a message.
pub fn postback_action(data: &str, label: &I18n, lang: Lang) -> Value {
    json!({
        "type": "postback",
        "data": data,
        "label": default_of(label, lang),
        "i18nLabels": i18n_array(label, "label"),
        "displayText": default_of(label, lang),
        "i18nDisplayTexts": i18n_array(label, "displayText"),
    })
}

/// Action that sends the label as a user message carrying `postback`.
pub fn message_action(postback: &str, label: &I18n, lang: Lang) -> Value {
    json!({
        "type": "message",
        "postback": postback,
        "label": default_of(label, lang),
        "i18nLabels": i18n_array(label, "label"),
        "text": default_of(label, lang),
        "i18nTexts": i18n_array(label, "text"),
    })
}

pub fn button_template(content: &I18n, actions: Vec<Value>, lang: Lang) -> Value {
    json!({
        "type": "button_template",
        "contentText": default_of(content, lang),
        "i18nContentTexts": i18n_array(content, "contentText"),
        "actions": actions,
    })
}

/// Attach quick-reply buttons to a message.
pub fn with_quick_reply(mut message: Value, actions: Vec<Value>) -> Value {
    let items: Vec<Value> = actions.into_iter().map(|a| json!({ "action": a })).collect();
    if let Value::Object(m) = &mut message {
        m.insert("quickReply".into(), json!({ "items": items }));
    }
    message
}

pub fn image_carousel(columns: Vec<(String, Value)>) -> Value {
    let columns: Vec<Value> = columns
        .into_iter()
        .map(|(url, action)| json!({ "imageUrl": url, "action": action }))
        .collect();
    json!({ "type": "image_carousel", "columns": columns })
}

pub fn rich_menu_area(x: u32, y: u32, width: u32, height: u32, action: Value) -> Value {
    json!({
        "bounds": { "x": x, "y": y, "width": width, "height": height },
        "action": action,
    })
}

pub fn rich_menu(name: &str, width: u32, height: u32, areas: Vec<Value>) -> Value {
    json!({
        "name": name,
        "size": { "width": width, "height": height },
        "areas": areas,
    })
}
