//! `{{variable}}` template rendering.
//!
//! Placeholders are `{{name}}` with optional whitespace inside the braces;
//! names are word characters (Unicode letters, digits and `_`), so
//! `{{都市}}` is a placeholder too. Rendering is a single pass, so a
//! substituted value is never scanned again. A placeholder without a
//! binding fails with [`PromptError::MissingVariable`]. Unused bindings are
//! ignored.

use promptrail_core::Message;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::PromptError;
use crate::template::{PromptBody, PromptTemplate};

/// Placeholder name → substitution value.
pub type VariableBinding = HashMap<String, String>;

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Build a binding from `(name, value)` pairs.
///
/// ```rust
/// use promptrail_prompts::bindings;
///
/// let vars = bindings([("city", "Tokyo")]);
/// assert_eq!(vars["city"], "Tokyo");
/// ```
pub fn bindings<I, K, V>(pairs: I) -> VariableBinding
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Substitute every placeholder of a single string.
///
/// ```rust
/// use promptrail_prompts::{bindings, compile_text};
///
/// let out = compile_text("{{ city }}の人口は？", &bindings([("city", "東京都")])).unwrap();
/// assert_eq!(out, "東京都の人口は？");
/// ```
pub fn compile_text(template: &str, vars: &VariableBinding) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in placeholder().captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = vars
            .get(name.as_str())
            .ok_or_else(|| PromptError::MissingVariable(name.as_str().to_string()))?;
        out.push_str(&template[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}

/// Render a template into concrete messages.
///
/// Chat templates keep their message order and roles. Text templates render
/// to a single user message.
pub fn render(template: &PromptTemplate, vars: &VariableBinding) -> Result<Vec<Message>, PromptError> {
    match &template.body {
        PromptBody::Chat(messages) => messages
            .iter()
            .map(|m| Ok(Message::new(m.role, compile_text(&m.content, vars)?)))
            .collect(),
        PromptBody::Text(text) => Ok(vec![Message::user(compile_text(text, vars)?)]),
    }
}

/// Distinct placeholder names of a template, in order of first appearance.
pub fn variables(template: &PromptTemplate) -> Vec<String> {
    let texts: Vec<&str> = match &template.body {
        PromptBody::Chat(messages) => messages.iter().map(|m| m.content.as_str()).collect(),
        PromptBody::Text(text) => vec![text.as_str()],
    };

    let mut names: Vec<String> = Vec::new();
    for text in texts {
        for caps in placeholder().captures_iter(text) {
            if let Some(name) = caps.get(1) {
                if !names.iter().any(|n| n == name.as_str()) {
                    names.push(name.as_str().to_string());
                }
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ChatMessageTemplate, PromptKind};
    use pretty_assertions::assert_eq;
    use promptrail_core::Role;
    use rstest::rstest;

    fn chat_template(messages: Vec<ChatMessageTemplate>) -> PromptTemplate {
        PromptTemplate {
            name: "t".into(),
            version: 1,
            kind: PromptKind::Chat,
            body: PromptBody::Chat(messages),
            config: serde_json::json!({"model": "m1", "temperature": 0.5}),
            labels: vec![],
            tags: vec![],
        }
    }

    #[rstest]
    #[case("{{name}}, hello", "Tokyo, hello")]
    #[case("{{ name }}, hello", "Tokyo, hello")]
    #[case("no placeholders", "no placeholders")]
    #[case("{{name}}{{name}}", "TokyoTokyo")]
    #[case("{single} braces stay", "{single} braces stay")]
    #[case("{{都市}}の人口は？", "東京都の人口は？")]
    #[case("{{ 都市 }}と{{name}}", "東京都とTokyo")]
    fn test_compile_text(#[case] template: &str, #[case] expected: &str) {
        let vars = bindings([("name", "Tokyo"), ("都市", "東京都")]);
        assert_eq!(compile_text(template, &vars).unwrap(), expected);
    }

    #[rstest]
    #[case("{{city}} population", "city")]
    #[case("{{都市}}の人口は？", "都市")]
    fn test_missing_variable_fails_deterministically(
        #[case] template: &str,
        #[case] missing: &str,
    ) {
        let vars = bindings([("other", "x")]);
        for _ in 0..3 {
            match compile_text(template, &vars) {
                Err(PromptError::MissingVariable(name)) => assert_eq!(name, missing),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let vars = bindings([("a", "{{b}}"), ("b", "nope")]);
        assert_eq!(compile_text("x {{a}} y", &vars).unwrap(), "x {{b}} y");
    }

    #[test]
    fn test_render_preserves_order_and_roles() {
        let template = chat_template(vec![
            ChatMessageTemplate::system("You answer questions about {{topic}}."),
            ChatMessageTemplate::user("Tell me about {{city}}."),
            ChatMessageTemplate::new(Role::Assistant, "Sure, {{city}}."),
        ]);
        let vars = bindings([("topic", "geography"), ("city", "Yokohama")]);

        let messages = render(&template, &vars).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(messages[1].content, "Tell me about Yokohama.");
        assert!(messages.iter().all(|m| !m.content.contains("{{")));
    }

    #[test]
    fn test_render_greet_scenario() {
        let template = chat_template(vec![ChatMessageTemplate::user("{{name}}, hello")]);
        let messages = render(&template, &bindings([("name", "Tokyo")])).unwrap();
        assert_eq!(messages, vec![Message::user("Tokyo, hello")]);
    }

    #[test]
    fn test_render_text_template() {
        let mut template = chat_template(vec![]);
        template.kind = PromptKind::Text;
        template.body = PromptBody::Text("Summarize {{doc}}".into());

        let messages = render(&template, &bindings([("doc", "the report")])).unwrap();
        assert_eq!(messages, vec![Message::user("Summarize the report")]);
    }

    #[test]
    fn test_render_missing_variable() {
        let template = chat_template(vec![ChatMessageTemplate::user("{{city}}の人口は？")]);
        let err = render(&template, &VariableBinding::new()).unwrap_err();
        assert!(matches!(err, PromptError::MissingVariable(ref v) if v == "city"));
    }

    #[test]
    fn test_variables_in_first_appearance_order() {
        let template = chat_template(vec![
            ChatMessageTemplate::system("{{b}} {{a}}"),
            ChatMessageTemplate::user("{{a}} {{ c }}"),
        ]);
        assert_eq!(variables(&template), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_variables_include_non_ascii_names() {
        let template = chat_template(vec![
            ChatMessageTemplate::system("{{役割}}として回答してください。"),
            ChatMessageTemplate::user("{{都市}}の人口は？ {{ 都市 }}"),
        ]);
        assert_eq!(variables(&template), vec!["役割", "都市"]);

        let messages = render(&template, &bindings([("役割", "統計家"), ("都市", "横浜")])).unwrap();
        assert_eq!(messages[1].content, "横浜の人口は？ 横浜");
        assert!(messages.iter().all(|m| !m.content.contains("{{")));
    }
}
