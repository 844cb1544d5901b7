// Shared prompt fragments and prompt-building utilities.
// Each module that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appends the JSON-only contract to a role-specific system prompt.
pub fn json_system(role_prompt: &str) -> String {
    format!("{}\n\n{}", role_prompt.trim_end(), JSON_ONLY_SYSTEM)
}

/// Fills `{name}` placeholders in a template in a single pass, so substituted
/// values are never rescanned. Unknown placeholders are left as-is.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Substitutes a placeholder value for missing optional job fields.
pub fn or_not_specified(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "Not specified",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_appends_contract() {
        let system = json_system("You are an interviewer.");
        assert!(system.starts_with("You are an interviewer."));
        assert!(system.ends_with(JSON_ONLY_SYSTEM));
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let out = fill("{title} / {title} at {dept}", &[("title", "SRE"), ("dept", "Ops")]);
        assert_eq!(out, "SRE / SRE at Ops");
    }

    #[test]
    fn test_fill_does_not_rescan_substituted_values() {
        let out = fill("Q: {question} A: {answer}", &[("question", "say {answer}"), ("answer", "ok")]);
        assert_eq!(out, "Q: say {answer} A: ok");
    }

    #[test]
    fn test_fill_leaves_json_braces_alone() {
        let out = fill("{\n  \"question\": \"{title}\"\n}", &[("title", "SRE")]);
        assert_eq!(out, "{\n  \"question\": \"SRE\"\n}");
    }

    #[test]
    fn test_or_not_specified() {
        assert_eq!(or_not_specified(None), "Not specified");
        assert_eq!(or_not_specified(Some("  ")), "Not specified");
        assert_eq!(or_not_specified(Some("Berlin")), "Berlin");
    }
}
