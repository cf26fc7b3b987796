//! Prompt Renderer (spec.md §4.3).
//!
//! Grounded on `lingominer/flow/algo.py`'s `render_prompt`: placeholder
//! substitution is a flat, non-recursive `{{name}}` replacement (no
//! template-language escaping or control flow), and the `completion`
//! method wraps the rendered instruction in a fixed "Instruction /
//! Output Format / Output" envelope that describes the JSON schema the
//! model must answer with.

use cardflow_core::{FieldKind, FieldValue, FlowError};
use std::collections::HashMap;

/// One declared output of a generation, as far as the renderer cares:
/// just enough to describe the expected JSON schema key.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// The output field's name — the JSON key the model must produce.
    pub name: String,
    /// The output field's kind.
    pub kind: FieldKind,
    /// Human description, shown to the model as the field's purpose.
    pub description: String,
}

/// Replace every `{{name}}` placeholder in `prompt` with the textual
/// value of the correspondingly named input. A placeholder with no
/// matching input is a fatal render error (spec.md §4.3) — the template
/// editor only guarantees placeholders resolve against a generation's
/// declared inputs *and* the run's seeds, and seeds aren't known to this
/// function, so the check still has to happen here at render time.
pub fn render_plain(prompt: &str, inputs: &HashMap<String, FieldValue>) -> Result<String, FlowError> {
    let mut out = String::with_capacity(prompt.len());
    let mut rest = prompt;
    loop {
        match rest.find("{{") {
            None => {
                out.push_str(rest);
                break;
            }
            Some(start) => {
                out.push_str(&rest[..start]);
                let after_open = &rest[start + 2..];
                match after_open.find("}}") {
                    None => {
                        out.push_str("{{");
                        out.push_str(after_open);
                        break;
                    }
                    Some(end) => {
                        let name = &after_open[..end];
                        match inputs.get(name) {
                            Some(value) => out.push_str(&value.value),
                            None => {
                                return Err(FlowError::Render(format!(
                                    "prompt references unresolved placeholder `{{{{{name}}}}}`"
                                )))
                            }
                        }
                        rest = &after_open[end + 2..];
                    }
                }
            }
        }
    }
    Ok(out)
}

/// Render the full `completion` prompt: the rendered instruction plus a
/// fixed schema envelope describing the JSON object the model must
/// answer with, one field per declared output.
pub fn render_completion_prompt(
    prompt: &str,
    inputs: &HashMap<String, FieldValue>,
    outputs: &[OutputSpec],
) -> Result<String, FlowError> {
    let instruction = render_plain(prompt, inputs)?;
    let fields_description = outputs
        .iter()
        .map(|f| format!("- `{}`: {}", f.name, f.description))
        .collect::<Vec<_>>()
        .join("\n");
    let final_prompt = format!(
        "# Instruction\n{instruction}\n\n\
         # Output Format\n\
         Your task is to generate a JSON object that adheres to the following schema:\n\n\
         The schema is defined as follows:\n\
         {fields_description}\n\n\
         Please ensure the output JSON strictly follows this schema. Do not include extra fields.\n\n\
         # Output"
    );
    tracing::debug!(prompt = %final_prompt, "rendered completion prompt");
    Ok(final_prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> HashMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::text(*v)))
            .collect()
    }

    #[test]
    fn render_plain_substitutes_known_placeholders() {
        let rendered = render_plain(
            "Explain {{word}} found in {{paragraph}}",
            &inputs(&[("word", "Titan"), ("paragraph", "The Titan moon...")]),
        )
        .unwrap();
        assert_eq!(rendered, "Explain Titan found in The Titan moon...");
    }

    #[test]
    fn render_plain_fails_on_unresolved_placeholder() {
        let err = render_plain("Hello {{missing}}", &inputs(&[])).unwrap_err();
        assert!(matches!(err, FlowError::Render(_)));
    }

    #[test]
    fn render_completion_prompt_embeds_schema() {
        let rendered = render_completion_prompt(
            "Define {{word}}",
            &inputs(&[("word", "Titan")]),
            &[OutputSpec {
                name: "definition".to_string(),
                kind: FieldKind::Text,
                description: "a short definition".to_string(),
            }],
        )
        .unwrap();
        assert!(rendered.contains("Define Titan"));
        assert!(rendered.contains("`definition`: a short definition"));
        assert!(rendered.contains("# Output Format"));
    }

    #[test]
    fn render_completion_prompt_fails_on_unresolved_placeholder() {
        let err = render_completion_prompt(
            "Define {{missing}}",
            &inputs(&[]),
            &[OutputSpec {
                name: "definition".to_string(),
                kind: FieldKind::Text,
                description: "d".to_string(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::Render(_)));
    }
}
