// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// INTERPOLAÇÃO DE TEMPLATES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Placeholders no formato `{nome}`
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"));

/// Entradas disponíveis para substituição
pub type TemplateInputs<'a> = HashMap<&'a str, &'a str>;

/// Substitui `{nome}` pelos valores de `inputs`.
///
/// Placeholders sem valor correspondente ficam intactos, assim um `{x}`
/// literal no texto nunca causa erro.
///
/// ```rust,ignore
/// let mut inputs = TemplateInputs::new();
/// inputs.insert("topic", "Rust");
/// assert_eq!(interpolate("Post sobre {topic}", &inputs), "Post sobre Rust");
/// ```
pub fn interpolate(template: &str, inputs: &TemplateInputs<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match inputs.get(&caps[1]) {
            Some(value) => (*value).to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Lista os nomes de placeholders presentes no template
pub fn placeholders(template: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}
