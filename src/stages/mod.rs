// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTÁGIOS DO PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Cada estágio é um registro imutável (role, goal, backstory, tarefa) com
// templates parametrizados por `{topic}`. O conjunto é fechado: Planner,
// Writer e Editor, nessa ordem.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod definitions;
pub mod template;

pub use definitions::{editor, planner, writer};
pub use template::{interpolate, placeholders, TemplateInputs};

use crate::types::{StageKind, Topic};

/// Definição estática de um estágio
///
/// Os campos de texto são templates; use [`StageDefinition::render`] para
/// obter a versão com o tópico substituído.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDefinition {
    /// Qual dos três estágios
    pub kind: StageKind,
    /// Papel do agente ("Content Planner", ...)
    pub role: String,
    /// Objetivo pessoal do agente
    pub goal: String,
    /// Persona / contexto do agente
    pub backstory: String,
    /// Descrição da tarefa
    pub description: String,
    /// Critério do resultado esperado
    pub expected_output: String,
}

/// Estágio com todos os templates já interpolados
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStage {
    pub kind: StageKind,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub description: String,
    pub expected_output: String,
}

impl StageDefinition {
    /// Substitui `{topic}` em todos os campos
    pub fn render(&self, topic: &Topic) -> RenderedStage {
        let mut inputs = TemplateInputs::new();
        inputs.insert("topic", topic.as_str());

        RenderedStage {
            kind: self.kind,
            role: interpolate(&self.role, &inputs),
            goal: interpolate(&self.goal, &inputs),
            backstory: interpolate(&self.backstory, &inputs),
            description: interpolate(&self.description, &inputs),
            expected_output: interpolate(&self.expected_output, &inputs),
        }
    }
}

/// Conjunto fixo dos três estágios
///
/// Construído no entry point (ou injetado em testes) em vez de viver
/// como estado global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewBlueprint {
    /// Estágio 1
    pub planner: StageDefinition,
    /// Estágio 2
    pub writer: StageDefinition,
    /// Estágio 3
    pub editor: StageDefinition,
}

impl Default for CrewBlueprint {
    fn default() -> Self {
        Self {
            planner: planner(),
            writer: writer(),
            editor: editor(),
        }
    }
}

impl CrewBlueprint {
    /// Retorna a definição de um estágio
    pub fn stage(&self, kind: StageKind) -> &StageDefinition {
        match kind {
            StageKind::Planner => &self.planner,
            StageKind::Writer => &self.writer,
            StageKind::Editor => &self.editor,
        }
    }

    /// Itera os estágios na ordem de execução
    pub fn iter(&self) -> impl Iterator<Item = &StageDefinition> {
        StageKind::ALL.into_iter().map(move |kind| self.stage(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_topic() {
        let topic = Topic::parse("Electric cars").unwrap();
        let rendered = planner().render(&topic);

        assert_eq!(rendered.role, "Content Planner");
        assert_eq!(
            rendered.goal,
            "Plan engaging and factually accurate content on Electric cars"
        );
        assert!(rendered.backstory.contains("about the topic: Electric cars."));
        assert!(!rendered.description.contains("{topic}"));
    }

    #[test]
    fn test_blueprint_order() {
        let blueprint = CrewBlueprint::default();
        let roles: Vec<&str> = blueprint.iter().map(|s| s.role.as_str()).collect();
        assert_eq!(roles, vec!["Content Planner", "Content Writer", "Editor"]);
    }

    #[test]
    fn test_blueprint_lookup() {
        let blueprint = CrewBlueprint::default();
        assert_eq!(blueprint.stage(StageKind::Editor).role, "Editor");
    }

    #[test]
    fn test_render_does_not_mutate_definition() {
        let writer = writer();
        let before = writer.clone();
        let _ = writer.render(&Topic::parse("Rust").unwrap());
        assert_eq!(writer, before);
    }
}
