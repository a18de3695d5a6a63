// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTADOS DO CREW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::Serialize;

use crate::types::StageKind;

/// Estado de uma execução - sequência linear
///
/// `Idle → Planning → Writing → Editing → Done`, com saída para `Failed`
/// a partir de qualquer estágio em andamento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewState {
    /// Nada rodou ainda
    Idle,
    /// Planner em execução
    Planning,
    /// Writer em execução
    Writing,
    /// Editor em execução
    Editing,
    /// Resultado final disponível
    Done,
    /// Um estágio falhou (ou o tópico era inválido)
    Failed,
}

impl CrewState {
    /// Estado em que um estágio roda
    pub fn running(stage: StageKind) -> Self {
        match stage {
            StageKind::Planner => Self::Planning,
            StageKind::Writer => Self::Writing,
            StageKind::Editor => Self::Editing,
        }
    }

    /// Verifica se uma transição é válida
    pub fn can_transition_to(&self, target: CrewState) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Planning)
                | (Self::Idle, Self::Failed)
                | (Self::Planning, Self::Writing)
                | (Self::Writing, Self::Editing)
                | (Self::Editing, Self::Done)
                | (Self::Planning, Self::Failed)
                | (Self::Writing, Self::Failed)
                | (Self::Editing, Self::Failed)
        )
    }
}
