// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// COORDENADOR DO PIPELINE (CREW)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Executa Planner → Writer → Editor em sequência estrita. A saída de cada
// estágio vira contexto do próximo; a primeira falha aborta a execução
// inteira sem resultado parcial.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod state;

pub use state::CrewState;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::CrewConfig;
use crate::llm::{GenerationRequest, LlmClient, LlmError, StageContext};
use crate::stages::CrewBlueprint;
use crate::types::{StageKind, TokenUsage, Topic};
use crate::utils::{preview, word_count, ActionTimer, TimingStats, TokenTracker};

/// Erros do pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrewError {
    /// Tópico vazio: rejeitado antes de qualquer chamada ao LLM
    #[error("Please enter a topic.")]
    EmptyTopic,

    /// Um estágio falhou; os seguintes não rodaram
    #[error("{stage} stage failed: {source}")]
    StageFailed {
        /// Estágio que falhou
        stage: StageKind,
        /// Erro do provedor
        #[source]
        source: LlmError,
    },
}

impl CrewError {
    /// Erro corrigível pelo usuário (entrada inválida)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyTopic)
    }

    /// Estágio que falhou, se aplicável
    pub fn failed_stage(&self) -> Option<StageKind> {
        match self {
            Self::EmptyTopic => None,
            Self::StageFailed { stage, .. } => Some(*stage),
        }
    }
}

/// Eventos de progresso emitidos durante o kickoff
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrewProgress {
    /// Execução aceita, tópico válido
    Started {
        /// Id da execução
        run_id: Uuid,
        /// Tópico normalizado
        topic: String,
    },
    /// Estágio começou
    StageStarted {
        /// Estágio
        stage: StageKind,
        /// Papel do agente
        role: String,
    },
    /// Estágio terminou com sucesso
    StageCompleted {
        /// Estágio
        stage: StageKind,
        /// Duração
        elapsed_ms: u64,
        /// Palavras produzidas
        words: usize,
    },
    /// Estágio falhou; a execução termina aqui
    StageFailed {
        /// Estágio
        stage: StageKind,
        /// Mensagem do erro
        error: String,
    },
    /// Os três estágios terminaram
    Finished {
        /// Duração total
        total_ms: u64,
    },
}

/// Callback síncrono de progresso
pub type ProgressCallback = Arc<dyn Fn(CrewProgress) + Send + Sync>;

/// Saída de um estágio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageOutput {
    /// Estágio
    pub stage: StageKind,
    /// Papel do agente
    pub role: String,
    /// Texto bruto produzido
    pub raw: String,
    /// Duração da chamada
    pub elapsed_ms: u64,
    /// Tokens reportados pelo provedor
    pub usage: TokenUsage,
    /// Modelo que respondeu
    pub model: String,
}

/// Resultado de uma execução bem-sucedida
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    /// Id da execução (para correlacionar logs)
    pub run_id: Uuid,
    /// Tópico normalizado
    pub topic: String,
    /// Texto final (saída do Editor)
    pub raw: String,
    /// Saídas dos três estágios, em ordem
    pub stages: Vec<StageOutput>,
    /// Tokens somados de todos os estágios
    pub token_usage: TokenUsage,
    /// Duração total
    pub total_time_ms: u64,
    /// Momento da conclusão
    pub created_at: DateTime<Utc>,
}

impl CrewOutput {
    /// Saída de um estágio específico
    pub fn stage(&self, kind: StageKind) -> Option<&StageOutput> {
        self.stages.iter().find(|s| s.stage == kind)
    }
}

/// Estado mutável de uma única execução
///
/// Vive só dentro de `kickoff`; nada é compartilhado entre execuções.
struct CrewRun {
    run_id: Uuid,
    topic: Topic,
    state: CrewState,
    tokens: TokenTracker,
    timing: TimingStats,
    outputs: Vec<StageOutput>,
}

impl CrewRun {
    fn new(topic: Topic) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            topic,
            state: CrewState::Idle,
            tokens: TokenTracker::new(),
            timing: TimingStats::new(),
            outputs: Vec::with_capacity(3),
        }
    }

    fn transition(&mut self, target: CrewState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid transition {:?} -> {:?}",
            self.state,
            target
        );
        log::debug!("[{}] {:?} → {:?}", self.run_id, self.state, target);
        self.state = target;
    }

    fn last_output(&self) -> Option<&StageOutput> {
        self.outputs.last()
    }
}

/// Coordenador dos três estágios
///
/// # Exemplo
///
/// ```rust,ignore
/// let llm = content_crew::llm::build_client(&load_llm_config());
/// let crew = ContentCrew::new(llm);
/// let output = crew.kickoff("Rust for web backends").await?;
/// println!("{}", output.raw);
/// ```
pub struct ContentCrew {
    llm: Arc<dyn LlmClient>,
    blueprint: CrewBlueprint,
    config: CrewConfig,
    progress_callback: Option<ProgressCallback>,
}

impl ContentCrew {
    /// Cria o crew com os três estágios padrão
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            blueprint: CrewBlueprint::default(),
            config: CrewConfig::default(),
            progress_callback: None,
        }
    }

    /// Substitui as definições dos estágios
    pub fn with_blueprint(mut self, blueprint: CrewBlueprint) -> Self {
        self.blueprint = blueprint;
        self
    }

    /// Define a configuração (verbose)
    pub fn with_config(mut self, config: CrewConfig) -> Self {
        self.config = config;
        self
    }

    /// Registra callback de progresso
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Definições em uso
    pub fn blueprint(&self) -> &CrewBlueprint {
        &self.blueprint
    }

    fn emit(&self, event: CrewProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(event);
        }
    }

    /// Executa o pipeline completo para um tópico.
    ///
    /// - Tópico vazio → [`CrewError::EmptyTopic`] sem chamar o LLM
    /// - Falha em qualquer estágio → [`CrewError::StageFailed`], sem retry
    /// - Sucesso → saída do Editor em [`CrewOutput::raw`]
    pub async fn kickoff(&self, topic: &str) -> Result<CrewOutput, CrewError> {
        let topic = match Topic::parse(topic) {
            Some(topic) => topic,
            None => {
                log::warn!("✗ Tópico vazio, pipeline não iniciado");
                return Err(CrewError::EmptyTopic);
            }
        };

        let mut run = CrewRun::new(topic);
        let total_timer = ActionTimer::start("Crew kickoff");

        log::info!("🚀 [{}] Kickoff: \"{}\"", run.run_id, run.topic);
        self.emit(CrewProgress::Started {
            run_id: run.run_id,
            topic: run.topic.to_string(),
        });

        // Planner: só o tópico
        self.run_stage(&mut run, StageKind::Planner, true).await?;
        // Writer: tópico + plano
        self.run_stage(&mut run, StageKind::Writer, true).await?;
        // Editor: só o rascunho
        self.run_stage(&mut run, StageKind::Editor, false).await?;

        run.transition(CrewState::Done);
        let total_ms = total_timer.stop_and_log() as u64;
        log::info!("✓ [{}] {}", run.run_id, run.timing.summary());

        self.emit(CrewProgress::Finished { total_ms });

        let raw = run
            .last_output()
            .map(|o| o.raw.clone())
            .unwrap_or_default();

        Ok(CrewOutput {
            run_id: run.run_id,
            topic: run.topic.to_string(),
            raw,
            token_usage: run.tokens.get_total_usage(),
            stages: run.outputs,
            total_time_ms: total_ms,
            created_at: Utc::now(),
        })
    }

    /// Roda um estágio, usando a saída do estágio anterior como contexto
    async fn run_stage(
        &self,
        run: &mut CrewRun,
        stage: StageKind,
        with_topic: bool,
    ) -> Result<(), CrewError> {
        run.transition(CrewState::running(stage));

        let rendered = self.blueprint.stage(stage).render(&run.topic);
        let context = run
            .last_output()
            .map(|prev| StageContext {
                from: prev.stage,
                role: prev.role.clone(),
                text: prev.raw.clone(),
            })
            .into_iter()
            .collect();

        let request = GenerationRequest {
            stage,
            role: rendered.role,
            goal: rendered.goal,
            backstory: rendered.backstory,
            task: rendered.description,
            expected_output: rendered.expected_output,
            topic: with_topic.then(|| run.topic.to_string()),
            context,
        };

        log::info!(
            "▶ [{}] Stage {}/3: {} ({})",
            run.run_id,
            stage.position(),
            request.role,
            self.llm.provider_name()
        );
        self.emit(CrewProgress::StageStarted {
            stage,
            role: request.role.clone(),
        });

        let timer = ActionTimer::start(&request.role);
        let response = match self.llm.generate(&request).await {
            Ok(response) => response,
            Err(source) => {
                run.transition(CrewState::Failed);
                log::error!("✗ [{}] {} falhou: {}", run.run_id, request.role, source);
                self.emit(CrewProgress::StageFailed {
                    stage,
                    error: source.to_string(),
                });
                return Err(CrewError::StageFailed { stage, source });
            }
        };
        let elapsed_ms = timer.stop() as u64;

        run.tokens.track(stage, response.usage);
        run.timing.add_stage_time(stage, elapsed_ms as u128);

        let words = word_count(&response.text);
        log::info!(
            "✓ [{}] {} concluído em {}ms ({} palavras)",
            run.run_id,
            request.role,
            elapsed_ms,
            words
        );
        if self.config.verbose {
            log::info!("[{}] {} output:\n{}", run.run_id, request.role, response.text);
        } else {
            log::debug!("[{}] {} output: {}", run.run_id, request.role, preview(&response.text, 200));
        }

        self.emit(CrewProgress::StageCompleted {
            stage,
            elapsed_ms,
            words,
        });

        run.outputs.push(StageOutput {
            stage,
            role: request.role,
            raw: response.text,
            elapsed_ms,
            usage: response.usage,
            model: response.model,
        });

        Ok(())
    }
}
