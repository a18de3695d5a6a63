// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para medir tempo de execução dos estágios.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::Instant;

use crate::types::StageKind;

/// Timer para medir duração de operações
pub struct ActionTimer {
    start: Instant,
    action_name: String,
}

impl ActionTimer {
    /// Inicia um novo timer para uma ação
    pub fn start(action_name: &str) -> Self {
        Self {
            start: Instant::now(),
            action_name: action_name.to_string(),
        }
    }

    /// Retorna o tempo decorrido em milissegundos
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Para o timer e loga o tempo decorrido
    pub fn stop_and_log(self) -> u128 {
        let elapsed = self.elapsed_ms();
        log::info!("⏱️  {} completado em {}ms", self.action_name, elapsed);
        elapsed
    }

    /// Para o timer e retorna o tempo sem logar
    pub fn stop(self) -> u128 {
        self.elapsed_ms()
    }
}

/// Tempos por estágio de uma execução
#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    /// (estágio, ms) na ordem em que terminaram
    pub stage_times: Vec<(StageKind, u128)>,
}

impl TimingStats {
    /// Cria stats vazias
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra o tempo de um estágio
    pub fn add_stage_time(&mut self, stage: StageKind, ms: u128) {
        self.stage_times.push((stage, ms));
    }

    /// Soma dos tempos
    pub fn total_time(&self) -> u128 {
        self.stage_times.iter().map(|(_, ms)| ms).sum()
    }

    /// Resumo para log
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .stage_times
            .iter()
            .map(|(stage, ms)| format!("{}={}ms", stage, ms))
            .collect();
        format!("{} (total {}ms)", parts.join(", "), self.total_time())
    }
}
