// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO RUNTIME, LLM, SERVIDOR E CREW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configurações carregadas de variáveis de ambiente (.env via dotenvy).
// Nenhuma chave é validada aqui: credencial ausente só aparece como erro
// quando o primeiro estágio chama o provedor.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
pub fn load_dotenv() {
    let possible_paths = [
        // Diretório atual
        PathBuf::from(".env"),
        // Diretório pai
        PathBuf::from("../.env"),
        // Raiz do crate em tempo de compilação
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env"),
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or_else(|_| path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    if dotenvy::dotenv().is_ok() {
        eprintln!("✓ Carregado .env do diretório atual");
    } else {
        eprintln!(
            "⚠ Nenhum arquivo .env encontrado. Certifique-se de que GOOGLE_API_KEY (ou OPENAI_API_KEY) está definida."
        );
    }
}

/// Lê uma variável e faz parse, ignorando valores inválidos
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("⚠ {}={:?} inválido, usando padrão", key, raw);
            None
        }
    }
}

/// Lê uma variável não-vazia
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Interpreta "1", "true", "yes", "on" como verdadeiro
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Provedor de geração de texto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini (Generative Language API)
    #[default]
    Gemini,
    /// OpenAI ou qualquer API compatível com /chat/completions
    OpenAi,
}

impl LlmProvider {
    /// Converte string do .env para LlmProvider.
    ///
    /// Case-insensitive:
    /// - "openai" → OpenAi
    /// - "gemini", "google" ou qualquer outro valor → Gemini
    pub fn from_env(value: &str) -> Self {
        match value.to_lowercase().trim() {
            "openai" => Self::OpenAi,
            _ => Self::Gemini,
        }
    }

    /// Variável de ambiente com a chave deste provedor
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GOOGLE_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Modelo padrão do provedor
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAi => "gpt-4.1-mini",
        }
    }

    /// URL base padrão do provedor
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// Nome legível para logs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Configuração do cliente LLM
#[derive(Clone)]
pub struct LlmConfig {
    /// Provedor em uso
    pub provider: LlmProvider,
    /// Modelo (sem o prefixo "models/")
    pub model: String,
    /// Chave da API. `None` quando a variável não está definida.
    pub api_key: Option<String>,
    /// URL base da API
    pub base_url: String,
    /// Temperatura de geração
    pub temperature: f32,
    /// Timeout por requisição HTTP (segundos)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider = LlmProvider::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: provider.default_base_url().to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Configuração padrão para um provedor específico
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            provider,
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            ..Self::default()
        }
    }

    /// Define a chave da API
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Define o modelo, aceitando também a forma "models/<nome>"
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = normalize_model_name(model);
        self
    }

    /// Define a URL base
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(mask_api_key))
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Remove o prefixo "models/" usado pela API do Gemini
pub fn normalize_model_name(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}

/// Mascara uma chave para logs: mantém só os 4 primeiros caracteres
pub fn mask_api_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", visible)
    }
}

/// Carrega configuração do LLM a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `LLM_PROVIDER`: "gemini" (padrão) ou "openai"
/// - `LLM_MODEL`: Modelo (padrão depende do provedor)
/// - `LLM_API_BASE_URL`: URL base customizada (opcional)
/// - `LLM_TEMPERATURE`: Temperatura (padrão: 0.7)
/// - `LLM_TIMEOUT_SECS`: Timeout por requisição (padrão: 120)
/// - `GOOGLE_API_KEY` / `OPENAI_API_KEY`: Chave do provedor escolhido
pub fn load_llm_config() -> LlmConfig {
    let provider = std::env::var("LLM_PROVIDER")
        .map(|v| LlmProvider::from_env(&v))
        .unwrap_or_default();

    let mut config = LlmConfig::for_provider(provider);
    config.api_key = env_non_empty(provider.api_key_var());

    if let Some(model) = env_non_empty("LLM_MODEL") {
        config.model = normalize_model_name(&model);
    }

    if let Some(url) = env_non_empty("LLM_API_BASE_URL") {
        config.base_url = url.trim_end_matches('/').to_string();
    }

    if let Some(temperature) = env_parse::<f32>("LLM_TEMPERATURE") {
        if (0.0..=2.0).contains(&temperature) {
            config.temperature = temperature;
        } else {
            log::warn!("⚠ LLM_TEMPERATURE={} fora de [0, 2], usando padrão", temperature);
        }
    }

    if let Some(timeout) = env_parse::<u64>("LLM_TIMEOUT_SECS") {
        if timeout > 0 {
            config.timeout_secs = timeout;
        }
    }

    log::info!(
        "📦 LLM: {} / {} (temperature={})",
        config.provider,
        config.model,
        config.temperature
    );

    if config.api_key.is_none() {
        log::warn!(
            "⚠ {} não definida; o primeiro estágio vai falhar",
            provider.api_key_var()
        );
    }

    config
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CREW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuração do coordenador
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CrewConfig {
    /// Loga a saída de cada estágio em `info` em vez de `debug`.
    ///
    /// Só afeta logging, nunca o resultado.
    pub verbose: bool,
}

/// Carrega `CREW_VERBOSE`
pub fn load_crew_config() -> CrewConfig {
    let verbose = std::env::var("CREW_VERBOSE")
        .map(|v| parse_bool(&v))
        .unwrap_or(false);

    if verbose {
        log::info!("📦 CREW_VERBOSE=true");
    }

    CrewConfig { verbose }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SERVIDOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuração do servidor HTTP
#[derive(Clone)]
pub struct ServerConfig {
    /// Host de bind
    pub host: String,
    /// Porta de bind
    pub port: u16,
    /// Token Bearer opcional para as rotas /api
    pub secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            secret: None,
        }
    }
}

impl ServerConfig {
    /// Endereço "host:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret", &self.secret.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Carrega `SERVER_HOST`, `SERVER_PORT` e `SERVER_SECRET`
pub fn load_server_config() -> ServerConfig {
    let mut config = ServerConfig::default();

    if let Some(host) = env_non_empty("SERVER_HOST") {
        config.host = host;
    }
    if let Some(port) = env_parse::<u16>("SERVER_PORT") {
        config.port = port;
    }
    config.secret = env_non_empty("SERVER_SECRET");

    config
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RUNTIME TOKIO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuração do runtime Tokio.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Número de worker threads do Tokio.
    /// Se None, usa cálculo dinâmico: min(cpu_cores, max_threads).
    pub worker_threads: Option<usize>,

    /// Limite superior para o cálculo dinâmico. Padrão: 8
    pub max_threads: usize,

    /// Número máximo de blocking threads. Padrão: 512
    pub max_blocking_threads: usize,

    /// Nome das threads do runtime.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_threads: 8,
            max_blocking_threads: 512,
            thread_name: "content-crew".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Calcula número efetivo de worker threads.
    pub fn effective_worker_threads(&self) -> usize {
        match self.worker_threads {
            Some(threads) => threads,
            None => std::cmp::min(num_cpus::get(), self.max_threads),
        }
    }
}

/// Carrega configuração do runtime a partir das variáveis de ambiente.
///
/// - `TOKIO_THREADS`: Número fixo de threads (opcional)
/// - `TOKIO_MAX_THREADS`: Máximo de threads para cálculo dinâmico (padrão: 8)
/// - `TOKIO_MAX_BLOCKING`: Máximo de blocking threads (padrão: 512)
pub fn load_runtime_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    if let Some(threads) = env_parse::<usize>("TOKIO_THREADS").filter(|t| *t > 0) {
        config.worker_threads = Some(threads);
        log::info!("📦 TOKIO_THREADS={} (fixo)", threads);
    }

    if let Some(max) = env_parse::<usize>("TOKIO_MAX_THREADS").filter(|m| *m > 0) {
        config.max_threads = max;
        log::info!("📦 TOKIO_MAX_THREADS={}", max);
    }

    if let Some(blocking) = env_parse::<usize>("TOKIO_MAX_BLOCKING").filter(|b| *b > 0) {
        config.max_blocking_threads = blocking;
        log::info!("📦 TOKIO_MAX_BLOCKING={}", blocking);
    }

    config
}

/// Instala panic hook que loga o panic via `log` antes do comportamento padrão.
///
/// Uma task que entra em panic vira `JoinError` no handler e o servidor
/// continua atendendo as demais requisições.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let thread = std::thread::current();
        let thread_name = thread.name().unwrap_or("unnamed");

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic payload".to_string()
        };

        log::error!("[PANIC] Thread {} at {}: {}", thread_name, location, message);

        original_hook(panic_info);
    }));
}

/// Cria o runtime Tokio com a configuração dada.
pub fn create_tokio_runtime(config: &RuntimeConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let worker_threads = config.effective_worker_threads();

    log::info!(
        "🚀 Criando runtime Tokio: {} workers, {} blocking max",
        worker_threads,
        config.max_blocking_threads
    );

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .enable_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_env() {
        assert_eq!(LlmProvider::from_env("openai"), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::from_env("OpenAI"), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::from_env("gemini"), LlmProvider::Gemini);
        assert_eq!(LlmProvider::from_env("google"), LlmProvider::Gemini);
        assert_eq!(LlmProvider::from_env(""), LlmProvider::Gemini);
    }

    #[test]
    fn test_provider_key_vars() {
        assert_eq!(LlmProvider::Gemini.api_key_var(), "GOOGLE_API_KEY");
        assert_eq!(LlmProvider::OpenAi.api_key_var(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_llm_config_default() {
        let config = LlmConfig::default();
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.model, "gemini-2.0-flash");
        assert!(config.api_key.is_none());
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn test_normalize_model_name() {
        assert_eq!(normalize_model_name("models/gemini-pro"), "gemini-pro");
        assert_eq!(normalize_model_name(" gpt-4o "), "gpt-4o");
    }

    #[test]
    fn test_debug_masks_api_key() {
        let config = LlmConfig::default().with_api_key("AIzaSySecretValue");
        let debug = format!("{:?}", config);
        assert!(debug.contains("AIza****"));
        assert!(!debug.contains("SecretValue"));
    }

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask_api_key("abc"), "****");
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let config = LlmConfig::for_provider(LlmProvider::OpenAi).with_base_url("http://localhost:8080/v1/");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" YES "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8501");
        assert!(config.secret.is_none());
    }

    #[test]
    fn test_effective_worker_threads_fixed() {
        let config = RuntimeConfig {
            worker_threads: Some(4),
            ..RuntimeConfig::default()
        };
        assert_eq!(config.effective_worker_threads(), 4);
    }

    #[test]
    fn test_effective_worker_threads_dynamic() {
        let config = RuntimeConfig::default();
        assert_eq!(
            config.effective_worker_threads(),
            std::cmp::min(num_cpus::get(), 8)
        );
    }
}
