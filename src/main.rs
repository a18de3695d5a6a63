// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONTENT CREW CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uso:
//   content-crew-cli "Rust para backends web"
//   content-crew-cli --server              (formulário em SERVER_HOST:SERVER_PORT)
//   content-crew-cli --server --port=3000
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use content_crew::config::load_dotenv;
use content_crew::prelude::*;
#[cfg(feature = "server")]
use content_crew::load_server_config;
use content_crew::{create_tokio_runtime, install_panic_hook, load_runtime_config};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let runtime = create_tokio_runtime(&load_runtime_config())?;

    if args.iter().any(|a| a == "--server") {
        let port = parse_port(&args[1..])?;
        return runtime.block_on(run_server_mode(port));
    }

    let topic = args[1..].join(" ");
    runtime.block_on(run_cli_mode(&topic))
}

fn print_usage(bin: &str) {
    eprintln!("Content Crew CLI v{}", content_crew::VERSION);
    eprintln!();
    eprintln!("Uso: {} <tópico>", bin);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --server          Sobe o formulário web (padrão: 127.0.0.1:8501)");
    eprintln!("  --port=<porta>    Porta do servidor (sobrescreve SERVER_PORT)");
    eprintln!();
    eprintln!("Exemplos:");
    eprintln!("  {} \"Rust para backends web\"", bin);
    eprintln!("  {} --server --port=3000", bin);
}

/// Lê `--port=N` ou `--port N`
fn parse_port(args: &[String]) -> anyhow::Result<Option<u16>> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let value = if let Some(v) = arg.strip_prefix("--port=") {
            v
        } else if arg == "--port" {
            iter.next()
                .map(String::as_str)
                .ok_or_else(|| anyhow::anyhow!("--port requer um valor"))?
        } else {
            continue;
        };
        let port = value
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Porta inválida {:?}: {}", value, e))?;
        return Ok(Some(port));
    }
    Ok(None)
}

async fn run_cli_mode(topic: &str) -> anyhow::Result<()> {
    let llm_config = load_llm_config();
    let crew_config = load_crew_config();

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" CONTENT CREW v{}", content_crew::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Tópico: {}", topic.trim());
    println!("Modelo: {} ({})", llm_config.model, llm_config.provider.display_name());
    println!();

    let progress: ProgressCallback = Arc::new(|event| match event {
        CrewProgress::StageStarted { stage, role } => {
            eprintln!("⏳ [{}/3] {}...", stage.position(), role);
        }
        CrewProgress::StageCompleted {
            stage,
            elapsed_ms,
            words,
        } => {
            eprintln!("✓ [{}/3] {} palavras em {}ms", stage.position(), words, elapsed_ms);
        }
        _ => {}
    });

    let crew = ContentCrew::new(build_client(&llm_config))
        .with_config(crew_config)
        .with_progress_callback(progress);

    match crew.kickoff(topic).await {
        Ok(output) => {
            println!("{}", output.raw);
            println!();
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!(
                "Tokens: {} | Tempo: {}ms | Run: {}",
                output.token_usage.total_tokens, output.total_time_ms, output.run_id
            );
            Ok(())
        }
        Err(err @ CrewError::EmptyTopic) => {
            eprintln!("{}", err);
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            if let CrewError::StageFailed {
                source: LlmError::MissingCredentials(var),
                ..
            } = &err
            {
                eprintln!();
                eprintln!("Configure a variável de ambiente:");
                eprintln!("  export {}=sua-chave-aqui", var);
            }
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "server")]
async fn run_server_mode(port: Option<u16>) -> anyhow::Result<()> {
    use content_crew::server::{start_server, AppState};

    let mut server_config = load_server_config();
    if let Some(port) = port {
        server_config.port = port;
    }

    let llm = build_client(&load_llm_config());
    let state = Arc::new(AppState::new(llm, load_crew_config(), server_config.secret.clone()));

    let addr = server_config.bind_address().parse()?;
    start_server(addr, state).await
}

#[cfg(not(feature = "server"))]
async fn run_server_mode(_port: Option<u16>) -> anyhow::Result<()> {
    anyhow::bail!("Compilado sem a feature \"server\"; recompile com --features server")
}
