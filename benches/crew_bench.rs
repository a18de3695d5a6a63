//! Benchmarks do pipeline.
//!
//! Testa performance de:
//! - Renderização de templates `{topic}`
//! - Montagem de prompts com contexto
//! - Kickoff completo com cliente roteirizado (sem rede)
//!
//! Executar: `cargo bench --bench crew_bench`

use content_crew::llm::{GenerationRequest, ScriptedLlmClient, StageContext};
use content_crew::stages::{interpolate, CrewBlueprint, TemplateInputs};
use content_crew::{ContentCrew, StageKind, Topic};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Templates
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_templates(c: &mut Criterion) {
    let mut group = c.benchmark_group("templates");

    let template = "Plan engaging and factually accurate content on {topic} for {audience}";
    let mut inputs = TemplateInputs::new();
    inputs.insert("topic", "Rust async runtimes");

    group.bench_function("interpolate", |bencher| {
        bencher.iter(|| black_box(interpolate(black_box(template), &inputs)))
    });

    let blueprint = CrewBlueprint::default();
    let topic = Topic::parse("Rust async runtimes").expect("valid topic");

    for kind in StageKind::ALL {
        group.bench_with_input(BenchmarkId::new("render_stage", kind), &kind, |bencher, kind| {
            bencher.iter(|| black_box(blueprint.stage(*kind).render(&topic)))
        });
    }

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Prompts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_prompts(c: &mut Criterion) {
    let mut group = c.benchmark_group("prompts");

    for draft_words in [100usize, 1_000, 5_000] {
        let draft = "lorem ".repeat(draft_words);
        let request = GenerationRequest {
            stage: StageKind::Editor,
            role: "Editor".into(),
            goal: "Edit a given blog post.".into(),
            backstory: "You are an editor.".into(),
            task: "Proofread the given blog post.".into(),
            expected_output: "A polished blog post in markdown.".into(),
            topic: None,
            context: vec![StageContext {
                from: StageKind::Writer,
                role: "Content Writer".into(),
                text: draft,
            }],
        };

        group.bench_with_input(
            BenchmarkId::new("user_prompt", draft_words),
            &request,
            |bencher, request| bencher.iter(|| black_box(request.user_prompt())),
        );
    }

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Kickoff
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_kickoff(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");

    let client = Arc::new(ScriptedLlmClient::with_replies(
        "outline",
        &"draft ".repeat(1_000),
        &"final ".repeat(1_000),
    ));
    let crew = ContentCrew::new(client.clone());

    c.bench_function("kickoff_scripted", |bencher| {
        bencher.to_async(&runtime).iter(|| async {
            // O cliente grava cada chamada; limpa para não crescer sem limite
            client.clear_calls();
            black_box(crew.kickoff("Rust async runtimes").await.is_ok())
        })
    });
}

criterion_group!(benches, bench_templates, bench_prompts, bench_kickoff);
criterion_main!(benches);
