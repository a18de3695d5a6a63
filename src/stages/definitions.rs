// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DEFINIÇÃO DOS 3 ESTÁGIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use super::StageDefinition;
use crate::types::StageKind;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 1. CONTENT PLANNER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Content Planner - Monta o plano do artigo
///
/// Recebe apenas o tópico. O plano vira contexto do Writer.
pub fn planner() -> StageDefinition {
    StageDefinition {
        kind: StageKind::Planner,
        role: "Content Planner".into(),
        goal: "Plan engaging and factually accurate content on {topic}".into(),
        backstory: "You're working on planning a blog article about the topic: {topic}. \
            You collect information that helps the audience learn something and make \
            informed decisions. Your work is the basis for the Content Writer to write \
            an article on this topic."
            .into(),
        description: "1. Prioritize the latest trends, key players, and noteworthy news on {topic}.\n\
            2. Identify the target audience, considering their interests and pain points.\n\
            3. Develop a detailed content outline including an introduction, key points, and a call to action.\n\
            4. Include SEO keywords and relevant data or sources.\n\
            5. The plan should be detailed and cover all aspects of the topic."
            .into(),
        expected_output: "A comprehensive content plan document with an outline, audience \
            analysis, SEO keywords, and resources."
            .into(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 2. CONTENT WRITER
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Content Writer - Transforma o plano em post
pub fn writer() -> StageDefinition {
    StageDefinition {
        kind: StageKind::Writer,
        role: "Content Writer".into(),
        goal: "Write a compelling and well-structured blog post on {topic}.".into(),
        backstory: "You're a writer who uses the content plan to create a detailed blog \
            post. Ensure it aligns with SEO best practices and the brand's voice."
            .into(),
        description: "1. Use the content plan to craft a compelling blog post on {topic}.\n\
            2. Incorporate SEO keywords naturally.\n\
            3. Sections/Subtitles are properly named in an engaging manner.\n\
            4. Ensure the post is structured with an engaging introduction, insightful body, and a summarizing conclusion.\n\
            5. Proofread for grammatical errors and alignment with the brand's voice.\n\
            6. Each section should have 2 or 3 paragraphs.\n\
            7. The entire blog post should be at least 1000 words."
            .into(),
        expected_output: "A well-written blog post in markdown format, ready for publication."
            .into(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 3. EDITOR
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Editor - Revisão final
///
/// Não usa `{topic}`: trabalha só sobre o rascunho recebido.
pub fn editor() -> StageDefinition {
    StageDefinition {
        kind: StageKind::Editor,
        role: "Editor".into(),
        goal: "Edit a given blog post to align with the writing style of the organization."
            .into(),
        backstory: "You are an editor who receives a blog post from the Content Writer. \
            Your goal is to review the blog post to ensure that it follows journalistic \
            best practices, provides balanced viewpoints when providing opinions or \
            assertions, and also avoids major controversial topics or opinions when possible."
            .into(),
        description: "Proofread the given blog post for grammatical errors and alignment \
            with the brand's voice."
            .into(),
        expected_output: "A polished and error-free blog post in markdown format, ready for \
            publication."
            .into(),
    }
}
