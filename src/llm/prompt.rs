// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MONTAGEM DE PROMPTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Converte um GenerationRequest em (system, user). O formato é o mesmo para
// todos os provedores.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use super::GenerationRequest;

impl GenerationRequest {
    /// Prompt de sistema: quem o agente é
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    /// Prompt do usuário: tarefa, critério e contexto dos estágios anteriores
    pub fn user_prompt(&self) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary.",
            self.task, self.expected_output
        );

        if let Some(topic) = &self.topic {
            prompt.push_str(&format!("\n\nTopic: {}", topic));
        }

        if !self.context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:");
            for entry in &self.context {
                prompt.push_str(&format!("\n\n--- Output of {} ---\n{}", entry.role, entry.text));
            }
        }

        prompt.push_str("\n\nBegin! This is VERY important to you, your job depends on it!");
        prompt
    }
}

#[cfg(test)]
mod tests {
    use crate::llm::{GenerationRequest, StageContext};
    use crate::types::StageKind;

    fn request(context: Vec<StageContext>, topic: Option<&str>) -> GenerationRequest {
        GenerationRequest {
            stage: StageKind::Writer,
            role: "Content Writer".into(),
            goal: "Write a post on Rust.".into(),
            backstory: "You're a writer.".into(),
            task: "Use the content plan.".into(),
            expected_output: "A blog post in markdown.".into(),
            topic: topic.map(String::from),
            context,
        }
    }

    #[test]
    fn test_system_prompt() {
        let prompt = request(vec![], None).system_prompt();
        assert_eq!(
            prompt,
            "You are Content Writer. You're a writer.\nYour personal goal is: Write a post on Rust."
        );
    }

    #[test]
    fn test_user_prompt_includes_task_and_criteria() {
        let prompt = request(vec![], None).user_prompt();
        assert!(prompt.starts_with("Current Task: Use the content plan."));
        assert!(prompt.contains("final answer: A blog post in markdown."));
        assert!(!prompt.contains("context you're working with"));
        assert!(!prompt.contains("Topic:"));
    }

    #[test]
    fn test_user_prompt_includes_topic_and_context() {
        let ctx = vec![StageContext {
            from: StageKind::Planner,
            role: "Content Planner".into(),
            text: "OUTLINE-123".into(),
        }];
        let prompt = request(ctx, Some("Rust")).user_prompt();

        assert!(prompt.contains("Topic: Rust"));
        assert!(prompt.contains("--- Output of Content Planner ---\nOUTLINE-123"));
    }
}
