use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{MnemoService, ServiceError, ServiceResult, prompt};

#[derive(Clone, Debug, Deserialize)]
pub struct QuestionRequest {
	pub question: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerResponse {
	pub answer: String,
}

impl MnemoService {
	/// The full question-to-answer pipeline: interpret, retrieve, assemble
	/// the prompt, generate. Only blank input and answer-generation
	/// failures surface as errors; everything in between degrades locally.
	pub async fn answer_question(&self, request: &QuestionRequest) -> ServiceResult<AnswerResponse> {
		let question = request.question.trim();

		if question.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Question is required.".to_string(),
			});
		}

		let constraints = self.interpret(question).await;
		let evidence = self.retrieve(question, &constraints).await;

		info!(
			"answering with {} evidence items (member: {})",
			evidence.len(),
			constraints.user_name.as_deref().unwrap_or("unknown"),
		);

		let prompt = prompt::build_answer_prompt(
			question,
			&constraints,
			evidence.items(),
			self.cfg.retrieval.prompt_top_k as usize,
		);
		let answer =
			self.providers.answerer.answer(&self.cfg.providers.answerer, &prompt).await?;

		Ok(AnswerResponse { answer })
	}
}
