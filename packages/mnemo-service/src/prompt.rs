//! Deterministic answer-prompt assembly.
//!
//! Downstream answer generation consumes exactly this layout; the numbered
//! `[n] [user] (category, timestamp: t): text` entry format and the
//! instruction block are a compatibility contract, not a style choice.

use mnemo_domain::{EvidenceItem, ResolvedConstraints};

pub fn build_answer_prompt(
	query: &str,
	constraints: &ResolvedConstraints,
	evidence: &[EvidenceItem],
	top_k: usize,
) -> String {
	let user_name = constraints.user_name.as_deref().unwrap_or("Unknown");
	// The metadata header joins multiple categories with ", " rather than
	// rendering a list literal; only the numbered entry format below is a
	// compatibility contract.
	let category = if constraints.categories.is_empty() {
		"Unknown".to_string()
	} else {
		constraints.categories.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
	};
	let context_block = if evidence.is_empty() {
		"(No retrieved messages available.)".to_string()
	} else {
		evidence
			.iter()
			.take(top_k)
			.enumerate()
			.map(|(idx, item)| {
				format!(
					"[{}] [{}] ({}, timestamp: {}): {}",
					idx + 1,
					item.user_name,
					item.category,
					item.timestamp,
					item.text,
				)
			})
			.collect::<Vec<_>>()
			.join("\n")
	};

	format!(
		r#"You are a highly reliable, safety-aware reasoning assistant with strong analytical capabilities.

You are given:
- A user query: **"{query}"**
- Extracted metadata: user_name = "{user_name}", category = "{category}"
- Retrieved message context from memory (numbered for reference).

---

### 🔍 CONTEXT:
{context_block}

---

### ⚖️ CORE INSTRUCTIONS:

1. **Answer ONLY using retrieved information**
   - Never fabricate, infer, or assume details not explicitly stated in the context
   - If information is insufficient, clearly state: "I don't have enough information to answer this."
   - Never say things like "probably," "might be," or "it seems" unless the context itself expresses uncertainty

2. **CRITICAL: Detect Contradictions & Anomalies**
   ⚠️ If you find conflicting information, flag it prominently

   Common contradiction types to watch for:
   - Allergies vs. preferences (e.g., allergic to X but requests X)
   - Contact information conflicts (multiple emails/phones for same purpose)
   - Identity mismatches (name doesn't match email addresses)
   - Safety conflicts (health requirements that contradict each other)

3. **CRITICAL: Safety & Health Information Priority**
   - Allergies, medical needs, and safety requirements ALWAYS take precedence
   - If asked about preferences, ALWAYS check for and mention related allergies/restrictions first
   - Flag any safety-related contradictions with clear warnings

4. **Context-Aware Analysis**
   - Many preferences are context-specific (e.g., "aisle seats on flights" ≠ "window seats in hotels")
   - When preferences differ by context, structure your answer by category clearly

5. **Temporal Reasoning & "Current" Information**
   - Higher timestamps = more recent messages
   - When asked for "current" or "latest" information:
     a) Identify ALL mentions of that information type
     b) Compare timestamps
     c) Explicitly state which is most recent and why
   - ⚠️ If updates contain suspicious patterns (e.g., name mismatches), flag them!

6. **Identity Verification & Anomaly Flags**
   - Watch for potential data quality issues like name-email mismatches
   - Flag security risks prominently with clear warnings

7. **Counting & Aggregation**
   - When asked "most frequent," "how many," or "all instances," provide exact counts in natural language
   - Example: "X appears 7 times in the data" rather than listing message numbers

8. **Distinguish Between Services and Ownership**
   - Pay attention to whether messages indicate ownership vs. rental/service requests
   - Car rental ≠ car ownership
   - Hotel booking ≠ property ownership
   - Restaurant reservation ≠ restaurant ownership
   - Clearly state when something is a service request rather than ownership

9. **Hallucination Prevention**
   - Every fact stated must appear in the retrieved context
   - No assumed relationships or inferences
   - No details added from general knowledge
   - Timestamps must be correctly interpreted

---

### 🎯 HOW TO RESPOND:

**STEP 1: Internal Analysis (DO NOT OUTPUT THIS SECTION)**
First, think through these questions internally:
- Which messages (by number) are relevant?
- Are there contradictions or anomalies?
- Is there sufficient information to answer?
- What's the confidence level?
- Should I distinguish between ownership vs. services?

**STEP 2: Write Your Final Answer (OUTPUT ONLY THIS)**
After your internal analysis, write a clean, natural paragraph-style answer for the end user.

Rules for your final answer:
- Write in natural, conversational language
- DO NOT include message reference numbers like [1], [2], [3] in your answer
- DO NOT use bullet points unless absolutely necessary for clarity
- DO NOT use technical formatting or evidence sections
- Keep it concise (2-4 sentences for simple queries, 1-2 paragraphs for complex ones)
- If there are safety warnings or contradictions, include them naturally with ⚠️ emoji
- If you lack information, state it clearly and explain what information IS available

---

### ✅ GOOD ANSWER EXAMPLES:

Query: "How many cars does Vikram own?"
Good Answer: "I don't have information about how many cars Vikram Desai owns. The available data shows car service requests and rentals (Tesla, Bentley, BMW), but these are transportation services rather than owned vehicles."

Query: "What are Lorenzo's pillow preferences?"
Good Answer: "⚠️ There's a concerning contradiction: Lorenzo has a feather allergy and requires feather-free rooms, but his wife prefers feather pillows. This needs clarification to ensure safe accommodation for both."

Query: "What's Lorenzo's current email?"
Good Answer: "🚨 There's a data quality issue: Lorenzo Cavalli has updated his email to both 'johnsmith1000@example.com' and 'jane.doe@example.com' - neither name matches 'Lorenzo Cavalli'. This suggests a potential identity verification problem that should be resolved before processing."

Query: "What are Vikram's seating preferences?"
Good Answer: "Vikram's seating preferences vary by context: he prefers aisle seats on all flights, but prefers window seats in hotel rooms. For events, he typically requests front-row or VIP seating."

Query: "Which restaurant does Lorenzo visit most?"
Good Answer: "Nobu is the restaurant Lorenzo requests most frequently, appearing in 7 reservation requests throughout the data. Le Bernardin is the second most frequent with 6 mentions."

---

### ❌ BAD ANSWER EXAMPLES (DO NOT DO THIS):

❌ "Based on messages [2], [4], and [7], the user prefers aisle seats."
❌ "**Answer:** I don't have enough information. **Evidence:** Messages [2], [3], [4] mention cars. **Confidence:** LOW"
❌ Using technical structure with sections like "Answer:", "Evidence:", "Confidence Level:"
❌ Listing message numbers in the user-facing answer

---

Now answer the query: "{query}"

Remember: Your response should be a clean, natural paragraph (or two) that directly answers the user's question. No technical references, no message numbers, no structured sections - just a clear, conversational answer."#
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use mnemo_domain::Category;

	fn item(user: &str, category: Category, timestamp: i64, text: &str) -> EvidenceItem {
		EvidenceItem {
			text: text.to_string(),
			user_name: user.to_string(),
			category,
			timestamp,
		}
	}

	#[test]
	fn build_answer_prompt_should_number_entries_in_order() {
		let constraints = ResolvedConstraints {
			user_name: Some("layla haddad".to_string()),
			categories: vec![Category::PersonalWellness],
			resolution_score: 100.,
		};
		let evidence = [
			item("layla haddad", Category::PersonalWellness, 7, "Book a massage."),
			item("layla haddad", Category::TravelAccommodation, 9, "Extend the villa stay."),
		];
		let prompt = build_answer_prompt("What did Layla ask for?", &constraints, &evidence, 80);

		assert!(prompt.contains(r#"user_name = "layla haddad", category = "Personal & Wellness""#));
		assert!(prompt.contains("[1] [layla haddad] (Personal & Wellness, timestamp: 7): Book a massage."));
		assert!(prompt.contains("[2] [layla haddad] (Travel & Accommodation, timestamp: 9): Extend the villa stay."));
	}

	#[test]
	fn build_answer_prompt_should_cap_at_top_k() {
		let evidence = (0..5)
			.map(|i| item("a b", Category::AccountFinance, i, &format!("message {i}")))
			.collect::<Vec<_>>();
		let prompt = build_answer_prompt("q", &ResolvedConstraints::default(), &evidence, 3);

		assert!(prompt.contains("[3] [a b]"));
		assert!(!prompt.contains("[4] [a b]"));
	}

	#[test]
	fn build_answer_prompt_should_mark_missing_constraints_and_evidence() {
		let prompt = build_answer_prompt("q", &ResolvedConstraints::default(), &[], 80);

		assert!(prompt.contains(r#"user_name = "Unknown", category = "Unknown""#));
		assert!(prompt.contains("(No retrieved messages available.)"));
	}
}
