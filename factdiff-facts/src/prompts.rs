//! Prompt templates for fact extraction and comparison.
//!
//! The wording is part of the contract with the grading model and is kept
//! stable across releases. Placeholders are `{name}` and are filled in a
//! single pass, so text that itself contains a placeholder name is inserted
//! literally.

/// Asks the model to split a text into one pronoun-resolved fact per line.
pub const FACT_PROMPT: &str = r#"
Here is a text that may contain one or more facts:

<text>
{text}
</text>

Please parse this text into a list of individual facts. If a sentence contains multiple facts, break it up into separate sentences as needed so that each sentence contains only one fact.

If any of the facts contain pronouns and the pronoun reference is clear, replace the pronoun with the noun it refers to. If the pronoun reference is ambiguous, leave the pronoun as is.

Return the final list of parsed and pronoun-replaced facts inside <facts> tags, with each fact on its own line. Do not include any additional commentary or explanation, including about pronoun changes, number of facts, or truth value of the facts.
"#;

/// Asks the model to bucket two fact lists into shared / answer-only / context-only.
pub const COMPARE_PROMPT: &str = r#"
You will be comparing facts between a context and an answer to determine which facts are shared and which are unique to each.

Here is the context:

<context>
{context_list}
</context>

And here is the answer:

<answer>
{answer_list}
</answer>

Carefully analyze the facts presented in the context and answer, focusing on the semantic meaning rather than the exact wording.

Then, output a dictionary with the following keys and corresponding lists of facts as values:

1. "facts_in_both": A list of facts that are present in both the context and the answer

2. "facts_only_in_answer": A list of facts that are only present in the answer

3. "facts_only_in_context": A list of facts that are only present in the context

Remember, the facts do not need to be worded identically to be considered the same. Focus on whether the core meaning is shared or unique.  A fact in the context may be expressed in different terms in the answer, or multiple facts in one may combine to express a single fact in the other.

Provide your results in this format:

{
    "facts_in_both": [
        "Fact 1 present in both",
        "Fact 2 present in both"
    ],
    "facts_only_in_answer": [
        "Fact 1 only in answer",
        "Fact 2 only in answer"
    ],
    "facts_only_in_context": [
        "Fact 1 only in context",
        "Fact 2 only in context"
    ]
}
"#;

/// PASS/FAIL grading prompt used by the prompt scorer.
pub const GRADE_PROMPT: &str = r#"
Return PASS if the 'Answer' below fulfills the requirements outlined in the 'Target' below, otherwise return FAIL:

Answer:
{answer}

Target:
{target}
"#;

/// Layout of the human-readable comparison explanation.
pub const EXPLANATION_FORMAT: &str = r#"
Facts in Both:
{facts_in_both}

Facts only in Answer:
{facts_only_in_answer}

Facts only in Context:
{facts_only_in_context}
"#;

/// Fill `{name}` placeholders in `template`.
///
/// Unknown placeholders and stray braces are left untouched.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match substituted {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Build the extraction prompt for `text`.
#[must_use]
pub fn fact_prompt(text: &str) -> String {
    render(FACT_PROMPT, &[("text", text)])
}

/// Build the comparison prompt for two raw fact lists.
#[must_use]
pub fn compare_prompt(context_list: &str, answer_list: &str) -> String {
    render(
        COMPARE_PROMPT,
        &[("context_list", context_list), ("answer_list", answer_list)],
    )
}

/// Build the PASS/FAIL grading prompt.
#[must_use]
pub fn grade_prompt(answer: &str, target: &str) -> String {
    render(GRADE_PROMPT, &[("answer", answer), ("target", target)])
}
