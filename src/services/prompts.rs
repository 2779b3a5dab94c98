//! 提示词模板
//!
//! 所有发给模型的指令都在这里拼装，方便测试直接断言提示词内容

/// 每次生成的题目数量
pub const MCQ_COUNT: u32 = 25;

/// 表示"没有已知正确答案"的占位值
pub const NO_ANSWER_SENTINEL: &str = "N/A";

/// 构建 MCQ 生成提示词
///
/// 原文按原样嵌入，题目数量由调用方传入
pub fn build_mcq_prompt(input_text: &str, num_questions: u32) -> String {
    format!(
        r#"
You are an AI assistant helping the user generate multiple-choice questions (MCQs) based on the following text:
'{input_text}'
Please generate {num_questions} MCQs from the text with each question tagged as Easy, Medium, or Hard. Each question should have:
- A clear question with the difficulty level indicated at the start (e.g., [Easy], [Medium], [Hard])
- Four answer options (labeled A, B, C, D)
- The correct answer clearly indicated
Format:
## MCQ 1
[Difficulty Level] Question: [question]
A) [option A]
B) [option B]
C) [option C]
D) [option D]
Correct Answer: [correct option]
"#
    )
}

/// `/generate_explanation` 使用的解释提示词（必须有正确答案）
pub fn build_explanation_prompt(question: &str, correct_answer: &str) -> String {
    format!(
        r#"
Explain why the correct answer to the following question is '{correct_answer}':
{question}
Provide a concise yet detailed explanation in simple terms.
"#
    )
}

/// `/chatbot` 使用的提示词
///
/// 没有正确答案（或为 `N/A`）时让模型直接作答，否则解释为什么答案正确
pub fn build_chatbot_prompt(question: &str, correct_answer: Option<&str>) -> String {
    match known_answer(correct_answer) {
        None => format!("Answer the following question in simple terms:\n{question}"),
        Some(answer) => format!(
            "Explain why the correct answer to the following question is '{answer}':\n{question}\nProvide a clear explanation."
        ),
    }
}

/// 过滤掉空串和 `N/A`
pub fn known_answer(correct_answer: Option<&str>) -> Option<&str> {
    correct_answer.filter(|a| !a.is_empty() && *a != NO_ANSWER_SENTINEL)
}
