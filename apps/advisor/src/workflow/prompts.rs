// Prompt templates for the resume workflow.

pub const SUMMARY_MAX_TOKENS: u32 = 500;
pub const GAPS_MAX_TOKENS: u32 = 400;
pub const ROADMAP_MAX_TOKENS: u32 = 400;
pub const KEYWORDS_MAX_TOKENS: u32 = 100;

pub const SUMMARY_PROMPT: &str = "\
Summarize this resume highlighting skills, education, and experience:

{resume_text}";

pub const GAPS_PROMPT: &str = "\
Analyze this resume and highlight missing skills, certifications, or experiences \
needed for better job opportunities:

{resume_text}";

pub const ROADMAP_PROMPT: &str = "\
Based on this resume, suggest a future roadmap to improve this person's career prospects \
(skills to learn, certifications needed, industry exposure):

{resume_text}";

pub const KEYWORDS_PROMPT: &str = "\
Based on this resume summary, suggest the best job titles/keywords for searching jobs. \
Give a comma-separated list only, no explanation.

Summary:
{summary}";

pub fn summary_prompt(resume_text: &str) -> String {
    SUMMARY_PROMPT.replace("{resume_text}", resume_text)
}

pub fn gaps_prompt(resume_text: &str) -> String {
    GAPS_PROMPT.replace("{resume_text}", resume_text)
}

pub fn roadmap_prompt(resume_text: &str) -> String {
    ROADMAP_PROMPT.replace("{resume_text}", resume_text)
}

pub fn keywords_prompt(summary: &str) -> String {
    KEYWORDS_PROMPT.replace("{summary}", summary)
}
