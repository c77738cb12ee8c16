// Resume editing prompts.

use std::sync::OnceLock;

use crate::llm_client::prompts::JSON_ONLY_RULES;

/// Example document embedded in the system prompt. The model mirrors its shape.
pub const RESUME_SCHEMA_EXAMPLE: &str = r#"{"name":"Full Name","email":"email@example.com","phone":"555-555-5555","linkedin":"linkedin.com/in/your-profile","github":"your-github-username","education":[{"institution":"University Name","degree":"B.S. in Computer Science","dates":"Aug 2018 - May 2021"}],"experience":[{"company":"Company Inc.","role":"Software Engineer","dates":"May 2021 - Present","location":"City, ST","description":["Developed feature X using React"]}],"projects":[{"name":"Project Name","technologies":"React, Node.js, Python","dates":"Jun 2020","description":["Built a web app for X","Implemented Y feature"]}],"skills":{"languages":"Python, JavaScript, SQL","frameworks":"React, Node.js, Flask","developerTools":"Git, Docker, VS Code","libraries":"pandas, NumPy, Matplotlib"}}"#;

const RESUME_EDIT_SYSTEM_TEMPLATE: &str = "\
You are an expert resume-building AI assistant. Your task is to act as a data processor.
You will receive the plain text of a user's current resume and a set of instructions for changes.
Your one and only job is to return a single, valid JSON object that represents the final, updated resume.
First, parse the 'Current Resume Text' into the provided JSON structure.
Then, apply the 'User's Instructions' to modify that JSON object.
Finally, return the complete, modified JSON object.

RULES:
{json_only_rules}
- The 'description' field for each experience and project item must be an array of strings.
- When writing or updating bullet points in the 'description' fields, phrase them professionally and aim for exactly one line on a standard letter-size PDF. A bullet that is very short, or that spills one word onto a second line, is a defect.
- When generating or updating any 'dates' field, use 3-letter abbreviations for months (e.g., Jun, Aug, Sep).
- Do not add full stops to the end of bullet points.
- Ensure there are no unnecessary white-spaces such as empty lines.
- The 'linkedin' field holds the profile URL without 'https://'. The 'github' field holds only the username.
- Skill Integration Rule: when the user adds a new project or experience, analyze its technologies and description for technical skills (languages, frameworks, tools, libraries). For each skill that is NOT already listed in the root 'skills' object, add it to the matching string (e.g., add \"React\" to 'skills.frameworks'). Do NOT list the technologies in the item's own description bullets.
- Adhere strictly to this JSON structure: {schema}";

/// User prompt template. Replace `{instructions}` and `{resume_text}` before sending.
pub const RESUME_EDIT_PROMPT_TEMPLATE: &str = "\
## User's Instructions:
{instructions}

## User's Current Resume Text:
{resume_text}";

/// System prompt for resume editing, with the output rules and schema filled in.
pub fn resume_edit_system() -> &'static str {
    static SYSTEM: OnceLock<String> = OnceLock::new();
    SYSTEM.get_or_init(|| {
        RESUME_EDIT_SYSTEM_TEMPLATE
            .replace("{json_only_rules}", JSON_ONLY_RULES)
            .replace("{schema}", RESUME_SCHEMA_EXAMPLE)
    })
}

pub fn resume_edit_prompt(instructions: &str, resume_text: &str) -> String {
    RESUME_EDIT_PROMPT_TEMPLATE
        .replace("{instructions}", instructions.trim())
        .replace("{resume_text}", resume_text.trim())
}
