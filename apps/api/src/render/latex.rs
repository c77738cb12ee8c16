//! JSON → LaTeX renderer.
//!
//! Pure and deterministic: the same `Resume` always renders to the same source.
//! Every user-supplied string passes through `escape_tex` (body text) or
//! `escape_url` (`\href` targets) before it reaches the template.

use crate::render::template::PREAMBLE;
use crate::resume::models::{Education, Experience, Project, Resume, Skills};

const CONTACT_SEPARATOR: &str = " $\\|$ ";
const SKILL_SEPARATOR: &str = " \\\\\n      ";
const BULLET_SEPARATOR: &str = "\n            ";

/// Escapes LaTeX special characters in a single pass.
///
/// A single pass matters: the replacement for `\` contains braces that must
/// not be escaped again.
pub fn escape_tex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            'μ' => out.push_str("$\\mu$"),
            'α' => out.push_str("$\\alpha$"),
            'β' => out.push_str("$\\beta$"),
            _ => out.push(c),
        }
    }
    out
}

/// Prepares a URL for the first argument of `\href`.
///
/// hyperref takes most characters verbatim there; `%` and `#` still need a
/// backslash, and braces, backslashes and whitespace have no business in a URL.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' | '#' => {
                out.push('\\');
                out.push(c);
            }
            '\\' | '{' | '}' => {}
            c if c.is_whitespace() => {}
            _ => out.push(c),
        }
    }
    out
}

fn esc(field: &Option<String>) -> String {
    field.as_deref().map(escape_tex).unwrap_or_default()
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Renders a complete, compilable LaTeX document.
pub fn generate_tex(resume: &Resume) -> String {
    let mut tex = String::with_capacity(PREAMBLE.len() + 4096);
    tex.push_str(PREAMBLE);
    tex.push_str("\\begin{document}\n");
    tex.push_str(&header(resume));

    let education: String = resume.education.iter().map(education_item).collect();
    if !education.is_empty() {
        tex.push_str(&format!(
            "\\section{{Education}}\\resumeSubHeadingListStart {education} \\resumeSubHeadingListEnd\n"
        ));
    }

    let experience: String = resume.experience.iter().map(experience_item).collect();
    if !experience.is_empty() {
        tex.push_str(&format!(
            "\\section{{Experience}}\\resumeSubHeadingListStart {experience} \\resumeSubHeadingListEnd\n"
        ));
    }

    let projects: String = resume.projects.iter().map(project_item).collect();
    if !projects.is_empty() {
        tex.push_str(&format!(
            "\\section{{Projects}}\\resumeSubHeadingListStart {projects} \\resumeSubHeadingListEnd\n"
        ));
    }

    let skills = skill_lines(&resume.skills);
    if !skills.is_empty() {
        tex.push_str(&format!(
            "\\section{{Technical Skills}}\\begin{{itemize}}[leftmargin=0.15in, label={{}}]\\small{{\\item{{ {skills} }}}}\\end{{itemize}}\n"
        ));
    }

    tex.push_str("\\end{document}\n");
    tex
}

fn header(resume: &Resume) -> String {
    let mut contact = Vec::new();
    if let Some(phone) = present(&resume.phone) {
        contact.push(escape_tex(phone));
    }
    if let Some(email) = present(&resume.email) {
        contact.push(format!(
            "\\href{{mailto:{}}}{{\\underline{{{}}}}}",
            escape_url(email),
            escape_tex(email)
        ));
    }
    if let Some(linkedin) = present(&resume.linkedin) {
        contact.push(format!(
            "\\href{{https://{}}}{{\\underline{{{}}}}}",
            escape_url(linkedin),
            escape_tex(linkedin)
        ));
    }
    if let Some(github) = present(&resume.github) {
        contact.push(format!(
            "\\href{{https://github.com/{}}}{{\\underline{{github.com/{}}}}}",
            escape_url(github),
            escape_tex(github)
        ));
    }

    format!(
        "\\begin{{center}}\n    \\textbf{{\\Huge \\scshape {}}} \\\\ \\vspace{{1pt}}\n    \\small {}\n\\end{{center}}\n",
        esc(&resume.name),
        contact.join(CONTACT_SEPARATOR)
    )
}

/// `\resumeItemListStart … \resumeItemListEnd`, or nothing when every bullet is blank.
fn item_list(bullets: &[String]) -> String {
    let items: Vec<String> = bullets
        .iter()
        .filter(|b| !b.trim().is_empty())
        .map(|b| format!("\\resumeItem{{{}}}", escape_tex(b)))
        .collect();
    if items.is_empty() {
        return String::new();
    }
    format!(
        "\n        \\resumeItemListStart\n            {}\n        \\resumeItemListEnd",
        items.join(BULLET_SEPARATOR)
    )
}

fn education_item(edu: &Education) -> String {
    format!(
        "\n    \\resumeSubheading{{{}}}{{{}}}{{{}}}{{{}}}",
        esc(&edu.institution),
        esc(&edu.dates),
        esc(&edu.degree),
        esc(&edu.details)
    )
}

fn experience_item(exp: &Experience) -> String {
    format!(
        "\n    \\resumeSubheading{{{}}}{{{}}}{{{}}}{{{}}}{}",
        esc(&exp.company),
        esc(&exp.dates),
        esc(&exp.role),
        esc(&exp.location),
        item_list(&exp.description)
    )
}

fn project_item(proj: &Project) -> String {
    format!(
        "\n    \\resumeProjectHeading{{\\textbf{{{}}}}}{{{}}}{}",
        esc(&proj.name),
        esc(&proj.dates),
        item_list(&proj.description)
    )
}

fn skill_lines(skills: &Skills) -> String {
    [
        ("Languages", &skills.languages),
        ("Frameworks", &skills.frameworks),
        ("Developer Tools", &skills.developer_tools),
        ("Libraries", &skills.libraries),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        present(value).map(|v| format!("\\textbf{{{label}}}{{: {}}}", escape_tex(v)))
    })
    .collect::<Vec<_>>()
    .join(SKILL_SEPARATOR)
}
