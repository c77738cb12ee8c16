//! Deterministic clean-up of model output.
//!
//! The system prompt asks for these conventions; this pass guarantees them so the
//! renderer never sees a trailing full stop, a blank bullet, or `September`.

use crate::resume::models::{Education, Experience, Project, Resume};

const MONTHS: &[(&str, &str)] = &[
    ("january", "Jan"),
    ("february", "Feb"),
    ("march", "Mar"),
    ("april", "Apr"),
    ("june", "Jun"),
    ("july", "Jul"),
    ("august", "Aug"),
    ("september", "Sep"),
    ("sept", "Sep"),
    ("october", "Oct"),
    ("november", "Nov"),
    ("december", "Dec"),
];

/// Applies every formatting rule in place.
pub fn normalize_resume(resume: &mut Resume) {
    clean(&mut resume.name);
    clean(&mut resume.email);
    clean(&mut resume.phone);
    clean(&mut resume.linkedin);
    clean(&mut resume.github);
    resume.linkedin = resume.linkedin.as_deref().and_then(linkedin_path);
    resume.github = resume.github.as_deref().and_then(github_username);

    for edu in &mut resume.education {
        clean(&mut edu.institution);
        clean(&mut edu.degree);
        clean_dates(&mut edu.dates);
        clean(&mut edu.details);
    }
    resume.education.retain(|e| *e != Education::default());

    for exp in &mut resume.experience {
        clean(&mut exp.company);
        clean(&mut exp.role);
        clean_dates(&mut exp.dates);
        clean(&mut exp.location);
        clean_bullets(&mut exp.description);
    }
    resume.experience.retain(|e| *e != Experience::default());

    for proj in &mut resume.projects {
        clean(&mut proj.name);
        clean(&mut proj.technologies);
        clean_dates(&mut proj.dates);
        clean_bullets(&mut proj.description);
    }
    resume.projects.retain(|p| *p != Project::default());

    let skills = &mut resume.skills;
    for field in [
        &mut skills.languages,
        &mut skills.frameworks,
        &mut skills.developer_tools,
        &mut skills.libraries,
    ] {
        clean(field);
    }
}

fn clean(field: &mut Option<String>) {
    *field = field
        .take()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
}

fn clean_dates(field: &mut Option<String>) {
    clean(field);
    if let Some(dates) = field.as_mut() {
        *dates = abbreviate_months(dates);
    }
}

fn clean_bullets(bullets: &mut Vec<String>) {
    *bullets = bullets
        .iter()
        .map(|b| normalize_bullet(b))
        .filter(|b| !b.is_empty())
        .collect();
}

/// Collapses whitespace and strips trailing full stops.
pub fn normalize_bullet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('.').trim_end().to_string()
}

/// Rewrites full month names to their 3-letter form, leaving other words alone.
pub fn abbreviate_months(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        let lower = word.to_lowercase();
        match MONTHS.iter().find(|(full, _)| *full == lower) {
            Some((_, abbr)) => out.push_str(abbr),
            None => out.push_str(word),
        }
        word.clear();
    };

    for c in text.chars() {
        if c.is_alphabetic() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

/// ASCII case-insensitive `strip_prefix`.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &s[prefix.len()..])
}

fn strip_scheme(url: &str) -> &str {
    let url = strip_prefix_ci(url, "https://")
        .or_else(|| strip_prefix_ci(url, "http://"))
        .unwrap_or(url);
    strip_prefix_ci(url, "www.").unwrap_or(url)
}

/// `https://www.linkedin.com/in/ada/` → `linkedin.com/in/ada`.
pub fn linkedin_path(raw: &str) -> Option<String> {
    let path = strip_scheme(raw.trim()).trim_end_matches('/');
    (!path.is_empty()).then(|| path.to_string())
}

/// `https://github.com/ada/` or `@ada` → `ada`.
pub fn github_username(raw: &str) -> Option<String> {
    let rest = strip_scheme(raw.trim());
    let rest = strip_prefix_ci(rest, "github.com/").unwrap_or(rest);
    let rest = rest.trim_start_matches('@');
    rest.split('/')
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
