use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::settings::AppConfig;

/// Context handed to the prompt builder when drafting an outreach email.
#[derive(Debug)]
pub struct DraftContext<'a> {
    pub contact_name: &'a str,
    pub company_name: &'a str,
    pub job_title: &'a str,
    pub job_description: Option<&'a str>,
    pub tone: &'a str,
    pub sender_name: &'a str,
    pub sender_bio: &'a str,
    pub projects: &'a [(String, String, Vec<String>)],
    pub skills: &'a [String],
}

/// Client for a generateContent-style text completion endpoint.
/// The generated draft is stored, never sent.
#[derive(Clone)]
pub struct DraftClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl DraftClient {
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(api_url) = config.ai_api_url.clone() else {
            return Ok(None);
        };

        let api_key = config
            .ai_api_key
            .clone()
            .ok_or_else(|| anyhow!("AI_API_KEY is required when AI_API_URL is set"))?;

        Ok(Some(DraftClient {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }))
    }

    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{"parts": [{"text": prompt}]}],
                "generationConfig": {
                    "temperature": 0.7,
                    "maxOutputTokens": 1024
                }
            }))
            .send()
            .await
            .context("AI request failed")?
            .error_for_status()
            .context("AI provider rejected the request")?;

        let body: serde_json::Value = response
            .json()
            .await
            .context("Unexpected AI response body")?;

        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("No content generated"))?;

        Ok(text)
    }
}

pub fn build_draft_prompt(ctx: &DraftContext<'_>) -> String {
    let tone_instructions = match ctx.tone {
        "friendly" => "Use a friendly, conversational tone while remaining respectful.",
        _ => "Use a professional, concise tone. Avoid overly casual language.",
    };

    let projects_context = ctx
        .projects
        .iter()
        .enumerate()
        .map(|(i, (title, description, technologies))| {
            format!("{}. {}: {} ({})", i + 1, title, description, technologies.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = format!(
        "Write a cold outreach email for the {} position at {}.\n\n\
         Recipient: {}\n\
         Company: {}\n\
         Position: {}\n",
        ctx.job_title, ctx.company_name, ctx.contact_name, ctx.company_name, ctx.job_title,
    );

    if let Some(description) = ctx.job_description {
        prompt.push_str(&format!("Job description: {}\n", description));
    }

    prompt.push_str(&format!(
        "Tone: {}\n\n\
         About the sender:\n\
         - Name: {}\n\
         - Bio: {}\n\n\
         Relevant portfolio projects:\n{}\n\n\
         Key skills: {}\n\n\
         Requirements:\n\
         - Keep it under 180 words.\n\
         - Reference at most two of the projects above.\n\
         - Start the output with a line of the form `Subject: ...`, then a blank line, then the body.\n\
         - Do not invent facts that are not in the context above.\n",
        tone_instructions,
        ctx.sender_name,
        ctx.sender_bio,
        projects_context,
        ctx.skills.join(", "),
    ));

    prompt
}

/// Split the provider output on the `Subject:` first-line convention.
/// Output without the marker becomes a body with a generic subject.
pub fn split_subject_body(generated: &str, fallback_subject: &str) -> (String, String) {
    let trimmed = generated.trim();

    if let Some(rest) = trimmed.strip_prefix("Subject:") {
        let mut lines = rest.splitn(2, '\n');
        let subject = lines.next().unwrap_or_default().trim().to_string();
        let body = lines.next().unwrap_or_default().trim().to_string();
        if !subject.is_empty() && !body.is_empty() {
            return (subject, body);
        }
    }

    (fallback_subject.to_string(), trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_line_is_split_off() {
        let generated = "Subject: Exploring the Backend Engineer role\n\nHi Grace,\n\nI admire your work.";
        let (subject, body) = split_subject_body(generated, "fallback");

        assert_eq!(subject, "Exploring the Backend Engineer role");
        assert!(body.starts_with("Hi Grace"));
    }

    #[test]
    fn missing_subject_marker_uses_fallback() {
        let (subject, body) = split_subject_body("Hi there,\n\nJust reaching out.", "About the role");

        assert_eq!(subject, "About the role");
        assert!(body.starts_with("Hi there"));
    }

    #[test]
    fn prompt_includes_context_fields() {
        let projects = vec![("Portfolio".to_string(), "My site".to_string(), vec!["rust".to_string()])];
        let skills = vec!["Rust".to_string(), "SQL".to_string()];
        let ctx = DraftContext {
            contact_name: "Grace",
            company_name: "Initech",
            job_title: "Backend Engineer",
            job_description: None,
            tone: "professional",
            sender_name: "Ada",
            sender_bio: "Systems programmer",
            projects: &projects,
            skills: &skills,
        };

        let prompt = build_draft_prompt(&ctx);
        assert!(prompt.contains("Initech"));
        assert!(prompt.contains("Grace"));
        assert!(prompt.contains("Portfolio"));
        assert!(prompt.contains("Subject:"));
    }
}
