/// Prompt asking for one carousel slide's worth of content as strict JSON.
pub fn summarize_article(title: &str, source: &str, text: &str) -> String {
    format!(r#"You are a tech news analyst for an Instagram carousel about AI and DevOps trends.

Given this article text, generate content for an Instagram carousel slide. Return ONLY valid JSON with these fields:

{{
  "headline": "A compelling, attention-grabbing headline (max 80 chars). Should communicate the key news clearly.",
  "insight": "A 2-3 sentence summary explaining WHY this matters and WHAT the impact is. Should provide real value and context, not just restate the headline. Max 250 chars.",
  "takeaways": [
    "First actionable or interesting takeaway (max 80 chars)",
    "Second takeaway (max 80 chars)",
    "Third takeaway (max 80 chars)"
  ]
}}

Rules:
- headline: Be specific and punchy. Use numbers/stats when available.
- insight: Explain the significance. Why should a tech professional care?
- takeaways: Concrete facts, stats, or implications. Not generic statements.
- Do NOT include any markdown formatting, code blocks, or extra text. Return ONLY the JSON object.

Article title: {title}
Source: {source}
Article text:
{text}"#, title = title, source = source, text = text)
}
