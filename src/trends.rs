//! Trend ranking and representative selection.
//!
//! Topics are ranked by how many articles matched them. Each of the top
//! topics gets one representative article, never reusing a story another
//! topic already claimed, and that article becomes the topic's slide.

use crate::api::Summarize;
use crate::models::{AiSummary, Article, Trend};
use crate::scrapers::article_text::FetchText;
use crate::takeaways::extract_takeaways;
use crate::taxonomy::{DEFAULT_ICON, classify_article, icon_for_topic};
use crate::utils::truncate_at_sentence;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Extra ranked topics considered beyond the target, in case some have no unused article.
const WINDOW_BUFFER: usize = 3;
const INSIGHT_MAX_CHARS: usize = 300;
const INSIGHT_MIN_CHARS: usize = 80;
const BACKFILL_TOPIC: &str = "Tech News";

/// A topic and the indices of the articles that matched it.
type TopicGroup = (&'static str, Vec<usize>);

/// A topic that won a representative article.
#[derive(Debug, Clone, PartialEq)]
struct Selection {
    topic: &'static str,
    members: Vec<usize>,
    representative: usize,
}

/// Build carousel trends from the working article list.
///
/// Selected representatives have their body text fetched in place, so
/// `articles` carries that text afterwards. `summarizer` is `None` when AI
/// summaries are disabled; every trend then uses extracted content.
///
/// Returns at most `target` trends, highest-ranked topic first, backfill last.
#[instrument(level = "info", skip_all, fields(articles = articles.len(), wanted = target))]
pub async fn analyze_trends<F, S>(
    articles: &mut [Article],
    target: usize,
    fetcher: &F,
    summarizer: Option<&S>,
    delay: Duration,
) -> Vec<Trend>
where
    F: FetchText,
    S: Summarize,
{
    let ranked = rank_topics(group_by_topic(articles));
    for (topic, members) in ranked.iter().take(10) {
        debug!(topic, icon = icon_for_topic(topic), articles = members.len(), "Topic ranking");
    }

    let mut used_titles: HashSet<String> = HashSet::new();
    let selections = select_representatives(articles, &ranked, target, &mut used_titles);
    info!(selected = selections.len(), "Selected representative articles");

    for sel in &selections {
        let article = &mut articles[sel.representative];
        if article.article_text.is_empty() {
            article.article_text = fetcher.fetch_text(&article.link).await;
        }
    }

    let mut trends = Vec::with_capacity(target);
    for (i, sel) in selections.iter().enumerate() {
        let best = &articles[sel.representative];
        let summary = match summarizer {
            Some(s) => {
                if i > 0 {
                    sleep(delay).await;
                }
                s.summarize(best).await
            }
            None => None,
        };
        let members: Vec<Article> = sel.members.iter().map(|&m| articles[m].clone()).collect();
        trends.push(build_trend(sel.topic, members, best, summary));
    }

    backfill(&mut trends, articles, target, &mut used_titles);
    info!(trends = trends.len(), "Trend analysis complete");
    trends
}

/// Map each topic to the articles that matched it, in first-seen order.
///
/// Within one article, topics are visited alphabetically, so the order is
/// deterministic for a given input.
fn group_by_topic(articles: &[Article]) -> Vec<TopicGroup> {
    let mut groups: Vec<TopicGroup> = Vec::new();
    for (idx, article) in articles.iter().enumerate() {
        for topic in classify_article(article) {
            match groups.iter_mut().find(|(t, _)| *t == topic) {
                Some((_, members)) => members.push(idx),
                None => groups.push((topic, vec![idx])),
            }
        }
    }
    groups
}

/// Sort by member count, largest first. Equal counts keep first-seen order.
fn rank_topics(mut groups: Vec<TopicGroup>) -> Vec<TopicGroup> {
    groups.sort_by_key(|(_, members)| Reverse(members.len()));
    groups
}

/// Walk the top `target + 3` topics and pick one unused article for each.
///
/// Candidates are ordered by description length, then recency. Topics whose
/// candidates have all been claimed are skipped. Every pick is recorded in
/// `used_titles`.
fn select_representatives(
    articles: &[Article],
    ranked: &[TopicGroup],
    target: usize,
    used_titles: &mut HashSet<String>,
) -> Vec<Selection> {
    let mut selections = Vec::new();
    for (topic, members) in ranked.iter().take(target + WINDOW_BUFFER) {
        if selections.len() >= target {
            break;
        }
        let best = members
            .iter()
            .copied()
            .sorted_by_key(|&m| {
                let a = &articles[m];
                Reverse((a.description.chars().count(), a.published))
            })
            .find(|&m| !used_titles.contains(&articles[m].title));

        let Some(best) = best else {
            debug!(topic, "Every candidate already used; skipping topic");
            continue;
        };
        used_titles.insert(articles[best].title.clone());
        debug!(topic, title = %articles[best].title, "Picked representative");
        selections.push(Selection {
            topic: *topic,
            members: members.clone(),
            representative: best,
        });
    }
    selections
}

/// Insight for a trend without a summary: the description cut at a sentence
/// near 300 characters, or the title when there is no description.
fn fallback_insight(article: &Article) -> String {
    if article.description.trim().is_empty() {
        article.title.clone()
    } else {
        truncate_at_sentence(&article.description, INSIGHT_MAX_CHARS, INSIGHT_MIN_CHARS)
    }
}

/// Assemble one trend from its topic, member articles and representative.
///
/// # Arguments
///
/// * `topic` - Taxonomy label; also picks the icon
/// * `members` - Every article that matched the topic
/// * `best` - The representative, with its body text already fetched
/// * `summary` - Summarizer output; `None` falls back to extracted content
fn build_trend(
    topic: &str,
    members: Vec<Article>,
    best: &Article,
    summary: Option<AiSummary>,
) -> Trend {
    let ai_generated = summary.is_some();
    let (headline, insight, takeaways) = match summary {
        Some(s) => (s.headline, s.insight, s.takeaways.into_iter().take(3).collect()),
        None => (
            best.title.clone(),
            fallback_insight(best),
            extract_takeaways(&best.article_text, &best.description),
        ),
    };
    let all_sources: Vec<String> = members
        .iter()
        .map(|a| a.source.clone())
        .sorted()
        .dedup()
        .collect();

    Trend {
        topic: topic.to_string(),
        icon: icon_for_topic(topic).to_string(),
        count: members.len(),
        articles: members,
        headline,
        insight,
        source: best.source.clone(),
        source_count: all_sources.len(),
        all_sources,
        takeaways,
        ai_generated,
    }
}

/// Top up `trends` with single-article trends from unused articles, in input order.
fn backfill(
    trends: &mut Vec<Trend>,
    articles: &[Article],
    target: usize,
    used_titles: &mut HashSet<String>,
) {
    for article in articles {
        if trends.len() >= target {
            break;
        }
        if !used_titles.insert(article.title.clone()) {
            continue;
        }
        debug!(title = %article.title, "Backfilling with single article");
        trends.push(Trend {
            topic: article
                .entry_categories
                .first()
                .cloned()
                .unwrap_or_else(|| BACKFILL_TOPIC.to_string()),
            icon: DEFAULT_ICON.to_string(),
            count: 1,
            articles: vec![article.clone()],
            headline: article.title.clone(),
            insight: fallback_insight(article),
            source: article.source.clone(),
            source_count: 1,
            all_sources: vec![article.source.clone()],
            takeaways: Vec::new(),
            ai_generated: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::extract_keywords;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn article(title: &str, description: &str, source: &str, hour: u32) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            link: format!("https://example.com/{}", title.len()),
            source: source.to_string(),
            category: "AI".to_string(),
            published: Utc.with_ymd_and_hms(2025, 5, 6, hour, 0, 0).unwrap(),
            keywords: extract_keywords(&format!("{title} {description}")),
            entry_categories: vec![],
            article_text: String::new(),
        }
    }

    /// Records which links were fetched and returns canned text.
    struct FakeFetcher {
        fetched: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    impl FetchText for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> String {
            self.fetched.lock().unwrap().push(url.to_string());
            format!("Body of {url}")
        }
    }

    /// Succeeds for every article whose title does not contain "fail".
    struct FakeSummarizer;

    impl Summarize for FakeSummarizer {
        async fn summarize(&self, article: &Article) -> Option<AiSummary> {
            if article.title.contains("fail") {
                return None;
            }
            Some(AiSummary {
                headline: format!("AI: {}", article.title),
                insight: "Why it matters.".to_string(),
                takeaways: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            })
        }
    }

    async fn run(articles: &mut [Article], target: usize) -> Vec<Trend> {
        analyze_trends(
            articles,
            target,
            &FakeFetcher::new(),
            None::<&FakeSummarizer>,
            Duration::ZERO,
        )
        .await
    }

    #[test]
    fn test_group_and_rank_by_count() {
        let articles = vec![
            article("Terraform modules", "", "A", 1),
            article("Kubernetes autoscaling tips", "", "A", 2),
            article("Kubernetes cost controls", "", "B", 3),
        ];
        let ranked = rank_topics(group_by_topic(&articles));
        assert_eq!(ranked[0].0, "Cloud & Containers");
        assert_eq!(ranked[0].1, vec![1, 2]);
        assert_eq!(ranked[1].0, "Infrastructure as Code");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let articles = vec![
            article("Terraform modules", "", "A", 1),
            article("Kubernetes autoscaling tips", "", "A", 2),
        ];
        let ranked = rank_topics(group_by_topic(&articles));
        let topics: Vec<_> = ranked.iter().map(|(t, _)| *t).collect();
        assert_eq!(topics, vec!["Infrastructure as Code", "Cloud & Containers"]);
    }

    #[test]
    fn test_representative_prefers_longer_description() {
        let articles = vec![
            article("Kubernetes short", "brief", "A", 5),
            article("Kubernetes long", "a much longer description here", "B", 1),
        ];
        let ranked = rank_topics(group_by_topic(&articles));
        let mut used = HashSet::new();
        let sel = select_representatives(&articles, &ranked, 4, &mut used);
        assert_eq!(sel[0].representative, 1);
        assert!(used.contains("Kubernetes long"));
    }

    #[test]
    fn test_representative_ties_broken_by_recency() {
        let articles = vec![
            article("Kubernetes older", "same", "A", 1),
            article("Kubernetes newer", "same", "B", 9),
        ];
        let ranked = rank_topics(group_by_topic(&articles));
        let sel = select_representatives(&articles, &ranked, 4, &mut HashSet::new());
        assert_eq!(sel[0].representative, 1);
    }

    #[test]
    fn test_used_titles_skip_topic() {
        // One article matches two topics; only one topic can claim it.
        let articles = vec![article("Kubernetes security hardening", "", "A", 1)];
        let ranked = rank_topics(group_by_topic(&articles));
        assert_eq!(ranked.len(), 2);
        let sel = select_representatives(&articles, &ranked, 4, &mut HashSet::new());
        assert_eq!(sel.len(), 1);
    }

    #[test]
    fn test_window_limits_topics_considered() {
        let articles = vec![
            article("Kubernetes one", "", "A", 1),
            article("Terraform modules", "", "B", 2),
        ];
        let ranked: Vec<TopicGroup> = vec![
            ("T1", vec![0]),
            ("T2", vec![0]),
            ("T3", vec![0]),
            ("T4", vec![0]),
            ("T5", vec![1]),
        ];
        let used = || HashSet::from(["Kubernetes one".to_string()]);

        // Target 1 only looks at four topics, all sharing a claimed article.
        assert!(select_representatives(&articles, &ranked, 1, &mut used()).is_empty());

        let sel = select_representatives(&articles, &ranked, 2, &mut used());
        assert_eq!(sel.len(), 1);
        assert_eq!(sel[0].topic, "T5");
    }

    #[tokio::test]
    async fn test_never_exceeds_target_and_titles_unique() {
        let mut articles = vec![
            article("Kubernetes one", "", "A", 1),
            article("Kubernetes two", "", "B", 2),
            article("Terraform modules", "", "C", 3),
            article("Zero trust security", "", "D", 4),
            article("Nvidia earnings", "", "E", 5),
            article("Plain headline", "", "F", 6),
        ];
        let trends = run(&mut articles, 3).await;
        assert_eq!(trends.len(), 3);
        assert_eq!(trends[0].topic, "Cloud & Containers");
        assert_eq!(trends[0].count, 2);
        let heads: HashSet<_> = trends.iter().map(|t| t.headline.clone()).collect();
        assert_eq!(heads.len(), 3);
    }

    #[tokio::test]
    async fn test_backfill_fills_from_unused_articles() {
        let mut articles = vec![
            article("Kubernetes autoscaling", "desc", "A", 1),
            article("Plain headline one", "First description.", "B", 2),
            article("Plain headline two", "", "C", 3),
            article("Plain headline three", "", "D", 4),
        ];
        articles[1].entry_categories = vec!["Funding".to_string()];

        let trends = run(&mut articles, 3).await;
        assert_eq!(trends.len(), 3);
        assert_eq!(trends[0].topic, "Cloud & Containers");
        assert_eq!(trends[1].topic, "Funding");
        assert_eq!(trends[1].icon, DEFAULT_ICON);
        assert_eq!(trends[1].count, 1);
        assert!(trends[1].takeaways.is_empty());
        assert_eq!(trends[2].topic, BACKFILL_TOPIC);
        assert_eq!(trends[2].headline, "Plain headline two");
        // Empty description falls back to the title.
        assert_eq!(trends[2].insight, "Plain headline two");
    }

    #[tokio::test]
    async fn test_backfill_returns_fewer_when_data_runs_out() {
        let mut articles = vec![article("Plain headline", "", "A", 1)];
        let trends = run(&mut articles, 4).await;
        assert_eq!(trends.len(), 1);
    }

    #[tokio::test]
    async fn test_fetches_only_representatives() {
        let mut articles = vec![
            article("Kubernetes one", "longer description", "A", 1),
            article("Kubernetes two", "", "B", 2),
        ];
        let fetcher = FakeFetcher::new();
        let trends = analyze_trends(
            &mut articles,
            1,
            &fetcher,
            None::<&FakeSummarizer>,
            Duration::ZERO,
        )
        .await;
        assert_eq!(trends.len(), 1);
        assert_eq!(fetcher.fetched.lock().unwrap().len(), 1);
        assert!(articles[0].article_text.starts_with("Body of"));
        assert!(articles[1].article_text.is_empty());
    }

    #[tokio::test]
    async fn test_summarizer_result_and_flag() {
        let mut articles = vec![
            article("Kubernetes rollout", "", "A", 1),
            article("Terraform fail modules", "Some description.", "B", 2),
            article("Terraform state drift", "", "C", 3),
        ];
        let trends = analyze_trends(
            &mut articles,
            2,
            &FakeFetcher::new(),
            Some(&FakeSummarizer),
            Duration::ZERO,
        )
        .await;
        assert_eq!(trends.len(), 2);

        let iac = &trends[0];
        assert_eq!(iac.topic, "Infrastructure as Code");
        assert!(!iac.ai_generated);
        assert_eq!(iac.headline, "Terraform fail modules");
        assert_eq!(iac.insight, "Some description.");
        assert!(iac.takeaways.is_empty());
        assert_eq!(iac.all_sources, vec!["B", "C"]);
        assert_eq!(iac.source_count, 2);

        let cloud = &trends[1];
        assert!(cloud.ai_generated);
        assert_eq!(cloud.headline, "AI: Kubernetes rollout");
        assert_eq!(cloud.takeaways.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_input_yields_no_trends() {
        assert!(run(&mut [], 4).await.is_empty());
    }

    fn three_topics() -> Vec<Article> {
        vec![
            article("Kubernetes one", "", "A", 1),
            article("Terraform modules", "", "B", 2),
            article("Zero trust security", "", "C", 3),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_summarizer_calls_are_throttled() {
        let delay = Duration::from_millis(500);
        let mut articles = three_topics();

        let start = tokio::time::Instant::now();
        let trends = analyze_trends(
            &mut articles,
            3,
            &FakeFetcher::new(),
            Some(&FakeSummarizer),
            delay,
        )
        .await;

        assert_eq!(trends.len(), 3);
        assert!(trends.iter().all(|t| t.ai_generated));
        // Three calls, two pauses between them.
        let elapsed = start.elapsed();
        assert!(elapsed >= delay * 2, "elapsed {elapsed:?}");
        assert!(elapsed < delay * 3, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_throttle_without_summarizer() {
        let mut articles = three_topics();

        let start = tokio::time::Instant::now();
        let trends = analyze_trends(
            &mut articles,
            3,
            &FakeFetcher::new(),
            None::<&FakeSummarizer>,
            Duration::from_millis(500),
        )
        .await;

        assert_eq!(trends.len(), 3);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
