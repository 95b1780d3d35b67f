//! End-to-end tests for the verification pipeline

#[cfg(test)]
mod tests {
    use crate::{
        ContentFetcher, FetchError, FetchedPage, PipelineConfig, PipelineError,
        VerificationPipeline, VerificationRequest,
    };
    use async_trait::async_trait;
    use satya_domain::traits::DocumentStore;
    use satya_domain::{
        Language, SourceRegistry, StoredVerification, Verdict, VerificationStats,
        NO_CLAIMS_ASSESSMENT,
    };
    use satya_llm::MockProvider;
    use satya_store::SqliteStore;
    use std::sync::Arc;

    const HINDI_TEXT: &str = "सरकार ने घोषणा की कि सभी स्कूल मई तक बंद रहेंगे। पीटीआई के अनुसार नई दिल्ली में बारिश हुई।";
    const ENGLISH_TEXT: &str =
        "The government announced that all schools will stay closed until May. According to PTI it rained in New Delhi.";
    const SCHOOLS: &str = "All schools will stay closed until May";
    const RAIN: &str = "It rained in New Delhi";

    const SILENT: &str = r#"{"stance": "silent", "relevant_text": ""}"#;
    const CONTRADICTS: &str = r#"{"stance": "contradicts", "relevant_text": "No such order was issued."}"#;
    const SUPPORTS: &str = r#"{"stance": "supports", "relevant_text": "Rainfall was recorded on Tuesday."}"#;

    struct PageFetcher(&'static str);

    #[async_trait]
    impl ContentFetcher for PageFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage {
                content_type: Some("text/html".to_string()),
                body: self.0.to_string(),
            })
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    struct FailingStore;

    impl DocumentStore for FailingStore {
        type Error = DiskFull;

        fn insert(&self, _document: &StoredVerification) -> Result<(), Self::Error> {
            Err(DiskFull)
        }

        fn list_recent(&self, _limit: usize) -> Result<Vec<StoredVerification>, Self::Error> {
            Err(DiskFull)
        }

        fn aggregate_counts(&self) -> Result<VerificationStats, Self::Error> {
            Err(DiskFull)
        }
    }

    fn claims_json(claims: &[&str]) -> String {
        let items: Vec<String> = claims
            .iter()
            .map(|c| {
                format!(
                    r#"{{"claim_text": "{}", "claim_type": "factual", "entities": []}}"#,
                    c
                )
            })
            .collect();
        format!(r#"{{"claims": [{}]}}"#, items.join(","))
    }

    /// Hindi article with one false claim (PIB and Alt News contradict) and
    /// one true claim (PTI supports)
    fn scripted_llm() -> MockProvider {
        let mut llm = MockProvider::new(SILENT);
        llm.add_response_containing("Identify the primary language", "Hindi");
        llm.add_response_containing("Translate the following", ENGLISH_TEXT);
        llm.add_response_containing("Extract all factual claims", claims_json(&[SCHOOLS, RAIN]));
        llm.add_response_containing(
            "Write a clear explanation",
            r#"{"explanation": "Trusted sources were consulted."}"#,
        );
        llm.add_response_containing(
            format!("Claim: {}\nSource: PIB Fact Check (", SCHOOLS),
            CONTRADICTS,
        );
        llm.add_response_containing(
            format!("Claim: {}\nSource: Alt News (", SCHOOLS),
            CONTRADICTS,
        );
        llm.add_response_containing(format!("Claim: {}\nSource: PTI (", RAIN), SUPPORTS);
        llm
    }

    fn pipeline(llm: MockProvider) -> VerificationPipeline<MockProvider, SqliteStore> {
        VerificationPipeline::new(
            llm,
            SqliteStore::new(":memory:").unwrap(),
            Arc::new(PageFetcher("<p>unused</p>")),
            SourceRegistry::builtin(),
            PipelineConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_verification_flow() {
        let pipeline = pipeline(scripted_llm());

        let report = pipeline.verify(VerificationRequest::text(HINDI_TEXT)).await.unwrap();
        assert!(report.is_persisted());

        let result = &report.result;
        assert_eq!(result.detected_language, Language::Hindi);
        assert_eq!(result.original_text, HINDI_TEXT);
        assert_eq!(result.claims.len(), 2);

        let schools = &result.claims[0];
        assert_eq!(schools.index, 1);
        assert_eq!(schools.claim_text, SCHOOLS);
        assert_eq!(schools.verdict, Verdict::False);
        assert_eq!(schools.confidence, 100);
        let names: Vec<&str> = schools
            .contradicting_sources
            .iter()
            .map(|s| s.source_name.as_str())
            .collect();
        assert_eq!(names, vec!["PIB Fact Check", "Alt News"]);
        assert_eq!(schools.contradicting_sources[0].credibility_score, 95);

        let rain = &result.claims[1];
        assert_eq!(rain.index, 2);
        assert_eq!(rain.verdict, Verdict::True);
        assert_eq!(rain.supporting_sources[0].credibility_score, 88);
        assert_eq!(rain.explanation, "Trusted sources were consulted.");

        for claim in &result.claims {
            assert_eq!(claim.article_id, result.article_id);
        }
        assert_eq!(
            result.overall_assessment,
            "This content contains misleading or false information."
        );

        let stats = pipeline.stats().await.unwrap();
        assert_eq!(stats.total_articles, 1);
        assert_eq!(stats.total_claims, 2);
        assert_eq!(stats.verdict_distribution.get(Verdict::False), 1);
        assert_eq!(stats.verdict_distribution.get(Verdict::True), 1);

        let history = pipeline.history(20).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result, report.result);
        assert_eq!(history[0].article.english_text, ENGLISH_TEXT);
    }

    #[tokio::test]
    async fn test_call_budget_per_claim() {
        let llm = scripted_llm();
        let pipeline = pipeline(llm.clone());
        pipeline.verify(VerificationRequest::text(HINDI_TEXT)).await.unwrap();

        // detect + translate + extract, then one query per source and one explanation per claim
        let sources = SourceRegistry::builtin().len();
        assert_eq!(llm.call_count(), 3 + 2 * (sources + 1));
    }

    #[tokio::test]
    async fn test_verification_is_deterministic() {
        let first = pipeline(scripted_llm())
            .verify(VerificationRequest::text(HINDI_TEXT))
            .await
            .unwrap();
        let second = pipeline(scripted_llm())
            .verify(VerificationRequest::text(HINDI_TEXT))
            .await
            .unwrap();

        let outcome = |report: &crate::VerificationReport| -> Vec<(Verdict, u8)> {
            report
                .result
                .claims
                .iter()
                .map(|c| (c.verdict, c.confidence))
                .collect()
        };
        assert_eq!(outcome(&first), outcome(&second));
        assert_eq!(first.result.overall_assessment, second.result.overall_assessment);
    }

    #[tokio::test]
    async fn test_no_claims_found() {
        let mut llm = MockProvider::new(SILENT);
        llm.add_response_containing("Identify the primary language", "English");
        llm.add_response_containing("Extract all factual claims", r#"{"claims": []}"#);
        let pipeline = pipeline(llm.clone());

        let report = pipeline
            .verify(VerificationRequest::text("What a lovely morning it is today!"))
            .await
            .unwrap();

        assert!(report.result.claims.is_empty());
        assert_eq!(report.result.overall_assessment, NO_CLAIMS_ASSESSMENT);
        assert_eq!(report.result.detected_language, Language::English);
        assert_eq!(llm.call_count(), 2);

        let stats = pipeline.stats().await.unwrap();
        assert_eq!(stats.total_articles, 1);
        assert_eq!(stats.total_claims, 0);
    }

    #[tokio::test]
    async fn test_stage_failures_persist_nothing() {
        let mut untranslatable = scripted_llm_without("Translate the following");
        untranslatable.add_error_containing("Translate the following");
        let pipeline_a = pipeline(untranslatable);
        let result = pipeline_a.verify(VerificationRequest::text(HINDI_TEXT)).await;
        assert!(matches!(result, Err(PipelineError::Translation(_))));
        assert_eq!(pipeline_a.stats().await.unwrap().total_articles, 0);

        let mut garbled = scripted_llm_without("Extract all factual claims");
        garbled.add_response_containing("Extract all factual claims", "Sure! Here are the claims:");
        let pipeline_b = pipeline(garbled);
        let result = pipeline_b.verify(VerificationRequest::text(HINDI_TEXT)).await;
        assert!(matches!(result, Err(PipelineError::ModelResponse(_))));
        assert_eq!(pipeline_b.stats().await.unwrap().total_articles, 0);
    }

    /// Same script as [`scripted_llm`] with one stage left unconfigured
    fn scripted_llm_without(stage: &str) -> MockProvider {
        let mut llm = MockProvider::new(SILENT);
        if stage != "Identify the primary language" {
            llm.add_response_containing("Identify the primary language", "Hindi");
        }
        if stage != "Translate the following" {
            llm.add_response_containing("Translate the following", ENGLISH_TEXT);
        }
        if stage != "Extract all factual claims" {
            llm.add_response_containing("Extract all factual claims", claims_json(&[SCHOOLS]));
        }
        llm.add_response_containing(
            "Write a clear explanation",
            r#"{"explanation": "Trusted sources were consulted."}"#,
        );
        llm
    }

    #[tokio::test]
    async fn test_short_content_rejected_before_any_llm_call() {
        let llm = scripted_llm();
        let pipeline = pipeline(llm.clone());
        let result = pipeline.verify(VerificationRequest::text("Fake!")).await;
        assert!(matches!(result, Err(PipelineError::ContentTooShort(5, 10))));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_result() {
        let pipeline = VerificationPipeline::new(
            scripted_llm(),
            FailingStore,
            Arc::new(PageFetcher("")),
            SourceRegistry::builtin(),
            PipelineConfig::default(),
        )
        .unwrap();

        let report = pipeline.verify(VerificationRequest::text(HINDI_TEXT)).await.unwrap();
        assert_eq!(report.result.claims.len(), 2);
        let error = report.persistence_error.expect("persistence error should be reported");
        assert!(error.contains("disk full"));

        assert!(matches!(pipeline.stats().await, Err(PipelineError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_url_input() {
        let mut llm = MockProvider::new(SILENT);
        llm.add_response_containing("Identify the primary language", "English");
        llm.add_response_containing("Extract all factual claims", claims_json(&[RAIN]));
        llm.add_response_containing(
            "Write a clear explanation",
            r#"{"explanation": "None found."}"#,
        );

        let pipeline = VerificationPipeline::new(
            llm.clone(),
            SqliteStore::new(":memory:").unwrap(),
            Arc::new(PageFetcher(
                "<html><script>track()</script><body><h1>Delhi</h1><p>It rained in New Delhi.</p></body></html>",
            )),
            SourceRegistry::builtin(),
            PipelineConfig::default(),
        )
        .unwrap();

        let report = pipeline
            .verify(VerificationRequest::url("https://news.example.in/delhi-rain"))
            .await
            .unwrap();
        assert_eq!(report.result.original_text, "Delhi It rained in New Delhi.");
        assert_eq!(report.result.claims[0].verdict, Verdict::Unverified);

        let stored = pipeline.history(1).await.unwrap();
        assert_eq!(stored[0].article.content, "https://news.example.in/delhi-rain");
        assert!(llm.prompts()[0].contains("It rained in New Delhi."));
    }

    #[tokio::test]
    async fn test_image_input_never_stores_bytes() {
        let mut llm = scripted_llm();
        llm.set_ocr_text(Some(HINDI_TEXT));
        let pipeline = pipeline(llm);

        let report = pipeline
            .verify(VerificationRequest::image("data:image/png;base64,iVBORw0KGgo="))
            .await
            .unwrap();
        assert_eq!(report.result.detected_language, Language::Hindi);

        let stored = pipeline.history(1).await.unwrap();
        assert_eq!(stored[0].article.content, "image/png:8 bytes");
        assert_eq!(stored[0].article.original_text, HINDI_TEXT);
    }

    #[tokio::test]
    async fn test_long_text_excerpt() {
        let long_text = format!("{} {}", ENGLISH_TEXT, "More words follow here. ".repeat(40));
        let mut llm = MockProvider::new(SILENT);
        llm.add_response_containing("Identify the primary language", "English");
        llm.add_response_containing("Extract all factual claims", "[]");
        let pipeline = pipeline(llm);

        let report = pipeline.verify(VerificationRequest::text(&long_text)).await.unwrap();
        assert!(report.result.original_text.ends_with("..."));
        assert_eq!(report.result.original_text.chars().count(), 503);

        let stored = pipeline.history(1).await.unwrap();
        assert_eq!(stored[0].article.original_text, long_text.trim());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let mut llm = MockProvider::new(SILENT);
        llm.add_response_containing("Identify the primary language", "English");
        llm.add_response_containing("Extract all factual claims", "[]");
        let pipeline = pipeline(llm);

        let mut ids = Vec::new();
        for i in 0..3 {
            let report = pipeline
                .verify(VerificationRequest::text(format!("Headline number {} for testing", i)))
                .await
                .unwrap();
            ids.push(report.result.article_id);
        }

        let history = pipeline.history(2).await.unwrap();
        let listed: Vec<_> = history.iter().map(|d| d.article.id).collect();
        assert_eq!(listed, vec![ids[2], ids[1]]);
        assert_eq!(pipeline.history(10_000).await.unwrap().len(), 3);
    }

    #[test]
    fn test_sources_sorted_by_credibility() {
        let pipeline = pipeline(MockProvider::default());
        let sources = pipeline.sources();
        assert_eq!(sources.len(), 18);
        assert!(sources.windows(2).all(|w| w[0].credibility >= w[1].credibility));
        assert_eq!(sources[0].reputation, "Highly Trusted");
        assert_eq!(sources.last().map(|s| s.name.as_str()), Some("Postcard News"));
    }

    #[test]
    fn test_empty_stats_without_runtime_setup() {
        let pipeline = pipeline(MockProvider::default());
        let stats = tokio_test::block_on(pipeline.stats()).unwrap();
        assert_eq!(stats, VerificationStats::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = PipelineConfig::default();
        config.max_claims = 0;
        let result = VerificationPipeline::new(
            MockProvider::default(),
            SqliteStore::new(":memory:").unwrap(),
            Arc::new(PageFetcher("")),
            SourceRegistry::builtin(),
            config,
        );
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_verify_runs_on_spawned_task() {
        let pipeline = Arc::new(pipeline(scripted_llm()));

        let task = {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move {
                pipeline
                    .verify(VerificationRequest::text(HINDI_TEXT))
                    .await
            })
        };
        let report = task.await.unwrap().unwrap();

        assert_eq!(report.result.claims.len(), 2);
        assert_eq!(report.result.claims[0].verdict, Verdict::False);
        assert_eq!(pipeline.stats().await.unwrap().total_articles, 1);
    }
}
