#[cfg(test)]
mod dashboard_context_tests {
    use crate::context::{DashboardContext, RefreshMode};
    use crate::retry::RetryPolicy;
    use crate::scheduler::RefreshScheduler;
    use ai_analysis::MockAnalytics;
    use async_trait::async_trait;
    use chrono::Utc;
    use dashboard_core::{
        ApiKeys, CredentialName, DashboardError, MarketDataProvider, Quote, Recommendation, Stock,
    };
    use notification_service::{NotificationLevel, NotificationService};
    use portfolio_manager::{Holding, HoldingStore, NewHolding, PortfolioDb};
    use dashboard_core::DashboardResult;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Market stand-in with scripted prices, failures and latency
    #[derive(Default)]
    struct ScriptedMarket {
        calls: AtomicU32,
        delay: Duration,
        failures: u32,
        prices: HashMap<String, Decimal>,
        skip: Option<String>,
        stray_quote: bool,
    }

    impl ScriptedMarket {
        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for ScriptedMarket {
        async fn fetch_quotes(&self, stocks: &[Stock]) -> Result<Vec<Quote>, DashboardError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if n < self.failures {
                return Err(DashboardError::Provider("feed offline".to_string()));
            }

            let mut quotes: Vec<Quote> = stocks
                .iter()
                .filter(|s| self.skip.as_deref() != Some(s.symbol.as_str()))
                .map(|s| Quote {
                    symbol: s.symbol.clone(),
                    price: self.prices.get(&s.symbol).copied().unwrap_or(s.price + dec!(1)),
                    change: dec!(1.50),
                    change_percent: 0.25,
                    timestamp: Utc::now(),
                })
                .collect();

            if self.stray_quote {
                quotes.push(Quote {
                    symbol: "UNKNOWN.NS".to_string(),
                    price: dec!(100),
                    change: Decimal::ZERO,
                    change_percent: 0.0,
                    timestamp: Utc::now(),
                });
            }
            Ok(quotes)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn context_with(market: Arc<ScriptedMarket>) -> DashboardContext {
        DashboardContext::new(
            market,
            Arc::new(MockAnalytics::with_seed(Duration::ZERO, 9)),
            Arc::new(NotificationService::local()),
        )
        .with_retry(RetryPolicy::new(3, Duration::from_millis(500)))
    }

    fn holding(symbol: &str, shares: Decimal, buy_price: Decimal) -> NewHolding {
        NewHolding {
            symbol: symbol.to_string(),
            shares,
            buy_price,
            buy_date: "2024-01-01".to_string(),
        }
    }

    fn symbols(stocks: &[Stock]) -> Vec<String> {
        stocks.iter().map(|s| s.symbol.clone()).collect()
    }

    // -- Portfolio P/L -------------------------------------------------------

    #[tokio::test]
    async fn test_profit_loss_after_refresh() {
        let market = Arc::new(ScriptedMarket {
            prices: HashMap::from([("TCS.NS".to_string(), dec!(3850))]),
            ..Default::default()
        });
        let ctx = context_with(market);

        ctx.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        ctx.refresh().await.unwrap();

        let portfolio = ctx.portfolio().await;
        assert_eq!(portfolio.len(), 1);
        let h = &portfolio[0];
        assert_eq!(h.current_price, dec!(3850));
        assert_eq!(h.profit_loss, dec!(500));
        assert!((h.profit_loss_percent - 1.3157894736842106).abs() < 1e-9);
        assert_eq!(h.name, "Tata Consultancy Services");
    }

    #[tokio::test]
    async fn test_profit_loss_identity_holds_for_every_holding() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        ctx.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        ctx.add_holding(holding("INFY.NS", dec!(3.5), dec!(1500.10))).await.unwrap();
        ctx.add_holding(holding("tcs.ns", dec!(2), dec!(3900))).await.unwrap();

        for _ in 0..3 {
            ctx.refresh().await.unwrap();
            for h in ctx.portfolio().await {
                assert_eq!(h.profit_loss, (h.current_price - h.buy_price) * h.shares);
            }
        }
    }

    #[tokio::test]
    async fn test_holding_priced_at_creation() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        let h = ctx.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        assert_eq!(h.current_price, dec!(3850.25));
        assert_eq!(h.profit_loss, dec!(502.50));
    }

    #[tokio::test]
    async fn test_add_unknown_symbol_is_not_found() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        ctx.add_holding(holding("TCS.NS", dec!(1), dec!(100))).await.unwrap();

        let result = ctx.add_holding(holding("UNKNOWN.NS", dec!(5), dec!(100))).await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));
        assert_eq!(ctx.portfolio().await.len(), 1);

        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_values() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));

        for input in [
            holding("TCS.NS", dec!(0), dec!(100)),
            holding("TCS.NS", dec!(-1), dec!(100)),
            holding("TCS.NS", dec!(1), dec!(0)),
            holding("TCS.NS", dec!(1), dec!(-5)),
        ] {
            let result = ctx.add_holding(input).await;
            assert!(matches!(result, Err(DashboardError::Validation(_))));
        }
        assert!(ctx.portfolio().await.is_empty());
    }

    #[tokio::test]
    async fn test_validation_runs_before_lookup() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        let result = ctx.add_holding(holding("UNKNOWN.NS", dec!(0), dec!(100))).await;
        assert!(matches!(result, Err(DashboardError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_holding_is_idempotent() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        ctx.add_holding(holding("TCS.NS", dec!(1), dec!(100))).await.unwrap();
        ctx.add_holding(holding("INFY.NS", dec!(1), dec!(100))).await.unwrap();

        assert!(!ctx.remove_holding("RELIANCE.NS").await.unwrap());
        assert_eq!(ctx.portfolio().await.len(), 2);

        assert!(ctx.remove_holding("TCS.NS").await.unwrap());
        assert!(!ctx.remove_holding("TCS.NS").await.unwrap());
        let remaining = ctx.portfolio().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].symbol, "INFY.NS");
    }

    #[tokio::test]
    async fn test_portfolio_summary_totals() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        ctx.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        ctx.add_holding(holding("INFY.NS", dec!(10), dec!(1500))).await.unwrap();

        let summary = ctx.portfolio_summary().await;
        assert_eq!(summary.total_holdings, 2);
        assert_eq!(summary.total_investment, dec!(53000));
        assert_eq!(summary.current_value, dec!(53069.50));
        assert_eq!(summary.total_profit_loss, dec!(69.50));
    }

    // -- Refresh -------------------------------------------------------------

    #[tokio::test]
    async fn test_refresh_keeps_symbol_set() {
        let market = Arc::new(ScriptedMarket {
            stray_quote: true,
            ..Default::default()
        });
        let ctx = context_with(market);
        let before = symbols(&ctx.stocks().await);

        let report = ctx.refresh().await.unwrap();
        assert_eq!(report.updated, 5);
        assert_eq!(report.ignored, 1);
        assert_eq!(symbols(&ctx.stocks().await), before);
    }

    #[tokio::test]
    async fn test_stock_without_quote_keeps_numbers() {
        let market = Arc::new(ScriptedMarket {
            skip: Some("INFY.NS".to_string()),
            ..Default::default()
        });
        let ctx = context_with(market);
        let before = ctx.stock("INFY.NS").await.unwrap();

        let report = ctx.refresh().await.unwrap();
        assert_eq!(report.updated, 4);
        assert_eq!(ctx.stock("INFY.NS").await.unwrap(), before);
        assert_eq!(ctx.stock("TCS.NS").await.unwrap().price, dec!(3851.25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_refreshes_coalesce() {
        let market = Arc::new(ScriptedMarket {
            delay: Duration::from_millis(1500),
            ..Default::default()
        });
        let ctx = Arc::new(context_with(market.clone()));

        let (first, second) = tokio::join!(ctx.refresh(), ctx.refresh());
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(market.calls(), 1);
        assert_eq!(first, second);

        let status = ctx.status().await;
        assert_eq!(status.refresh_count, 1);
        assert_eq!(status.mode, RefreshMode::Idle);
        // exactly one +1 step was applied
        assert_eq!(ctx.stock("TCS.NS").await.unwrap().price, dec!(3851.25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_after_completion_fetches_again() {
        let market = Arc::new(ScriptedMarket::default());
        let ctx = context_with(market.clone());

        ctx.refresh().await.unwrap();
        ctx.refresh().await.unwrap();
        assert_eq!(market.calls(), 2);
        assert_eq!(ctx.status().await.refresh_count, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_mode_while_running() {
        let market = Arc::new(ScriptedMarket {
            delay: Duration::from_secs(5),
            ..Default::default()
        });
        let ctx = Arc::new(context_with(market));
        assert_eq!(ctx.refresh_mode(), RefreshMode::Idle);

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.refresh().await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ctx.refresh_mode(), RefreshMode::Refreshing);

        task.await.unwrap().unwrap();
        assert_eq!(ctx.refresh_mode(), RefreshMode::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_retries_transient_failures() {
        let market = Arc::new(ScriptedMarket {
            failures: 2,
            ..Default::default()
        });
        let ctx = context_with(market.clone());

        let report = ctx.refresh().await.unwrap();
        assert_eq!(report.attempts, 3);
        assert_eq!(market.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_failure_after_retries() {
        let market = Arc::new(ScriptedMarket {
            failures: 10,
            ..Default::default()
        });
        let ctx = context_with(market.clone());
        let before = ctx.stocks().await;

        let result = ctx.refresh().await;
        assert!(matches!(result, Err(DashboardError::RefreshFailure(_))));
        assert_eq!(market.calls(), 3);
        assert_eq!(ctx.stocks().await, before);
        assert!(ctx.status().await.last_refreshed.is_none());

        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Error);
        assert_eq!(recent[0].title, "Refresh failed");
    }

    #[tokio::test]
    async fn test_refresh_notifies_success() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        ctx.refresh().await.unwrap();
        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Success);
        assert!(ctx.status().await.last_refreshed.is_some());
    }

    // -- Scheduler -----------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_refreshes_on_interval_and_stops() {
        let market = Arc::new(ScriptedMarket::default());
        let ctx = Arc::new(context_with(market.clone()));
        let interval = Duration::from_secs(600);

        let scheduler = RefreshScheduler::start(ctx.clone(), interval);
        tokio::time::sleep(Duration::from_secs(599)).await;
        assert_eq!(market.calls(), 0);

        tokio::time::sleep(Duration::from_secs(602)).await;
        assert_eq!(market.calls(), 2);

        scheduler.shutdown().await;
        tokio::time::sleep(interval * 3).await;
        assert_eq!(market.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_cancels_it() {
        let market = Arc::new(ScriptedMarket::default());
        let ctx = Arc::new(context_with(market.clone()));

        let scheduler = RefreshScheduler::start(ctx, Duration::from_secs(60));
        drop(scheduler);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(market.calls(), 0);
    }

    // -- Settings ------------------------------------------------------------

    fn defaults() -> ApiKeys {
        let mut keys = ApiKeys::default();
        keys.set(CredentialName::Gemini, "gemini-default-key-1234");
        keys
    }

    #[tokio::test]
    async fn test_set_and_reset_credentials() {
        let ctx = context_with(Arc::new(ScriptedMarket::default())).with_credentials(defaults());

        ctx.set_credential(CredentialName::Groq, "gsk_abcdefghijkl").await.unwrap();
        assert_eq!(ctx.credential(CredentialName::Groq).await, "gsk_abcdefghijkl");
        assert_eq!(ctx.credentials().await.groq, "gsk_...ijkl");

        ctx.set_credential_named("twelveData", "short").await.unwrap();
        assert_eq!(ctx.credential(CredentialName::TwelveData).await, "short");

        ctx.reset_credentials().await.unwrap();
        assert_eq!(ctx.credential(CredentialName::Groq).await, "");
        assert_eq!(ctx.credential(CredentialName::Gemini).await, "gemini-default-key-1234");
    }

    #[tokio::test]
    async fn test_unknown_credential_name() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        let result = ctx.set_credential_named("bloomberg", "x").await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clear_data() {
        let ctx = context_with(Arc::new(ScriptedMarket::default())).with_credentials(defaults());
        ctx.add_holding(holding("TCS.NS", dec!(1), dec!(100))).await.unwrap();
        ctx.set_credential(CredentialName::Gemini, "changed").await.unwrap();

        ctx.clear_data().await.unwrap();
        assert!(ctx.portfolio().await.is_empty());
        assert_eq!(ctx.credential(CredentialName::Gemini).await, "gemini-default-key-1234");
    }

    // -- Views ---------------------------------------------------------------

    #[tokio::test]
    async fn test_recommended_views() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        let recs = ctx.recommendations().await;
        assert!(recs.stocks.len() <= 3);
        assert!(recs.stocks.iter().all(|s| s.recommendation == Recommendation::Buy));
        assert_eq!(recs.startups.len(), 3);
        assert_eq!(ctx.recommended_stocks().await.len(), recs.stocks.len());
        assert_eq!(ctx.recommended_startups().await.len(), 3);
    }

    #[tokio::test]
    async fn test_recommended_views_follow_collections() {
        let mut stocks = dashboard_core::seed::sample_stocks();
        for stock in &mut stocks {
            stock.recommendation = Recommendation::Hold;
        }
        let ctx = context_with(Arc::new(ScriptedMarket::default()))
            .with_collections(stocks, dashboard_core::seed::sample_startups());
        assert!(ctx.recommended_stocks().await.is_empty());
    }

    #[tokio::test]
    async fn test_stock_lookup_and_search() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        assert_eq!(ctx.stock("infy.ns").await.unwrap().name, "Infosys");
        assert!(matches!(ctx.stock("NOPE").await, Err(DashboardError::NotFound(_))));
        assert_eq!(ctx.search_stocks("reliance").await.len(), 1);
    }

    // -- Analysis ------------------------------------------------------------

    #[tokio::test]
    async fn test_analysis_for_known_symbol() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        let prediction = ctx.prediction("TCS.NS").await.unwrap();
        assert_eq!(prediction.symbol, "TCS.NS");
        let models = ctx.model_analysis("TCS.NS").await.unwrap();
        assert_eq!(models.results.len(), 4);
        let nlp = ctx.sentiment("HDFCBANK.NS").await.unwrap();
        assert_eq!(nlp.topics.len(), 3);
    }

    #[tokio::test]
    async fn test_analysis_unknown_symbol() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        assert!(matches!(ctx.prediction("ZZZ").await, Err(DashboardError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_timeout() {
        let ctx = DashboardContext::new(
            Arc::new(ScriptedMarket::default()),
            Arc::new(MockAnalytics::with_seed(Duration::from_secs(60), 1)),
            Arc::new(NotificationService::local()),
        )
        .with_analysis_timeout(Duration::from_secs(2));

        let result = ctx.model_analysis("TCS.NS").await;
        assert!(matches!(result, Err(DashboardError::Provider(_))));
    }

    #[tokio::test]
    async fn test_chat() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        assert!(ctx.chat("how is reliance?").await.unwrap().contains("RELIANCE.NS"));
        assert!(matches!(ctx.chat("   ").await, Err(DashboardError::Validation(_))));
    }

    // -- Persistence ---------------------------------------------------------

    #[tokio::test]
    async fn test_store_round_trip() {
        let db = Arc::new(PortfolioDb::new("sqlite::memory:").await.unwrap());

        let first = context_with(Arc::new(ScriptedMarket::default())).with_store(db.clone());
        first.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        first.add_holding(holding("INFY.NS", dec!(2), dec!(1400))).await.unwrap();
        first.remove_holding("INFY.NS").await.unwrap();
        first.set_credential(CredentialName::OpenAi, "sk-persisted-key-9999").await.unwrap();

        let second = context_with(Arc::new(ScriptedMarket::default())).with_store(db.clone());
        assert_eq!(second.load_persisted().await.unwrap(), 1);
        let portfolio = second.portfolio().await;
        assert_eq!(portfolio[0].symbol, "TCS.NS");
        assert_eq!(portfolio[0].profit_loss, dec!(502.50));
        assert_eq!(second.credential(CredentialName::OpenAi).await, "sk-persisted-key-9999");

        second.clear_data().await.unwrap();
        let third = context_with(Arc::new(ScriptedMarket::default())).with_store(db);
        assert_eq!(third.load_persisted().await.unwrap(), 0);
        assert_eq!(third.credential(CredentialName::OpenAi).await, "");
    }

    #[tokio::test]
    async fn test_load_without_store_is_noop() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));
        assert_eq!(ctx.load_persisted().await.unwrap(), 0);
    }

    // -- Oversized positions -------------------------------------------------

    fn ten_pow_28() -> Decimal {
        Decimal::from_i128_with_scale(10i128.pow(28), 0)
    }

    #[tokio::test]
    async fn test_oversized_position_is_rejected() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));

        let result = ctx.add_holding(holding("TCS.NS", ten_pow_28(), dec!(3850.25))).await;
        assert!(matches!(result, Err(DashboardError::Validation(_))));
        assert!(ctx.portfolio().await.is_empty());

        // summary and refresh stay usable
        assert_eq!(ctx.portfolio_summary().await.total_holdings, 0);
        ctx.refresh().await.unwrap();
    }

    #[tokio::test]
    async fn test_extreme_quote_does_not_break_refresh() {
        let market = Arc::new(ScriptedMarket {
            prices: HashMap::from([("TCS.NS".to_string(), Decimal::MAX)]),
            ..Default::default()
        });
        let ctx = Arc::new(context_with(market.clone()));
        ctx.add_holding(holding("TCS.NS", dec!(1000000000000), dec!(1000))).await.unwrap();

        let task = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.refresh().await })
        };
        task.await.unwrap().unwrap();

        let summary = ctx.portfolio_summary().await;
        assert_eq!(summary.current_value, Decimal::MAX);
        assert_eq!(ctx.portfolio().await[0].current_price, Decimal::MAX);

        ctx.refresh().await.unwrap();
        assert_eq!(market.calls(), 2);
    }

    // -- Store failures ------------------------------------------------------

    /// Accepts new holdings but fails every delete and credential write
    struct BrokenStore;

    fn disk_full<T>() -> DashboardResult<T> {
        Err(DashboardError::Storage("disk full".to_string()))
    }

    #[async_trait]
    impl HoldingStore for BrokenStore {
        async fn load_holdings(&self) -> DashboardResult<Vec<Holding>> {
            Ok(Vec::new())
        }

        async fn save_holding(&self, _holding: &Holding) -> DashboardResult<()> {
            Ok(())
        }

        async fn delete_holdings(&self, _symbol: &str) -> DashboardResult<u64> {
            disk_full()
        }

        async fn clear_holdings(&self) -> DashboardResult<()> {
            disk_full()
        }

        async fn load_credentials(&self) -> DashboardResult<Vec<(CredentialName, String)>> {
            Ok(Vec::new())
        }

        async fn save_credential(&self, _name: CredentialName, _value: &str) -> DashboardResult<()> {
            disk_full()
        }

        async fn clear_credentials(&self) -> DashboardResult<()> {
            disk_full()
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_store_failure_leaves_memory_unchanged() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()))
            .with_credentials(defaults())
            .with_store(Arc::new(BrokenStore));
        ctx.add_holding(holding("TCS.NS", dec!(10), dec!(3800))).await.unwrap();
        let before = ctx.portfolio().await;

        let result = ctx.remove_holding("TCS.NS").await;
        assert!(matches!(result, Err(DashboardError::Storage(_))));
        assert_eq!(ctx.portfolio().await, before);

        let result = ctx.set_credential(CredentialName::Groq, "gsk_new_value_1234").await;
        assert!(matches!(result, Err(DashboardError::Storage(_))));
        assert_eq!(ctx.credential(CredentialName::Groq).await, "");

        let result = ctx.reset_credentials().await;
        assert!(matches!(result, Err(DashboardError::Storage(_))));

        let result = ctx.clear_data().await;
        assert!(matches!(result, Err(DashboardError::Storage(_))));
        assert_eq!(ctx.portfolio().await, before);
        assert_eq!(ctx.credential(CredentialName::Gemini).await, "gemini-default-key-1234");

        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Error);
        assert_eq!(recent[0].title, "Could not clear data");
    }

    #[tokio::test]
    async fn test_failed_reset_keeps_current_credentials() {
        let ctx = context_with(Arc::new(ScriptedMarket::default())).with_credentials(defaults());
        ctx.set_credential(CredentialName::Gemini, "changed-in-memory").await.unwrap();

        let ctx = ctx.with_store(Arc::new(BrokenStore));
        assert!(ctx.reset_credentials().await.is_err());
        assert_eq!(ctx.credential(CredentialName::Gemini).await, "changed-in-memory");
    }

    #[tokio::test]
    async fn test_provider_key_change_asks_for_restart() {
        let ctx = context_with(Arc::new(ScriptedMarket::default()));

        ctx.set_credential(CredentialName::TwelveData, "td-new-key-5678").await.unwrap();
        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Info);
        assert_eq!(recent[0].title, "Restart required");

        ctx.set_credential(CredentialName::OpenAi, "sk-other").await.unwrap();
        let recent = ctx.notifications().recent(1).await;
        assert_eq!(recent[0].level, NotificationLevel::Success);
    }
}
