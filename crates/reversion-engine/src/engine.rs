//! The daily trading run.

use chrono::Utc;
use reversion_core::error::EngineResult;
use reversion_core::traits::{Broker, MarketData};
use reversion_core::types::{
    AssetClass, DecisionReason, ExecutedTrade, OrderAmount, OrderRequest, Side, SkipReason,
    Skipped, TimeInForce, TradeDecision,
};
use reversion_screener::{
    BuyCandidate, OpportunityScreener, PositionScreener, ScreenerConfig, SellCandidate,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::rebalance::{cash_share, plan_rebalance, split_cash, RebalanceConfig};

/// What a run did: submitted orders plus every symbol it excluded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Whether the equities market was open during the run
    pub market_open: bool,
    /// Signal-driven sells
    pub sells: Vec<ExecutedTrade>,
    /// Notional sales raising cash back to the reserve target
    pub rebalance_sales: Vec<ExecutedTrade>,
    /// Buys funded by the post-sell cash balance
    pub buys: Vec<ExecutedTrade>,
    /// Symbols excluded at any stage, with reasons
    pub skipped: Vec<Skipped>,
}

impl RunReport {
    /// One-line summary of the sell phase.
    pub fn sold_message(&self) -> String {
        if self.sells.is_empty() {
            "• liquidated no positions based on the sell criteria".to_string()
        } else {
            format!(
                "• executed sell orders for {} based on the sell criteria",
                join_symbols(&self.sells)
            )
        }
    }

    /// One-line summary of the buy phase.
    pub fn bought_message(&self) -> String {
        if self.buys.is_empty() {
            "• executed no buy orders based on the buy criteria".to_string()
        } else {
            format!(
                "• executed buy orders for {} based on the buy criteria",
                join_symbols(&self.buys)
            )
        }
    }

    pub fn summary(&self) -> String {
        format!("{}\n{}", self.sold_message(), self.bought_message())
    }
}

fn join_symbols(trades: &[ExecutedTrade]) -> String {
    let symbols: Vec<&str> = trades.iter().map(|t| t.symbol.as_str()).collect();
    match symbols.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{} and {}", first, second),
        [init @ .., last] => format!("{}, and {}", init.join(", "), last),
    }
}

/// Signal orders rest GTC; the brokerage only accepts notional equity
/// orders with Day time in force.
fn time_in_force(decision: &TradeDecision) -> TimeInForce {
    match (decision.reason, decision.asset_class, decision.amount) {
        (DecisionReason::CashRebalance, _, _) => TimeInForce::Day,
        (_, AssetClass::Equity, OrderAmount::Notional(_)) => TimeInForce::Day,
        _ => TimeInForce::Gtc,
    }
}

/// Runs one full trading cycle: screen, sell, rebalance, buy.
///
/// Order failures are recorded per symbol and never abort the run;
/// account-level failures (account, positions, market clock) propagate.
pub struct TradingEngine<'a> {
    broker: &'a dyn Broker,
    data: &'a dyn MarketData,
    screener: ScreenerConfig,
    rebalance: RebalanceConfig,
    dry_run: bool,
}

impl<'a> TradingEngine<'a> {
    pub fn new(
        broker: &'a dyn Broker,
        data: &'a dyn MarketData,
        screener: ScreenerConfig,
        rebalance: RebalanceConfig,
    ) -> Self {
        Self {
            broker,
            data,
            screener,
            rebalance,
            dry_run: false,
        }
    }

    /// Plan the run without submitting any orders.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute the full daily cycle.
    pub async fn run(&self) -> EngineResult<RunReport> {
        let market_open = self.broker.is_market_open().await?;
        info!(
            market_open,
            broker = self.broker.name(),
            data = self.data.name(),
            dry_run = self.dry_run,
            "starting trading run"
        );

        let opportunities = OpportunityScreener::new(self.data, &self.screener)
            .screen()
            .await?;
        let positions = self.broker.get_positions().await?;
        let held = PositionScreener::new(self.data, &self.screener)
            .screen(&positions)
            .await;

        let mut report = RunReport {
            market_open,
            ..RunReport::default()
        };
        report.skipped.extend(held.skipped);
        report.skipped.extend(opportunities.skipped);

        self.sell_phase(held.candidates, market_open, &mut report)
            .await;
        self.rebalance_phase(&mut report).await?;
        self.buy_phase(opportunities.candidates, market_open, &mut report)
            .await?;

        info!(
            sells = report.sells.len(),
            rebalance_sales = report.rebalance_sales.len(),
            buys = report.buys.len(),
            skipped = report.skipped.len(),
            "trading run complete"
        );
        Ok(report)
    }

    /// Liquidate the full held quantity of every sell candidate.
    async fn sell_phase(
        &self,
        candidates: Vec<SellCandidate>,
        market_open: bool,
        report: &mut RunReport,
    ) {
        for candidate in candidates {
            let position = candidate.position;
            if !market_open && !position.asset_class.trades_when_market_closed() {
                report
                    .skipped
                    .push(Skipped::new(position.symbol, SkipReason::MarketClosed));
                continue;
            }

            let decision = TradeDecision {
                symbol: position.symbol,
                asset_class: position.asset_class,
                side: Side::Sell,
                amount: OrderAmount::Quantity(position.quantity),
                reason: DecisionReason::TechnicalSignal,
            };
            if let Some(trade) = self.submit(decision, report).await {
                report.sells.push(trade);
            }
        }
    }

    /// Raise cash back to the reserve target from the most profitable
    /// tier of remaining positions.
    async fn rebalance_phase(&self, report: &mut RunReport) -> EngineResult<()> {
        let account = self.broker.get_account().await?;
        let positions = self.broker.get_positions().await?;

        let share = cash_share(account.cash, &positions);
        if share >= self.rebalance.cash_reserve_pct {
            debug!(%share, "cash at or above reserve target, no rebalance");
            return Ok(());
        }
        info!(
            %share,
            target = %self.rebalance.cash_reserve_pct,
            "cash below reserve target, rebalancing"
        );

        for sale in plan_rebalance(account.cash, &positions, &self.rebalance) {
            if sale.notional == Decimal::ZERO {
                report
                    .skipped
                    .push(Skipped::new(sale.position.symbol, SkipReason::ZeroNotional));
                continue;
            }

            let decision = TradeDecision {
                symbol: sale.position.symbol,
                asset_class: sale.position.asset_class,
                side: Side::Sell,
                amount: OrderAmount::Notional(sale.notional),
                reason: DecisionReason::CashRebalance,
            };
            if let Some(trade) = self.submit(decision, report).await {
                report.rebalance_sales.push(trade);
            }
        }
        Ok(())
    }

    /// Split the post-sell cash balance evenly across the eligible buys.
    async fn buy_phase(
        &self,
        candidates: Vec<BuyCandidate>,
        market_open: bool,
        report: &mut RunReport,
    ) -> EngineResult<()> {
        let mut eligible = Vec::new();
        for candidate in candidates {
            if !market_open && !candidate.asset_class.trades_when_market_closed() {
                report
                    .skipped
                    .push(Skipped::new(candidate.symbol, SkipReason::MarketClosed));
            } else {
                eligible.push(candidate);
            }
        }
        if eligible.is_empty() {
            return Ok(());
        }

        let account = self.broker.get_account().await?;
        let notional = split_cash(account.cash, eligible.len());
        if notional == Decimal::ZERO {
            for candidate in eligible {
                report
                    .skipped
                    .push(Skipped::new(candidate.symbol, SkipReason::ZeroNotional));
            }
            return Ok(());
        }

        for candidate in eligible {
            let decision = TradeDecision {
                symbol: candidate.symbol,
                asset_class: candidate.asset_class,
                side: Side::Buy,
                amount: OrderAmount::Notional(notional),
                reason: DecisionReason::TechnicalSignal,
            };
            if let Some(trade) = self.submit(decision, report).await {
                report.buys.push(trade);
            }
        }
        Ok(())
    }

    /// Submit one decision; a rejection becomes a recorded skip.
    async fn submit(&self, decision: TradeDecision, report: &mut RunReport) -> Option<ExecutedTrade> {
        if self.dry_run {
            info!(
                symbol = %decision.symbol,
                side = %decision.side,
                amount = %decision.amount,
                reason = %decision.reason,
                "dry run, order not submitted"
            );
            return Some(ExecutedTrade {
                symbol: decision.symbol,
                side: decision.side,
                amount: decision.amount,
                submitted_at: Utc::now(),
            });
        }

        let request = OrderRequest::market(
            decision.symbol.as_str(),
            decision.asset_class,
            decision.side,
            decision.amount,
        )
        .with_time_in_force(time_in_force(&decision));

        match self.broker.submit_order(request).await {
            Ok(order) => {
                info!(
                    symbol = %decision.symbol,
                    side = %decision.side,
                    amount = %decision.amount,
                    reason = %decision.reason,
                    "order submitted"
                );
                Some(ExecutedTrade {
                    symbol: decision.symbol,
                    side: decision.side,
                    amount: decision.amount,
                    submitted_at: order.created_at,
                })
            }
            Err(e) => {
                warn!(symbol = %decision.symbol, error = %e, "order rejected, skipping");
                report.skipped.push(Skipped::new(
                    decision.symbol,
                    SkipReason::OrderRejected(e.to_string()),
                ));
                None
            }
        }
    }
}
