use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use allocator::allocate;
use common::{
    Asset, DayPhase, DayReport, Error, LeverageBudget, MarketDataFeed, Result, SignalRow,
    SkipReason, Skipped,
};
use strategy::{partition, MomentumConfig, SignalComputer};

use crate::executor::RebalanceDriver;
use crate::schedule::DailySchedule;

/// Tracks one trading day through the fixed phase order.
#[derive(Debug, Clone)]
pub struct DayCycle {
    trade_date: NaiveDate,
    phase: DayPhase,
}

impl DayCycle {
    pub fn new(trade_date: NaiveDate) -> Self {
        Self {
            trade_date,
            phase: DayPhase::Idle,
        }
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.trade_date
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    /// Move to `to`, which must be the phase directly after the current one.
    pub fn advance(&mut self, to: DayPhase) -> Result<()> {
        let expected = self.phase.next();
        if to != expected {
            return Err(Error::OutOfSequence { expected, found: to });
        }
        info!(trade_date = %self.trade_date, from = %self.phase, to = %to, "Day cycle advanced");
        self.phase = to;
        Ok(())
    }
}

/// Signal output staged before the open, handed to the rebalance after it.
/// Not `Clone`: a staged day is rebalanced at most once.
#[derive(Debug)]
pub struct StagedDay {
    cycle: DayCycle,
    as_of: NaiveDate,
    rows: Vec<SignalRow>,
    excluded: Vec<Skipped>,
}

impl StagedDay {
    pub fn trade_date(&self) -> NaiveDate {
        self.cycle.trade_date()
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    /// Eligible assets that produced no signal row.
    pub fn excluded(&self) -> &[Skipped] {
        &self.excluded
    }
}

/// Runs the daily signal → basket → weight → order pipeline.
///
/// Holds only configuration and collaborators; every day is computed from
/// scratch and nothing carries over between days.
pub struct Engine {
    computer: SignalComputer,
    budget: LeverageBudget,
    feed: Arc<dyn MarketDataFeed>,
    driver: RebalanceDriver,
}

impl Engine {
    pub fn new(config: &MomentumConfig, feed: Arc<dyn MarketDataFeed>, driver: RebalanceDriver) -> Self {
        let budget = config.leverage();
        info!(
            window_length = config.window_length,
            signal_multiplier = config.signal_multiplier,
            long_leverage = budget.long_leverage,
            short_leverage = budget.short_leverage,
            "Engine configured"
        );
        Self {
            computer: SignalComputer::from_config(config),
            budget,
            feed,
            driver,
        }
    }

    /// Pre-open step: compute signal rows from closes up to `as_of`.
    ///
    /// Only a failure to read the universe is an error; per-asset problems
    /// exclude that asset and are listed in the staged day.
    pub async fn stage_signal(&self, trade_date: NaiveDate, as_of: NaiveDate) -> Result<StagedDay> {
        let mut cycle = DayCycle::new(trade_date);

        let mut universe = self.feed.eligible_assets(as_of).await?;
        universe.sort();
        universe.dedup();

        let window = self.computer.window_length();
        let mut histories: Vec<(Asset, Vec<f64>)> = Vec::with_capacity(universe.len());
        let mut excluded = Vec::new();
        for asset in universe {
            match self.load_closes(&asset, as_of, window).await {
                Ok(closes) => histories.push((asset, closes)),
                Err(reason) => excluded.push(Skipped { asset, reason }),
            }
        }

        let (rows, rejected) = self
            .computer
            .evaluate_all(histories.iter().map(|(a, c)| (a, c.as_slice())));
        excluded.extend(rejected);

        for skip in &excluded {
            warn!(asset = %skip.asset, reason = %skip.reason, "Asset excluded from signal");
        }

        cycle.advance(DayPhase::SignalStaged)?;
        info!(
            trade_date = %trade_date,
            as_of = %as_of,
            rows = rows.len(),
            excluded = excluded.len(),
            "Signal staged"
        );

        Ok(StagedDay {
            cycle,
            as_of,
            rows,
            excluded,
        })
    }

    /// Post-open step: partition, weight and submit. Consumes the staged day.
    pub async fn rebalance(&self, staged: StagedDay) -> Result<DayReport> {
        let StagedDay {
            mut cycle,
            as_of,
            rows,
            excluded,
        } = staged;

        let basket = partition(&rows);
        cycle.advance(DayPhase::BasketsPartitioned)?;

        let targets = allocate(&basket, &self.budget);
        cycle.advance(DayPhase::WeightsComputed)?;

        let outcome = self.driver.submit(&targets).await;
        cycle.advance(DayPhase::OrdersSubmitted)?;

        let mut skipped = excluded;
        skipped.extend(outcome.skipped);

        let report = DayReport {
            trade_date: cycle.trade_date(),
            as_of,
            longs: basket.longs.len(),
            shorts: basket.shorts.len(),
            submitted: outcome.submitted,
            skipped,
        };
        cycle.advance(DayPhase::Idle)?;
        Ok(report)
    }

    /// End-of-day record of the cycle.
    pub fn record(&self, report: &DayReport) {
        info!(
            trade_date = %report.trade_date,
            as_of = %report.as_of,
            longs = report.longs,
            shorts = report.shorts,
            submitted = report.submitted.len(),
            skipped = report.skipped.len(),
            gross_exposure = report.gross_exposure(),
            net_exposure = report.net_exposure(),
            "Day recorded"
        );
    }

    /// Stage, rebalance and record one day back to back.
    pub async fn run_day(&self, trade_date: NaiveDate, as_of: NaiveDate) -> Result<DayReport> {
        let staged = self.stage_signal(trade_date, as_of).await?;
        let report = self.rebalance(staged).await?;
        self.record(&report);
        Ok(report)
    }

    /// Run every session after the first, each using the previous session's
    /// closes. A day that fails is logged and abandoned; the next starts fresh.
    pub async fn replay(&self, sessions: &[NaiveDate]) -> Vec<DayReport> {
        let mut reports = Vec::new();
        for pair in sessions.windows(2) {
            let (as_of, trade_date) = (pair[0], pair[1]);
            match self.run_day(trade_date, as_of).await {
                Ok(report) => reports.push(report),
                Err(e) => error!(trade_date = %trade_date, error = %e, "Day abandoned"),
            }
        }
        info!(days = reports.len(), "Replay finished");
        reports
    }

    /// Drive the cycle from the wall clock. Never returns.
    pub async fn run_scheduled(&self, schedule: DailySchedule) {
        info!("Engine running on daily schedule");
        loop {
            let trade_date = schedule.next_cycle_day(Utc::now());
            let as_of = schedule.previous_session(trade_date);

            sleep_until(schedule.stage_at(trade_date)).await;
            let staged = match self.stage_signal(trade_date, as_of).await {
                Ok(staged) => staged,
                Err(e) => {
                    error!(trade_date = %trade_date, error = %e, "Staging failed, day abandoned");
                    sleep_until(schedule.close_at(trade_date)).await;
                    continue;
                }
            };

            sleep_until(schedule.rebalance_at(trade_date)).await;
            let report = match self.rebalance(staged).await {
                Ok(report) => report,
                Err(e) => {
                    error!(trade_date = %trade_date, error = %e, "Rebalance failed, day abandoned");
                    sleep_until(schedule.close_at(trade_date)).await;
                    continue;
                }
            };

            sleep_until(schedule.close_at(trade_date)).await;
            self.record(&report);
        }
    }

    async fn load_closes(
        &self,
        asset: &Asset,
        as_of: NaiveDate,
        window: usize,
    ) -> std::result::Result<Vec<f64>, SkipReason> {
        let close = self
            .feed
            .closing_price(asset, as_of)
            .await
            .map_err(|e| SkipReason::FeedError(e.to_string()))?;
        if close.is_none() {
            return Err(SkipReason::MissingClose);
        }

        let history = self
            .feed
            .trailing_closes(asset, as_of, window)
            .await
            .map_err(|e| SkipReason::FeedError(e.to_string()))?;
        Ok(history.into_iter().map(|o| o.close).collect())
    }
}

async fn sleep_until(at: chrono::DateTime<Utc>) {
    let wait = (at - Utc::now()).to_std().unwrap_or_default();
    tokio::time::sleep(wait).await;
}

// ─── Tests ────────────────────────────────────────────────────────────────────
