//! Property tests for the statistics engine and pip math.
//!
//! Uses proptest to verify:
//! 1. Count identity: wins + losses + breakeven == total, per bucket too
//! 2. Order independence: any permutation yields identical stats
//! 3. No NaN or infinity in any ratio, even at extreme price magnitudes
//! 4. Profit factor is 0 without losing trades
//! 5. Pip scale: JPY pairs use 100, everything else 10 000

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use fxjournal_core::domain::{Direction, EntryType, Outcome, Trade, TradeDraft};
use fxjournal_core::format::{calculate_pips, pip_scale};
use fxjournal_core::store::Journal;
use fxjournal_core::{calculate_stats, generate_chart_data};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Win),
        Just(Outcome::Loss),
        Just(Outcome::Breakeven)
    ]
}

fn arb_entry_type() -> impl Strategy<Value = EntryType> {
    (0..EntryType::ALL.len()).prop_map(|i| EntryType::ALL[i])
}

fn arb_price() -> impl Strategy<Value = f64> {
    (0.5..200.0_f64).prop_map(|p| (p * 10_000.0).round() / 10_000.0)
}

fn arb_extreme_price() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e308..1e308_f64,
        Just(f64::MAX),
        Just(-f64::MAX),
        Just(1e-320),
        Just(0.0),
    ]
}

fn arb_entry_time() -> impl Strategy<Value = NaiveDateTime> {
    (2022..2026i32, 1..=12u32, 1..=28u32).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    })
}

prop_compose! {
    fn arb_draft()(
        outcome in arb_outcome(),
        entry_type in arb_entry_type(),
        entry in arb_price(),
        exit in arb_price(),
        volume in 0.0..10.0_f64,
        stop_loss in proptest::option::of(arb_price()),
        take_profit in proptest::option::of(arb_price()),
        when in arb_entry_time(),
    ) -> TradeDraft {
        let mut draft = TradeDraft::new(
            "EUR/USD", entry_type, outcome, Direction::Buy, when, entry, exit, volume,
        );
        draft.stop_loss = stop_loss;
        draft.take_profit = take_profit;
        draft
    }
}

prop_compose! {
    fn arb_extreme_draft()(
        base in arb_draft(),
        entry in arb_extreme_price(),
        exit in arb_extreme_price(),
        stop_loss in proptest::option::of(arb_extreme_price()),
        take_profit in proptest::option::of(arb_extreme_price()),
        volume in prop_oneof![0.0..1e308_f64, Just(f64::MAX)],
    ) -> TradeDraft {
        TradeDraft {
            entry_price: entry,
            exit_price: exit,
            stop_loss,
            take_profit,
            volume,
            ..base
        }
    }
}

/// Store drafts through the journal so ids and derived fields are real.
fn stored(drafts: Vec<TradeDraft>) -> Vec<Trade> {
    let mut journal = Journal::in_memory();
    for draft in drafts {
        journal.add_trade(draft).unwrap();
    }
    journal.all_trades()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outcome_counts_sum_to_total(drafts in prop::collection::vec(arb_draft(), 1..40)) {
        let stats = calculate_stats(&stored(drafts));
        prop_assert_eq!(stats.wins + stats.losses + stats.breakeven, stats.total_trades);

        let by_type: usize = stats.by_entry_type.values().map(|b| b.total).sum();
        let by_month: usize = stats.by_month.values().map(|b| b.total).sum();
        prop_assert_eq!(by_type, stats.total_trades);
        prop_assert_eq!(by_month, stats.total_trades);
        for bucket in stats.by_entry_type.values().chain(stats.by_month.values()) {
            prop_assert_eq!(bucket.wins + bucket.losses + bucket.breakeven, bucket.total);
        }
    }

    #[test]
    fn stats_do_not_depend_on_order(
        drafts in prop::collection::vec(arb_draft(), 0..30),
        seed in any::<u64>(),
    ) {
        let trades = stored(drafts);
        let mut shuffled = trades.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed;
        for i in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            shuffled.swap(i, j);
        }

        prop_assert_eq!(calculate_stats(&trades), calculate_stats(&shuffled));

        let as_of = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        prop_assert_eq!(
            generate_chart_data(&trades, as_of),
            generate_chart_data(&shuffled, as_of)
        );
    }

    #[test]
    fn ratios_are_always_finite(drafts in prop::collection::vec(arb_draft(), 0..30)) {
        let stats = calculate_stats(&stored(drafts));
        for v in [
            stats.win_rate,
            stats.average_rr,
            stats.profit_factor,
            stats.total_profit,
            stats.total_loss,
        ] {
            prop_assert!(v.is_finite());
        }
        for bucket in stats.by_entry_type.values().chain(stats.by_month.values()) {
            prop_assert!(bucket.win_rate.is_finite());
            prop_assert!((0.0..=100.0).contains(&bucket.win_rate));
        }
    }

    #[test]
    fn extreme_magnitudes_stay_finite(drafts in prop::collection::vec(arb_extreme_draft(), 0..20)) {
        let trades = stored(drafts);
        for trade in &trades {
            prop_assert!(trade.risk_reward_ratio.is_finite());
        }
        let stats = calculate_stats(&trades);
        for v in [
            stats.average_rr,
            stats.profit_factor,
            stats.total_profit,
            stats.total_loss,
        ] {
            prop_assert!(v.is_finite());
        }
    }

    #[test]
    fn no_losses_means_zero_profit_factor(
        drafts in prop::collection::vec(arb_draft(), 1..30),
    ) {
        let drafts: Vec<TradeDraft> = drafts
            .into_iter()
            .map(|mut d| {
                if d.outcome == Outcome::Loss {
                    d.outcome = Outcome::Win;
                }
                d
            })
            .collect();
        let stats = calculate_stats(&stored(drafts));
        prop_assert_eq!(stats.losses, 0);
        prop_assert_eq!(stats.profit_factor, 0.0);
    }

    #[test]
    fn pip_scale_depends_only_on_jpy(diff in -5.0..5.0_f64, base in "[A-Z]{3}") {
        let standard = format!("{base}/USD");
        let jpy = format!("{base}/JPY");
        prop_assume!(!standard.contains("JPY"));

        prop_assert_eq!(pip_scale(&standard), 10_000.0);
        prop_assert_eq!(pip_scale(&jpy), 100.0);
        prop_assert_eq!(calculate_pips(diff, &standard), diff.abs() * 10_000.0);
        prop_assert_eq!(calculate_pips(diff, &jpy), diff.abs() * 100.0);
        prop_assert!(calculate_pips(diff, &jpy) >= 0.0);
    }
}

#[test]
fn empty_collection_is_all_zero() {
    let stats = calculate_stats(&[]);
    assert_eq!(stats.total_trades, 0);
    assert_eq!(stats.win_rate, 0.0);
    assert_eq!(stats.by_entry_type.len(), EntryType::ALL.len());
}

#[test]
fn pip_examples() {
    assert!((calculate_pips(0.0050, "EUR/USD") - 50.0).abs() < 1e-9);
    assert!((calculate_pips(0.50, "USD/JPY") - 50.0).abs() < 1e-9);
}
