use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rilly_finance_core::errors::CoreError;
use rilly_finance_core::models::event::StoreEvent;
use rilly_finance_core::models::money::Money;
use rilly_finance_core::models::settings::Locale;
use rilly_finance_core::models::snapshot::PortfolioSnapshot;
use rilly_finance_core::models::transaction::Transaction;
use rilly_finance_core::models::view::Screen;
use rilly_finance_core::services::auth_gate::AuthGate;
use rilly_finance_core::services::chart_service::{ChartService, MAX_TRAJECTORY_POINTS};
use rilly_finance_core::services::format_service::{format_money, format_money_with, FormatService};
use rilly_finance_core::services::ledger_service::LedgerService;
use rilly_finance_core::services::notifier::Notifier;
use rust_decimal::Decimal;

fn eur(cents: i64) -> Money {
    Money::eur_cents(cents)
}

fn dec(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

// ═══════════════════════════════════════════════════════════════════
//  LedgerService
// ═══════════════════════════════════════════════════════════════════

mod ledger {
    use super::*;

    #[test]
    fn add_to_empty_snapshot() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::empty("EUR");
        let tx = Transaction::with_id("t1", "Coffee", "Heute", eur(-450));

        service.add_transaction(&mut snapshot, tx.clone()).unwrap();

        assert_eq!(snapshot.net_worth, eur(-450));
        assert_eq!(snapshot.transactions, vec![tx]);
    }

    #[test]
    fn newest_first() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::empty("EUR");
        for id in ["a", "b", "c"] {
            service
                .add_transaction(&mut snapshot, Transaction::with_id(id, "M", "Heute", eur(100)))
                .unwrap();
        }
        let ids: Vec<&str> = service
            .get_transactions(&snapshot)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(snapshot.net_worth, eur(300));
    }

    #[test]
    fn duplicate_id_rejected_without_change() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::demo();
        let before = snapshot.clone();

        let err = service
            .add_transaction(&mut snapshot, Transaction::with_id("1", "Again", "Heute", eur(-100)))
            .unwrap_err();

        match err {
            CoreError::DuplicateId(id) => assert_eq!(id, "1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(snapshot, before);
    }

    #[test]
    fn empty_id_rejected() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::empty("EUR");
        let err = service
            .add_transaction(&mut snapshot, Transaction::with_id("  ", "M", "Heute", eur(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(snapshot.transactions.is_empty());
    }

    #[test]
    fn foreign_currency_rejected() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::empty("EUR");
        let usd = Money::new(Decimal::ONE, "USD");
        let err = service
            .add_transaction(&mut snapshot, Transaction::with_id("t1", "M", "Heute", usd))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(snapshot.net_worth.is_zero());
    }

    #[test]
    fn net_worth_moves_by_exact_amount() {
        let service = LedgerService::new();
        let mut snapshot = PortfolioSnapshot::demo();
        let before = snapshot.net_worth.amount;
        service
            .add_transaction(&mut snapshot, Transaction::new("Miete", "Heute", eur(-123_456)))
            .unwrap();
        assert_eq!(snapshot.net_worth.amount - before, dec(-123_456));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Formatting
// ═══════════════════════════════════════════════════════════════════

mod formatting {
    use super::*;

    #[test]
    fn german_fixture() {
        assert_eq!(format_money(Decimal::new(-45, 1), "EUR"), "-4,50 €");
    }

    #[test]
    fn german_grouping() {
        assert_eq!(format_money(dec(14_250_000), "EUR"), "142.500,00 €");
        assert_eq!(format_money(dec(125_040_055), "EUR"), "1.250.400,55 €");
        assert_eq!(format_money(dec(99_999), "EUR"), "999,99 €");
    }

    #[test]
    fn english_convention() {
        assert_eq!(format_money_with(Locale::En, dec(-450), "EUR"), "-€4.50");
        assert_eq!(format_money_with(Locale::En, dec(123_450), "USD"), "$1,234.50");
        assert_eq!(format_money_with(Locale::En, dec(123_450), "CHF"), "CHF 1,234.50");
    }

    #[test]
    fn code_without_symbol() {
        assert_eq!(format_money(dec(123_450), "CHF"), "1.234,50 CHF");
        assert_eq!(format_money(dec(100), "gbp"), "1,00 £");
    }

    #[test]
    fn malformed_code_falls_back_to_eur() {
        assert_eq!(format_money(dec(100), "euro"), "1,00 €");
        assert_eq!(format_money(dec(100), ""), "1,00 €");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format_money(Decimal::new(1005, 3), "EUR"), "1,01 €");
        assert_eq!(format_money(Decimal::new(-1005, 3), "EUR"), "-1,01 €");
        assert_eq!(format_money(Decimal::new(12_344, 4), "EUR"), "1,23 €");
    }

    #[test]
    fn negative_zero_has_no_sign() {
        assert_eq!(format_money(Decimal::new(-1, 3), "EUR"), "0,00 €");
        assert_eq!(format_money(Decimal::ZERO, "EUR"), "0,00 €");
    }

    #[test]
    fn whole_numbers_get_two_decimals() {
        assert_eq!(format_money(Decimal::new(4500, 0), "EUR"), "4.500,00 €");
    }

    #[test]
    fn service_formats_money_values() {
        let service = FormatService::new(Locale::De);
        assert_eq!(service.format(&eur(-129_900)), "-1.299,00 €");
        assert_eq!(service.format_signed(&eur(450_000)), "+4.500,00 €");
        assert_eq!(service.format_signed(&eur(-2_900)), "-29,00 €");
        assert_eq!(service.format_signed(&eur(0)), "0,00 €");
    }

    #[test]
    fn default_service_is_german() {
        assert_eq!(FormatService::default().locale(), Locale::De);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Notifier
// ═══════════════════════════════════════════════════════════════════

mod notifier {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<StoreEvent>>>, impl FnMut(&StoreEvent) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |e: &StoreEvent| sink.borrow_mut().push(e.clone()))
    }

    #[test]
    fn delivers_in_order() {
        let notifier = Notifier::new();
        let (log, listener) = recorder();
        let _sub = notifier.subscribe(listener);

        notifier.notify(&StoreEvent::DemoModeChanged(true));
        notifier.notify(&StoreEvent::SnapshotReset);

        assert_eq!(
            *log.borrow(),
            vec![StoreEvent::DemoModeChanged(true), StoreEvent::SnapshotReset]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = Notifier::new();
        let (log, listener) = recorder();
        let sub = notifier.subscribe(listener);

        notifier.notify(&StoreEvent::SnapshotReset);
        sub.unsubscribe();
        notifier.notify(&StoreEvent::SnapshotReset);

        assert_eq!(log.borrow().len(), 1);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn dropping_handle_unsubscribes() {
        let notifier = Notifier::new();
        let (log, listener) = recorder();
        {
            let sub = notifier.subscribe(listener);
            assert!(sub.is_active());
        }
        notifier.notify(&StoreEvent::SnapshotReset);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn listener_removed_mid_round_is_skipped() {
        let notifier = Notifier::new();
        let (log, second) = recorder();

        // The first listener drops the second listener's handle.
        let second_handle = Rc::new(RefCell::new(None));
        let killer = Rc::clone(&second_handle);
        let _first = notifier.subscribe(move |_| {
            killer.borrow_mut().take();
        });
        *second_handle.borrow_mut() = Some(notifier.subscribe(second));

        notifier.notify(&StoreEvent::SnapshotReset);

        assert!(log.borrow().is_empty());
        assert_eq!(notifier.listener_count(), 1);
    }

    #[test]
    fn listener_can_unsubscribe_itself() {
        let notifier = Notifier::new();
        let calls = Rc::new(RefCell::new(0));
        let own_handle = Rc::new(RefCell::new(None));

        let counter = Rc::clone(&calls);
        let handle = Rc::clone(&own_handle);
        *own_handle.borrow_mut() = Some(notifier.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            handle.borrow_mut().take();
        }));

        notifier.notify(&StoreEvent::SnapshotReset);
        notifier.notify(&StoreEvent::SnapshotReset);

        assert_eq!(*calls.borrow(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AuthGate
// ═══════════════════════════════════════════════════════════════════

mod auth_gate {
    use super::*;

    #[test]
    fn due_only_after_delay() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let mut gate = AuthGate::new(2_000);
        assert!(!gate.is_due(start));

        gate.arm(start);
        assert!(gate.is_armed());
        assert!(!gate.is_due(start + Duration::milliseconds(1_999)));
        assert!(gate.is_due(start + Duration::milliseconds(2_000)));
    }

    #[test]
    fn disarm_cancels() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let mut gate = AuthGate::new(10);
        gate.arm(start);
        gate.disarm();
        assert!(!gate.is_armed());
        assert!(!gate.is_due(start + Duration::seconds(60)));
    }

    #[test]
    fn zero_delay_is_immediately_due() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let mut gate = AuthGate::new(0);
        gate.arm(start);
        assert!(gate.is_due(start));
        assert_eq!(gate.delay(), Duration::zero());
    }

    #[test]
    fn auth_is_a_screen() {
        assert_eq!("auth".parse::<Screen>().unwrap(), Screen::Auth);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    fn april() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
    }

    #[test]
    fn trajectory_ends_at_net_worth() {
        let service = ChartService::new();
        let series = service.wealth_trajectory(&PortfolioSnapshot::demo(), april(), 4);
        assert_eq!(series.len(), 4);
        assert_eq!(series.last().unwrap().value, 142_500.0);
    }

    #[test]
    fn labels_are_consecutive_months() {
        let service = ChartService::without_jitter();
        let series = service.wealth_trajectory(&PortfolioSnapshot::demo(), april(), 4);
        let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar", "Apr"]);
    }

    #[test]
    fn deterministic_without_jitter() {
        let service = ChartService::without_jitter();
        let series = service.wealth_trajectory(&PortfolioSnapshot::demo(), april(), 3);
        assert_eq!(series[0].value, 96_900.0);
        assert_eq!(series[1].value, 119_700.0);
        assert_eq!(series[2].value, 142_500.0);
    }

    #[test]
    fn jitter_stays_within_spread() {
        let service = ChartService::new();
        let series = service.wealth_trajectory(&PortfolioSnapshot::demo(), april(), 2);
        let base = 142_500.0 * 0.68;
        assert!((series[0].value - base).abs() <= base * 0.02 + 0.01);
    }

    #[test]
    fn zero_points_is_empty() {
        let service = ChartService::new();
        assert!(service
            .wealth_trajectory(&PortfolioSnapshot::demo(), april(), 0)
            .is_empty());
    }

    #[test]
    fn empty_snapshot_is_flat_zero() {
        let service = ChartService::new();
        let series = service.wealth_trajectory(&PortfolioSnapshot::empty("EUR"), april(), 5);
        assert!(series.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn oversized_request_is_clamped() {
        let service = ChartService::without_jitter();
        let series = service.wealth_trajectory(&PortfolioSnapshot::demo(), april(), usize::MAX);
        assert_eq!(series.len(), MAX_TRAJECTORY_POINTS);
        let last = series.last().unwrap();
        assert_eq!(last.label, "Apr");
        assert_eq!(last.value, 142_500.0);
        assert!(series.iter().all(|p| !p.label.is_empty()));
    }
}
