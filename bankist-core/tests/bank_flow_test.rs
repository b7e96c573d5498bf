//! End-to-end tests for the bank context
//!
//! Timer and loan timing run on tokio's paused clock; movement timestamps
//! come from a manual clock so date labels are deterministic.
//!
//! Run with: cargo test --test bank_flow_test

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use bankist_core::adapters::demo::generate_demo_accounts;
use bankist_core::adapters::{ManualClock, RecordingUi, UiEvent};
use bankist_core::config::Config;
use bankist_core::ports::{Control, Field};
use bankist_core::{BankContext, Collaborators, Error, LogoutReason, SortOrder};

// ============================================================================
// Test Helpers
// ============================================================================

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
}

fn create_test_bank() -> (BankContext, Arc<RecordingUi>, Arc<ManualClock>) {
    let ui = Arc::new(RecordingUi::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let collaborators = Collaborators::with_ui(ui.clone()).clock(clock.clone());
    let ctx = BankContext::new(Config::default(), generate_demo_accounts(), collaborators)
        .expect("Failed to build bank");
    (ctx, ui, clock)
}

fn balance(ctx: &BankContext, username: &str) -> Decimal {
    ctx.find_account(username).expect("account exists").balance()
}

fn assert_histories_parallel(ctx: &BankContext) {
    for account in ctx.accounts() {
        assert_eq!(
            account.movements().len(),
            account.movement_dates().len(),
            "histories diverged for {}",
            account.username
        );
    }
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_login_shows_account_and_starts_timer() {
    let (ctx, ui, _) = create_test_bank();

    let session = ctx.login("am", "1111").unwrap();
    assert_eq!(session.username, "am");
    assert!(ctx.timer_running());

    let events = ui.events();
    assert!(events.contains(&UiEvent::Cleared(Field::LoginUsername)));
    assert!(events.contains(&UiEvent::Cleared(Field::LoginPin)));
    assert!(events.contains(&UiEvent::Shown("Welcome back, Ahmed".to_string())));

    let view = ui.last_view().expect("view rendered on login");
    assert_eq!(view.username, "am");
    assert_eq!(view.balance, Decimal::new(2595259, 2));
    assert_eq!(view.order, SortOrder::Chronological);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(ui.ticks(), vec!["02:00", "01:59"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_login_renders_nothing() {
    let (ctx, ui, _) = create_test_bank();

    for (user, pin) in [("am", "2222"), ("zz", "1111"), ("am", ""), ("AM", "1111")] {
        let err = ctx.login(user, pin).unwrap_err();
        assert!(matches!(err, Error::AuthenticationRejected));
    }

    assert!(ctx.session().is_none());
    assert!(!ctx.timer_running());
    assert!(ui.events().is_empty());
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_transfer_moves_money_and_redraws() {
    let (ctx, ui, clock) = create_test_bank();
    ctx.login("am", "1111").unwrap();
    let (am, aw) = (balance(&ctx, "am"), balance(&ctx, "aw"));
    clock.advance(chrono::Duration::hours(1));
    ui.clear_events();

    ctx.transfer("aw", "500").unwrap();

    assert_eq!(balance(&ctx, "am"), am - Decimal::new(500, 0));
    assert_eq!(balance(&ctx, "aw"), aw + Decimal::new(500, 0));
    assert_eq!(balance(&ctx, "am") + balance(&ctx, "aw"), am + aw);

    let receiver = ctx.find_account("aw").unwrap();
    assert_eq!(receiver.movement_dates().last(), Some(&clock_now(&clock)));

    let view = ui.last_view().unwrap();
    assert_eq!(view.movements[0].amount, Decimal::new(-500, 0));
    assert_eq!(view.movements[0].position, 9);
    assert_eq!(view.movements[0].date_label, "Today");
    assert!(ui.events().contains(&UiEvent::Cleared(Field::TransferAmount)));
    assert!(ui.events().contains(&UiEvent::Cleared(Field::TransferTo)));
    assert_histories_parallel(&ctx);
}

fn clock_now(clock: &ManualClock) -> DateTime<Utc> {
    use bankist_core::ports::Clock;
    clock.now()
}

#[tokio::test(start_paused = true)]
async fn test_rejected_transfers_change_nothing() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();
    let before = ctx.accounts();
    ui.clear_events();

    let too_much = (balance(&ctx, "aw") + Decimal::ONE).to_string();
    for (to, amount) in [
        ("am", "0"),
        ("am", "-10"),
        ("am", ""),
        ("am", "lots"),
        ("am", too_much.as_str()),
        ("aw", "10"),
        ("nobody", "10"),
    ] {
        let err = ctx.transfer(to, amount).unwrap_err();
        assert!(err.is_rejection(), "{to} {amount} gave {err}");
    }

    assert_eq!(ctx.accounts(), before);
    assert!(ui.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_transfer_requires_session() {
    let (ctx, _, _) = create_test_bank();
    let err = ctx.transfer("aw", "10").unwrap_err();
    assert!(matches!(err, Error::NoActiveSession));
}

// ============================================================================
// Loans
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_loan_lands_after_delay() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();
    let before = balance(&ctx, "am");

    let granted = ctx.request_loan("1000.9").unwrap();
    assert_eq!(granted, Decimal::new(1000, 0));
    assert!(ctx.loan_pending());
    assert_eq!(ui.control_enabled(Control::LoanRequest), Some(false));
    assert!(ui.events().contains(&UiEvent::Cleared(Field::LoanAmount)));
    assert_eq!(balance(&ctx, "am"), before);

    // a second request while the first is pending is refused
    assert!(ctx.request_loan("100").unwrap_err().is_rejection());

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(balance(&ctx, "am"), before);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(balance(&ctx, "am"), before + Decimal::new(1000, 0));
    assert!(!ctx.loan_pending());
    assert_eq!(ui.control_enabled(Control::LoanRequest), Some(true));
    assert_eq!(ui.last_view().unwrap().balance, before + Decimal::new(1000, 0));
    assert_histories_parallel(&ctx);
}

#[tokio::test(start_paused = true)]
async fn test_loan_affordability_rule() {
    let (ctx, _, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();

    // largest movement is 8500, so anything above 85000 is refused
    assert!(ctx.request_loan("85001").unwrap_err().is_rejection());
    assert!(ctx.request_loan("0.5").unwrap_err().is_rejection());
    assert!(!ctx.loan_pending());
    assert_eq!(ctx.request_loan("85000").unwrap(), Decimal::new(85000, 0));
}

#[tokio::test(start_paused = true)]
async fn test_loan_for_closed_account_is_dropped() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();
    ctx.request_loan("100").unwrap();
    ctx.close_account("am", "1111").unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(ctx.find_account("am").is_none());
    assert!(!ctx.loan_pending());
    assert_eq!(ui.control_enabled(Control::LoanRequest), Some(true));
    assert_eq!(ui.last_loan(), Some((Decimal::new(100, 0), false)));
}

#[tokio::test(start_paused = true)]
async fn test_landed_loan_is_reported() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();
    ctx.request_loan("500").unwrap();
    assert_eq!(ui.last_loan(), None);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(ui.last_loan(), Some((Decimal::new(500, 0), true)));
}

#[tokio::test(start_paused = true)]
async fn test_growing_loans_stop_at_decimal_range() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();

    let mut refused = None;
    for _ in 0..40 {
        let account = ctx.find_account("am").unwrap();
        let largest = account.movements().iter().copied().max().unwrap();
        let request = largest.checked_mul(Decimal::TEN).unwrap_or(Decimal::MAX);

        match ctx.request_loan(&request.to_string()) {
            Ok(_) => tokio::time::sleep(Duration::from_secs(4)).await,
            Err(err) => {
                refused = Some(err);
                break;
            }
        }
    }

    let err = refused.expect("loans keep growing until one is refused");
    assert!(err.is_rejection());
    assert!(!ctx.loan_pending());
    assert_eq!(ui.control_enabled(Control::LoanRequest), Some(true));

    // the account is still fully usable and its balance is exact
    let account = ctx.find_account("am").unwrap();
    assert_eq!(account.checked_balance(), Some(account.balance()));
    let view = ctx.view().unwrap();
    assert_eq!(view.balance, account.balance());
    ctx.transfer("aw", "1").unwrap();
    ctx.logout().unwrap();
    ctx.login("am", "1111").unwrap();
    assert_histories_parallel(&ctx);
}

// ============================================================================
// Closing accounts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_close_account_needs_both_credentials() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();

    for (user, pin) in [("am", "2222"), ("aw", "1111"), ("am", "abc"), ("", "")] {
        assert!(ctx.close_account(user, pin).unwrap_err().is_rejection());
        assert_eq!(ctx.accounts().len(), 2);
    }
    assert!(ctx.session().is_some());

    let closed = ctx.close_account("am", " 1111").unwrap();
    assert_eq!(closed.owner, "Ahmed Mamdoh");
    assert_eq!(ctx.accounts().len(), 1);
    assert!(ctx.session().is_none());
    assert!(!ctx.timer_running());
    assert_eq!(ui.hidden(), vec![LogoutReason::AccountClosed]);

    assert!(matches!(ctx.transfer("aw", "1"), Err(Error::NoActiveSession)));
    assert!(matches!(ctx.login("am", "1111"), Err(Error::AuthenticationRejected)));
}

// ============================================================================
// Inactivity timer
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_inactivity_logs_out() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();

    tokio::time::sleep(Duration::from_millis(119_500)).await;
    assert!(ctx.session().is_some());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(ctx.session().is_none());
    assert_eq!(ui.hidden(), vec![LogoutReason::Expired]);
    assert_eq!(ui.ticks().last().map(String::as_str), Some("00:00"));
    assert!(matches!(ctx.transfer("aw", "1"), Err(Error::SessionExpired)));
    assert!(matches!(ctx.view(), Err(Error::SessionExpired)));
}

#[tokio::test(start_paused = true)]
async fn test_activity_resets_countdown() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();

    tokio::time::sleep(Duration::from_millis(119_500)).await;
    ctx.transfer("aw", "1").unwrap();

    tokio::time::sleep(Duration::from_millis(119_500)).await;
    assert!(ctx.session().is_some());
    assert!(ui.hidden().is_empty());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(ctx.session().is_none());
    assert_eq!(ui.hidden(), vec![LogoutReason::Expired]);
}

#[tokio::test(start_paused = true)]
async fn test_relogin_does_not_leave_old_countdown() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    ctx.login("aw", "2222").unwrap();

    // the first countdown would have fired at 120s
    tokio::time::sleep(Duration::from_secs(100)).await;
    assert_eq!(ctx.session().unwrap().username, "aw");
    assert!(ui.hidden().is_empty());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(ui.hidden(), vec![LogoutReason::Expired]);
}

#[tokio::test(start_paused = true)]
async fn test_manual_logout_stops_timer() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();
    ctx.logout().unwrap();
    assert!(!ctx.timer_running());
    assert!(matches!(ctx.logout(), Err(Error::NoActiveSession)));

    tokio::time::sleep(Duration::from_secs(200)).await;
    assert_eq!(ui.hidden(), vec![LogoutReason::Manual]);
}

// ============================================================================
// View
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_sort_toggle_redraws() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("am", "1111").unwrap();

    assert_eq!(ctx.toggle_sort().unwrap(), SortOrder::ReverseChronological);
    let view = ui.last_view().unwrap();
    assert_eq!(view.movements.first().unwrap().position, 1);

    assert_eq!(ctx.toggle_sort().unwrap(), SortOrder::Chronological);
    let view = ui.last_view().unwrap();
    assert_eq!(view.movements.first().unwrap().position, 8);

    ctx.toggle_sort().unwrap();
    ctx.logout().unwrap();
    ctx.login("am", "1111").unwrap();
    assert_eq!(ui.last_view().unwrap().order, SortOrder::Chronological);
}

#[tokio::test(start_paused = true)]
async fn test_update_view_is_idempotent() {
    let (ctx, ui, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();
    ui.clear_events();

    let first = ctx.update_view().unwrap();
    let second = ctx.update_view().unwrap();
    assert_eq!(first, second);
    assert_eq!(ui.view_count(), 2);
    assert_eq!(first.total_income, Decimal::new(16900, 0));
    assert_eq!(first.total_outflow, Decimal::new(5180, 0));
    assert_eq!(first.total_interest, Decimal::new(25350, 2));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_pending_work() {
    let (ctx, _, _) = create_test_bank();
    ctx.login("aw", "2222").unwrap();
    let before = balance(&ctx, "aw");
    ctx.request_loan("100").unwrap();

    ctx.shutdown();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(balance(&ctx, "aw"), before);
    assert!(!ctx.timer_running());
}
