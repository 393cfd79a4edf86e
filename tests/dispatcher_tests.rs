use std::sync::atomic::Ordering;
use timeclock_bot::core::locks::KeyedLocks;
use timeclock_bot::core::reply::Reply;
use timeclock_bot::db::log::{day_target, load_log};
use timeclock_bot::db::schedule::get_schedule;
use timeclock_bot::db::status::get_status;
use timeclock_bot::errors::{AppError, ErrorKind};
use timeclock_bot::models::day_state::DayState;
use timeclock_bot::models::progress::{Process, Status};
use timeclock_bot::models::schedule_entry::ScheduleEntry;

mod common;
use common::*;

fn state(h: &Harness) -> Option<DayState> {
    h.pool
        .with_conn(|conn| get_status(conn, ACCOUNT, &day()))
        .unwrap()
}

fn schedule(h: &Harness) -> Option<ScheduleEntry> {
    h.pool
        .with_conn(|conn| get_schedule(conn, ACCOUNT, &day()))
        .unwrap()
}

fn pair(h: &Harness) -> (Option<Status>, Option<Process>) {
    match state(h) {
        Some(s) => (s.status, s.process),
        None => (None, None),
    }
}

#[tokio::test]
async fn test_direct_check_in_flow() {
    let h = harness();
    let t1 = local(9, 5);

    let replies = h.dispatcher.handle(&postback("sign_in"), t1).await.unwrap();
    assert_eq!(replies, vec![Reply::SignInMenu]);

    let replies = h
        .dispatcher
        .handle(&command("direct_sign_in"), t1)
        .await
        .unwrap();
    assert_eq!(
        replies,
        vec![Reply::ConfirmCheckIn {
            at: t1.timestamp()
        }]
    );

    let confirm = format!("confirm_in&time={}", t1.timestamp());
    let replies = h
        .dispatcher
        .handle(&postback(&confirm), t1)
        .await
        .unwrap();
    assert_eq!(replies, vec![Reply::CheckedIn]);

    let entry = schedule(&h).expect("schedule row");
    assert_eq!(entry.schedule_id, "event-1");
    assert_eq!(entry.begin_time, t1.timestamp());
    assert_eq!(entry.end_time, t1.timestamp() + 60);
    assert_eq!(pair(&h), (Some(Status::InDone), Some(Process::SignInDone)));

    let calls = h.calendar.calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        CalendarCall::Create { calendar_id, req } => {
            assert_eq!(calendar_id, CALENDAR_ID);
            assert_eq!(req.begin, t1.timestamp());
            assert_eq!(req.end, t1.timestamp() + 60);
            assert_eq!(req.owner, ACCOUNT);
            assert!(req.title.contains("clock-in time"));
        }
        other => panic!("unexpected call {:?}", other),
    }
}

#[tokio::test]
async fn test_confirm_in_twice_is_internal_error() {
    let h = harness();
    let t1 = local(9, 0);
    let confirm = postback(&format!("confirm_in&time={}", t1.timestamp()));

    h.dispatcher.handle(&confirm, t1).await.unwrap();
    let err = h.dispatcher.handle(&confirm, t1).await.unwrap_err();

    assert!(matches!(err, AppError::DataIntegrity { .. }));
    assert_eq!(err.kind(), ErrorKind::Fatal);
    assert_eq!(err.status_code().as_u16(), 500);
    // Only the first confirmation reached the calendar.
    assert_eq!(h.calendar.calls().len(), 1);
}

#[tokio::test]
async fn test_sign_out_before_check_in_reminds() {
    let h = harness();

    let replies = h
        .dispatcher
        .handle(&postback("sign_out"), local(18, 0))
        .await
        .unwrap();

    assert_eq!(replies, vec![Reply::NotClockedIn]);
    assert!(state(&h).is_none());
    assert!(schedule(&h).is_none());
    assert!(
        h.messenger.texts()[0].starts_with("Today's clock-in time has not been registered.")
    );
}

#[tokio::test]
async fn test_to_first_is_stateless() {
    let h = harness();
    let now = local(10, 0);

    let first = h.dispatcher.handle(&postback("to_first"), now).await.unwrap();
    assert_eq!(first, vec![Reply::ToFirst]);
    assert!(state(&h).is_none());

    h.dispatcher
        .handle(&postback("manual_sign_in"), now)
        .await
        .unwrap();
    let before = pair(&h);

    let again = h.dispatcher.handle(&postback("to_first"), now).await.unwrap();
    assert_eq!(again, first);
    assert_eq!(pair(&h), before);
}

#[tokio::test]
async fn test_manual_day_computes_elapsed() {
    let h = harness();
    let now = local(18, 0);

    let replies = h
        .dispatcher
        .handle(&postback("manual_sign_in"), local(8, 55))
        .await
        .unwrap();
    assert_eq!(
        replies,
        vec![Reply::ManualSignInPrompt, Reply::TimeFormatHint]
    );
    assert_eq!(pair(&h), (Some(Status::WaitIn), None));

    let replies = h.dispatcher.handle(&text("0900"), local(8, 56)).await.unwrap();
    assert_eq!(replies, vec![Reply::CheckedIn]);
    let entry = schedule(&h).unwrap();
    assert_eq!(entry.begin_time, local(9, 0).timestamp());

    h.dispatcher
        .handle(&postback("manual_sign_out"), now)
        .await
        .unwrap();
    assert_eq!(pair(&h), (Some(Status::WaitOut), Some(Process::SignInDone)));

    let replies = h.dispatcher.handle(&text("1730"), now).await.unwrap();
    assert_eq!(
        replies,
        vec![Reply::CheckedOut {
            at: local(9, 0).timestamp(),
            hours: 8,
            minutes: 30
        }]
    );
    assert_eq!(schedule(&h).unwrap().end_time, local(17, 30).timestamp());
    assert_eq!(
        pair(&h),
        (Some(Status::OutDone), Some(Process::SignOutDone))
    );

    let last = h.messenger.texts().pop().unwrap();
    assert!(last.contains("8 hours and 30 minutes"), "{}", last);
}

#[tokio::test]
async fn test_manual_check_out_before_check_in_reprompts() {
    let h = harness();
    let now = local(12, 0);

    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", local(9, 0).timestamp())), now)
        .await
        .unwrap();
    h.dispatcher
        .handle(&command("manual_sign_out"), now)
        .await
        .unwrap();

    let replies = h.dispatcher.handle(&text("0830"), now).await.unwrap();

    assert_eq!(
        replies,
        vec![Reply::CheckOutBeforeCheckIn, Reply::TimeFormatHint]
    );
    assert_eq!(pair(&h), (Some(Status::WaitOut), Some(Process::SignInDone)));
    assert_eq!(schedule(&h).unwrap().end_time, local(9, 0).timestamp() + 60);
    // Only the check-in touched the calendar.
    assert_eq!(h.calendar.calls().len(), 1);
}

#[tokio::test]
async fn test_clean_with_no_rows_is_noop() {
    let h = harness();

    let replies = h.dispatcher.handle(&text("clean"), local(9, 0)).await.unwrap();

    assert!(replies.is_empty());
    assert!(h.messenger.pushes().is_empty());
    assert!(state(&h).is_none());
}

#[tokio::test]
async fn test_clean_removes_both_rows() {
    let h = harness();
    let now = local(9, 0);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", now.timestamp())), now)
        .await
        .unwrap();

    h.dispatcher.handle(&text("clean"), now).await.unwrap();

    assert!(state(&h).is_none());
    assert!(schedule(&h).is_none());
    // A fresh check-in is possible again.
    let replies = h.dispatcher.handle(&postback("sign_in"), now).await.unwrap();
    assert_eq!(replies, vec![Reply::SignInMenu]);
}

#[tokio::test]
async fn test_calendar_failure_leaves_no_trace() {
    let h = harness();
    let now = local(9, 0);
    h.calendar.fail.store(true, Ordering::SeqCst);

    let err = h
        .dispatcher
        .handle(&postback(&format!("confirm_in&time={}", now.timestamp())), now)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Upstream(_)));
    assert!(schedule(&h).is_none());
    assert!(state(&h).is_none());
    assert!(h.messenger.pushes().is_empty());
}

#[tokio::test]
async fn test_calendar_failure_on_check_out_keeps_check_in() {
    let h = harness();
    h.dispatcher
        .handle(
            &postback(&format!("confirm_in&time={}", local(9, 0).timestamp())),
            local(9, 0),
        )
        .await
        .unwrap();
    h.calendar.fail.store(true, Ordering::SeqCst);

    let out = postback(&format!("confirm_out&time={}", local(18, 0).timestamp()));
    assert!(h.dispatcher.handle(&out, local(18, 0)).await.is_err());

    assert_eq!(pair(&h), (Some(Status::InDone), Some(Process::SignInDone)));
    assert_eq!(schedule(&h).unwrap().end_time, local(9, 0).timestamp() + 60);
}

#[tokio::test]
async fn test_sign_in_after_check_in_reminds() {
    let h = harness();
    let now = local(9, 0);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", now.timestamp())), now)
        .await
        .unwrap();

    let replies = h.dispatcher.handle(&postback("sign_in"), now).await.unwrap();
    assert_eq!(replies, vec![Reply::AlreadyClockedIn]);

    let replies = h
        .dispatcher
        .handle(&command("direct_sign_in"), now)
        .await
        .unwrap();
    assert_eq!(replies, vec![Reply::InvalidAction]);
}

#[tokio::test]
async fn test_direct_check_out_flow() {
    let h = harness();
    let begin = local(9, 0);
    let end = local(17, 45);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", begin.timestamp())), begin)
        .await
        .unwrap();

    let replies = h.dispatcher.handle(&postback("sign_out"), end).await.unwrap();
    assert_eq!(replies, vec![Reply::SignOutMenu]);

    let replies = h
        .dispatcher
        .handle(&command("direct_sign_out"), end)
        .await
        .unwrap();
    assert_eq!(
        replies,
        vec![Reply::ConfirmCheckOut {
            at: end.timestamp()
        }]
    );

    let replies = h
        .dispatcher
        .handle(&postback(&format!("confirm_out&time={}", end.timestamp())), end)
        .await
        .unwrap();
    assert_eq!(
        replies,
        vec![Reply::CheckedOut {
            at: begin.timestamp(),
            hours: 8,
            minutes: 45
        }]
    );

    match h.calendar.calls().last().unwrap() {
        CalendarCall::Update { event_id, req, .. } => {
            assert_eq!(event_id, "event-1");
            assert_eq!(req.begin, begin.timestamp());
            assert_eq!(req.end, end.timestamp());
            assert!(req.title.contains("working hours"));
        }
        other => panic!("unexpected call {:?}", other),
    }

    let replies = h.dispatcher.handle(&postback("sign_out"), end).await.unwrap();
    assert_eq!(replies, vec![Reply::AlreadyClockedOut]);
}

#[tokio::test]
async fn test_short_day_omits_hours() {
    let h = harness();
    let begin = local(9, 0);
    let end = local(9, 40);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", begin.timestamp())), begin)
        .await
        .unwrap();
    h.dispatcher
        .handle(&postback(&format!("confirm_out&time={}", end.timestamp())), end)
        .await
        .unwrap();

    let last = h.messenger.texts().pop().unwrap();
    assert!(last.contains("is 40 minutes"), "{}", last);
    assert!(!last.contains("hours and"), "{}", last);
}

#[tokio::test]
async fn test_text_without_pending_entry_is_not_expected() {
    let h = harness();

    let err = h
        .dispatcher
        .handle(&text("0900"), local(9, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotExpected(_)));
    assert_eq!(err.status_code().as_u16(), 403);
    assert!(h.messenger.pushes().is_empty());
}

#[tokio::test]
async fn test_malformed_entry_while_waiting() {
    let h = harness();
    let now = local(9, 0);
    h.dispatcher
        .handle(&postback("manual_sign_in"), now)
        .await
        .unwrap();

    for bad in ["2460", "0975", "930", "09:30", "abcd"] {
        let replies = h.dispatcher.handle(&text(bad), now).await.unwrap();
        assert_eq!(
            replies,
            vec![Reply::CouldNotUnderstand, Reply::TimeFormatHint],
            "input {}",
            bad
        );
    }
    assert_eq!(pair(&h), (Some(Status::WaitIn), None));
    assert!(schedule(&h).is_none());
}

#[tokio::test]
async fn test_start_links_rich_menu() {
    let h = harness();

    let replies = h
        .dispatcher
        .handle(&command("start"), local(9, 0))
        .await
        .unwrap();

    assert_eq!(replies, vec![Reply::Greeting, Reply::Introduction]);
    assert_eq!(
        h.messenger.linked.lock().unwrap().clone(),
        vec![(RICH_MENU_ID.to_string(), ACCOUNT.to_string())]
    );
    let pushes = h.messenger.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].1[1]["type"], "image_carousel");
    assert!(state(&h).is_none());
}

#[tokio::test]
async fn test_unknown_postback_is_unrecognized() {
    let h = harness();

    let err = h
        .dispatcher
        .handle(&postback("dance"), local(9, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unrecognized(_)));
    assert_eq!(err.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_committed_transitions_are_audited() {
    let h = harness();
    let now = local(9, 0);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", now.timestamp())), now)
        .await
        .unwrap();

    let target = day_target(ACCOUNT, "2025-03-10");
    let lines = h
        .pool
        .with_conn(|conn| load_log(conn, &target, 10))
        .unwrap();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1, "confirm_in");
    assert_eq!(lines[0].2, "status=in_done process=sign_in_done");
}

#[tokio::test]
async fn test_concurrent_confirmations_create_one_schedule() {
    let h = harness();
    let now = local(9, 0);
    let event = postback(&format!("confirm_in&time={}", now.timestamp()));

    let (a, b) = tokio::join!(
        h.dispatcher.handle(&event, now),
        h.dispatcher.handle(&event, now)
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(h.calendar.calls().len(), 1);
    assert!(schedule(&h).is_some());
}

#[tokio::test]
async fn test_out_of_range_confirmation_is_rejected() {
    let h = harness();
    let err = h
        .dispatcher
        .handle(&postback("confirm_in&time=9223372036854775807"), local(9, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidConfirmation(_)));
    assert_eq!(err.kind(), ErrorKind::Client);
    assert!(h.calendar.calls().is_empty());
    assert!(state(&h).is_none());
    assert!(schedule(&h).is_none());
}

#[tokio::test]
async fn test_stale_confirm_out_before_check_in_reprompts() {
    let h = harness();
    let begin = local(10, 0);
    h.dispatcher
        .handle(&postback(&format!("confirm_in&time={}", begin.timestamp())), begin)
        .await
        .unwrap();

    let stale = postback(&format!("confirm_out&time={}", local(9, 30).timestamp()));
    let replies = h.dispatcher.handle(&stale, local(10, 5)).await.unwrap();

    assert_eq!(
        replies,
        vec![Reply::CheckOutBeforeCheckIn, Reply::TimeFormatHint]
    );
    assert_eq!(pair(&h), (Some(Status::WaitOut), Some(Process::SignInDone)));
    assert_eq!(schedule(&h).unwrap().end_time, begin.timestamp() + 60);
    assert_eq!(h.calendar.calls().len(), 1);
}

#[tokio::test]
async fn test_push_failure_keeps_committed_transition() {
    let h = harness();
    let now = local(9, 0);
    h.messenger.fail_push.store(true, Ordering::SeqCst);

    let replies = h
        .dispatcher
        .handle(&postback(&format!("confirm_in&time={}", now.timestamp())), now)
        .await
        .unwrap();

    assert_eq!(replies, vec![Reply::CheckedIn]);
    assert_eq!(pair(&h), (Some(Status::InDone), Some(Process::SignInDone)));
    assert!(schedule(&h).is_some());
    assert!(h.messenger.pushes().is_empty());
}

#[tokio::test]
async fn test_idle_lock_slots_are_pruned() {
    let locks = KeyedLocks::new();
    assert!(locks.is_empty());

    let held = locks.acquire("alice", day()).await;
    {
        let _other = locks.acquire("bob", day()).await;
        assert_eq!(locks.len(), 2);
    }

    // bob's slot is idle now; alice's is still held.
    let _next = locks.acquire("carol", day()).await;
    assert_eq!(locks.len(), 2);

    drop(held);
    let _last = locks.acquire("dave", day()).await;
    assert_eq!(locks.len(), 2);
}
