use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use super::{
    fake::{dm_channel, FakeDirectory},
    COMMAND_CHANNEL, MEMBER,
};
use crate::{
    error::AppError,
    model::MonthDay,
    service::{
        confirmation::{ConfirmationFlow, ConfirmationOutcome, DeliveryChannel},
        directory::MessageTarget,
    },
};

fn birthday() -> MonthDay {
    MonthDay::new(2, 29).unwrap()
}

async fn run(directory: &FakeDirectory, commits: &AtomicUsize) -> ConfirmationOutcome {
    ConfirmationFlow::new(directory, COMMAND_CHANNEL, MEMBER, birthday())
        .run(move || async move {
            commits.fetch_add(1, Ordering::SeqCst);
            Ok::<bool, AppError>(true)
        })
        .await
        .unwrap()
}

/// Tests confirming by direct message.
///
/// Expected: Committed in the DM channel after waiting 30 seconds at most
#[tokio::test]
async fn direct_yes_commits() {
    let directory = FakeDirectory::new().reply(Some("YES"));
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(
        outcome,
        ConfirmationOutcome::Committed(DeliveryChannel::Direct {
            channel_id: dm_channel(MEMBER)
        })
    );
    assert_eq!(commits.load(Ordering::SeqCst), 1);

    let waits = directory.waits();
    assert_eq!(waits.len(), 1);
    assert_eq!(waits[0].channel_id, dm_channel(MEMBER));
    assert_eq!(waits[0].author_id, MEMBER);
    assert_eq!(waits[0].timeout, Duration::from_secs(30));

    let direct = directory.sent_to(MessageTarget::Direct(MEMBER));
    assert_eq!(direct.len(), 1);
    assert!(direct[0].text.contains("February 29"));
    assert_eq!(direct[0].delete_after, None);

    let result = directory.sent_to(MessageTarget::Channel(dm_channel(MEMBER)));
    assert!(result[0].text.contains("Successfully set your birthday"));

    // Nothing leaks into the guild channel
    assert!(directory
        .sent_to(MessageTarget::Channel(COMMAND_CHANNEL))
        .is_empty());
}

/// Tests answering anything but yes.
///
/// Expected: Declined and nothing written
#[tokio::test]
async fn direct_other_reply_declines() {
    let directory = FakeDirectory::new().reply(Some("yes please"));
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::Declined);
    assert_eq!(commits.load(Ordering::SeqCst), 0);
    let result = directory.sent_to(MessageTarget::Channel(dm_channel(MEMBER)));
    assert!(result[0].text.contains("Declined"));
}

/// Tests not answering the direct prompt.
///
/// Expected: TimedOut and nothing written
#[tokio::test]
async fn direct_no_reply_times_out() {
    let directory = FakeDirectory::new();
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::TimedOut);
    assert_eq!(commits.load(Ordering::SeqCst), 0);
}

/// Tests continuing in the channel when direct messages are refused.
///
/// Verifies the 10 second gate, then a prompt deleted after 5 seconds and a
/// 6 second wait for the answer.
///
/// Expected: Committed in the channel as transient
#[tokio::test]
async fn fallback_yes_commits_in_channel() {
    let directory = FakeDirectory::new()
        .refuse_dms(MEMBER)
        .reply(Some("yes"))
        .reply(Some("Yes"));
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(
        outcome,
        ConfirmationOutcome::Committed(DeliveryChannel::Transient {
            channel_id: COMMAND_CHANNEL
        })
    );
    assert_eq!(commits.load(Ordering::SeqCst), 1);

    let timeouts: Vec<_> = directory.waits().iter().map(|w| w.timeout).collect();
    assert_eq!(
        timeouts,
        vec![Duration::from_secs(10), Duration::from_secs(6)]
    );
    assert!(directory
        .waits()
        .iter()
        .all(|w| w.channel_id == COMMAND_CHANNEL && w.author_id == MEMBER));

    // Every message naming the date is transient
    let in_channel = directory.sent_to(MessageTarget::Channel(COMMAND_CHANNEL));
    assert_eq!(in_channel.len(), 3);
    assert_eq!(in_channel[0].delete_after, None);
    for sent in in_channel.iter().filter(|s| s.text.contains("February 29")) {
        assert_eq!(sent.delete_after, Some(Duration::from_secs(5)));
    }
}

/// Tests declining to continue in the channel.
///
/// Expected: Declined without a confirmation prompt or write
#[tokio::test]
async fn fallback_gate_no_declines() {
    let directory = FakeDirectory::new().refuse_dms(MEMBER).reply(Some("no"));
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::Declined);
    assert_eq!(commits.load(Ordering::SeqCst), 0);
    assert_eq!(directory.waits().len(), 1);
    assert!(!directory
        .sent()
        .iter()
        .any(|s| s.text.contains("February 29")));
}

/// Tests not answering the channel gate.
///
/// Expected: TimedOut
#[tokio::test]
async fn fallback_gate_silence_times_out() {
    let directory = FakeDirectory::new().refuse_dms(MEMBER);
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::TimedOut);
    assert_eq!(commits.load(Ordering::SeqCst), 0);
}

/// Tests declining the transient prompt after accepting the gate.
///
/// Expected: Declined
#[tokio::test]
async fn fallback_confirmation_no_declines() {
    let directory = FakeDirectory::new()
        .refuse_dms(MEMBER)
        .reply(Some("yes"))
        .reply(Some("nope"));
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::Declined);
    assert_eq!(commits.load(Ordering::SeqCst), 0);
}

/// Tests a member reachable neither by DM nor in the channel.
///
/// Expected: Undeliverable without waiting
#[tokio::test]
async fn nowhere_to_deliver() {
    let directory = FakeDirectory::new()
        .refuse_dms(MEMBER)
        .deny_channel(COMMAND_CHANNEL);
    let commits = AtomicUsize::new(0);

    let outcome = run(&directory, &commits).await;

    assert_eq!(outcome, ConfirmationOutcome::Undeliverable);
    assert!(directory.waits().is_empty());
    assert_eq!(commits.load(Ordering::SeqCst), 0);
}

/// Tests that a failing write surfaces as an error.
///
/// Expected: Err from the flow
#[tokio::test]
async fn commit_failure_is_returned() {
    let directory = FakeDirectory::new().reply(Some("yes"));

    let result = ConfirmationFlow::new(&directory, COMMAND_CHANNEL, MEMBER, birthday())
        .run(|| async { Err::<bool, AppError>(AppError::InternalError("store down".to_string())) })
        .await;

    assert!(result.is_err());
}

/// Tests confirming after the record was filled in elsewhere.
///
/// Expected: Superseded, and the member is told their birthday is already set
#[tokio::test]
async fn refused_commit_is_superseded() {
    let directory = FakeDirectory::new().reply(Some("yes"));

    let outcome = ConfirmationFlow::new(&directory, COMMAND_CHANNEL, MEMBER, birthday())
        .run(|| async { Ok::<bool, AppError>(false) })
        .await
        .unwrap();

    let delivery = DeliveryChannel::Direct {
        channel_id: dm_channel(MEMBER),
    };
    assert_eq!(outcome, ConfirmationOutcome::Superseded(delivery));
    let notices = directory.sent_to(MessageTarget::Channel(dm_channel(MEMBER)));
    assert_eq!(notices.len(), 1);
    assert!(notices[0].text.contains("already set"));
    assert!(!notices[0].text.contains("Successfully"));
}
