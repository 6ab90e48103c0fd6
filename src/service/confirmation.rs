//! Interactive confirmation for a member setting their own birthday.
//!
//! The flow moves through three states:
//!
//! 1. **AwaitingDeliveryChannel**: the prompt is sent by direct message. If the
//!    member refuses direct messages, they are asked in the originating channel
//!    whether to continue there, where every sensitive message is deleted shortly
//!    after it is posted.
//! 2. **AwaitingConfirmation**: the prompt names the candidate date and waits for an
//!    explicit `yes` from the member in the channel the prompt went to.
//! 3. **Done**: committed, superseded, declined, timed out or undeliverable.
//!
//! Nothing is written unless the member confirms. The flow never touches roles;
//! the caller triggers a reconciliation cycle after a commit.

use std::{future::Future, time::Duration};

use crate::{
    error::{directory::DirectoryError, AppError},
    model::MonthDay,
    service::directory::{is_yes, Directory, MessageTarget},
};

/// How long the "continue here?" gate in the origin channel waits.
pub const FALLBACK_GATE_TIMEOUT: Duration = Duration::from_secs(10);
/// How long a direct-message prompt waits for an answer.
pub const DIRECT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);
/// Lifetime of sensitive messages posted in the origin channel.
pub const TRANSIENT_MESSAGE_TTL: Duration = Duration::from_secs(5);

const TITLE: &str = "**Birthday - Set Self's Birthday**";

/// Where the confirmation dialogue takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    /// Direct message channel with the member.
    Direct { channel_id: u64 },
    /// The originating guild channel, with sensitive messages auto-deleted.
    Transient { channel_id: u64 },
}

impl DeliveryChannel {
    fn channel_id(&self) -> u64 {
        match *self {
            DeliveryChannel::Direct { channel_id } | DeliveryChannel::Transient { channel_id } => {
                channel_id
            }
        }
    }

    fn target(&self) -> MessageTarget {
        MessageTarget::Channel(self.channel_id())
    }

    /// Lifetime of sensitive messages in this channel.
    fn ttl(&self) -> Option<Duration> {
        match self {
            DeliveryChannel::Direct { .. } => None,
            DeliveryChannel::Transient { .. } => Some(TRANSIENT_MESSAGE_TTL),
        }
    }

    fn reply_timeout(&self) -> Duration {
        match self {
            DeliveryChannel::Direct { .. } => DIRECT_REPLY_TIMEOUT,
            DeliveryChannel::Transient { .. } => TRANSIENT_MESSAGE_TTL + Duration::from_secs(1),
        }
    }
}

/// Terminal state of a confirmation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Member confirmed and the date was written.
    Committed(DeliveryChannel),
    /// Member confirmed, but a birthday was stored while waiting; nothing written.
    Superseded(DeliveryChannel),
    /// Member answered anything but `yes`.
    Declined,
    /// No answer in time.
    TimedOut,
    /// Neither a direct message nor the origin channel could be written to.
    Undeliverable,
}

enum FlowState {
    AwaitingDeliveryChannel,
    AwaitingConfirmation(DeliveryChannel),
    Done(ConfirmationOutcome),
}

pub struct ConfirmationFlow<'a> {
    directory: &'a dyn Directory,
    origin_channel_id: u64,
    user_id: u64,
    birthday: MonthDay,
}

impl<'a> ConfirmationFlow<'a> {
    /// # Arguments
    /// - `directory` - Discord access
    /// - `origin_channel_id` - Guild channel the command was issued in
    /// - `user_id` - Member setting their birthday; only their replies count
    /// - `birthday` - Candidate date
    pub fn new(
        directory: &'a dyn Directory,
        origin_channel_id: u64,
        user_id: u64,
        birthday: MonthDay,
    ) -> Self {
        Self {
            directory,
            origin_channel_id,
            user_id,
            birthday,
        }
    }

    /// Drives the dialogue to completion.
    ///
    /// `commit` is awaited only on an explicit `yes`; it performs the write and
    /// returns `false` when the record no longer accepts it.
    ///
    /// # Returns
    /// - `Ok(ConfirmationOutcome)` - Terminal state reached
    /// - `Err(AppError)` - `commit` failed or a directory call failed unexpectedly
    pub async fn run<F, Fut>(self, commit: F) -> Result<ConfirmationOutcome, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        let mut commit = Some(commit);
        let mut state = FlowState::AwaitingDeliveryChannel;

        loop {
            state = match state {
                FlowState::AwaitingDeliveryChannel => self.settle_delivery_channel().await?,
                FlowState::AwaitingConfirmation(delivery) => {
                    let Some(commit) = commit.take() else {
                        return Err(AppError::InternalError(
                            "Confirmation flow reached confirmation twice".to_string(),
                        ));
                    };
                    FlowState::Done(self.confirm(delivery, commit).await?)
                }
                FlowState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn settle_delivery_channel(&self) -> Result<FlowState, AppError> {
        match self
            .directory
            .send_message(
                MessageTarget::Direct(self.user_id),
                &self.prompt_text(),
                None,
            )
            .await
        {
            Ok(sent) => {
                return Ok(FlowState::AwaitingConfirmation(DeliveryChannel::Direct {
                    channel_id: sent.channel_id,
                }))
            }
            Err(DirectoryError::PermissionDenied) => {}
            Err(e) => {
                tracing::warn!("Could not direct message {}: {}", self.user_id, e);
                return Ok(FlowState::Done(ConfirmationOutcome::Undeliverable));
            }
        }

        tracing::debug!(
            "Direct messages refused by {}, asking to continue in channel {}",
            self.user_id,
            self.origin_channel_id
        );

        let origin = MessageTarget::Channel(self.origin_channel_id);
        let gate = "You have disabled DMs from this server. Would you still like to continue \
                    here? All messages containing your birthday will be deleted after a short \
                    delay.\nType **`yes`** to confirm.";
        if let Err(e) = self.directory.send_message(origin, gate, None).await {
            tracing::warn!(
                "Could not ask {} to continue in channel {}: {}",
                self.user_id,
                self.origin_channel_id,
                e
            );
            return Ok(FlowState::Done(ConfirmationOutcome::Undeliverable));
        }

        let outcome = match self
            .directory
            .wait_for_reply(self.origin_channel_id, self.user_id, FALLBACK_GATE_TIMEOUT)
            .await
        {
            None => ConfirmationOutcome::TimedOut,
            Some(reply) if !is_yes(&reply) => ConfirmationOutcome::Declined,
            Some(_) => {
                return Ok(FlowState::AwaitingConfirmation(DeliveryChannel::Transient {
                    channel_id: self.origin_channel_id,
                }))
            }
        };

        self.notify_end(origin, outcome, None).await;
        Ok(FlowState::Done(outcome))
    }

    async fn confirm<F, Fut>(
        &self,
        delivery: DeliveryChannel,
        commit: F,
    ) -> Result<ConfirmationOutcome, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        // The direct prompt was already delivered while settling the channel.
        if let DeliveryChannel::Transient { .. } = delivery {
            if let Err(e) = self
                .directory
                .send_message(delivery.target(), &self.prompt_text(), delivery.ttl())
                .await
            {
                tracing::warn!(
                    "Could not send birthday confirmation to {} in channel {}: {}",
                    self.user_id,
                    delivery.channel_id(),
                    e
                );
                return Ok(ConfirmationOutcome::Undeliverable);
            }
        }

        let outcome = match self
            .directory
            .wait_for_reply(delivery.channel_id(), self.user_id, delivery.reply_timeout())
            .await
        {
            None => ConfirmationOutcome::TimedOut,
            Some(reply) if !is_yes(&reply) => ConfirmationOutcome::Declined,
            Some(_) => {
                if commit().await? {
                    ConfirmationOutcome::Committed(delivery)
                } else {
                    ConfirmationOutcome::Superseded(delivery)
                }
            }
        };

        self.notify_end(delivery.target(), outcome, delivery.ttl())
            .await;
        Ok(outcome)
    }

    /// Tells the member how the flow ended. Delivery failures are only logged.
    async fn notify_end(
        &self,
        target: MessageTarget,
        outcome: ConfirmationOutcome,
        ttl: Option<Duration>,
    ) {
        let text = match outcome {
            ConfirmationOutcome::Committed(_) => format!(
                ":white_check_mark: {}: Successfully set your birthday to ||**{}**||.",
                TITLE, self.birthday
            ),
            ConfirmationOutcome::Superseded(_) => format!(
                ":negative_squared_cross_mark: {}: Your birthday is already set. If you believe \
                 it is incorrect, please contact an admin or a moderator.",
                TITLE
            ),
            ConfirmationOutcome::Declined => format!(
                ":negative_squared_cross_mark: {}: Declined. Not setting your birthday.",
                TITLE
            ),
            ConfirmationOutcome::TimedOut => format!(
                ":negative_squared_cross_mark: {}: You took too long. Not setting your birthday.",
                TITLE
            ),
            ConfirmationOutcome::Undeliverable => return,
        };

        if let Err(e) = self.directory.send_message(target, &text, ttl).await {
            tracing::warn!("Could not notify {} of confirmation result: {}", self.user_id, e);
        }
    }

    fn prompt_text(&self) -> String {
        format!(
            ":warning: {}: Are you sure you want to set your birthday to ||**{}**||? Only \
             administrators and moderators can reset your birthday afterwards.\nType **`yes`** \
             to confirm.",
            TITLE, self.birthday
        )
    }
}
