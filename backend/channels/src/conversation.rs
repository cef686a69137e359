//! Channel-agnostic conversation flow.
//!
//! `/start` offers the modes, a button press stores one, and any later text
//! is relayed to the IMEI API under the stored mode.

use std::future::Future;
use std::sync::Arc;

use imeibot_core::{BotError, ConversationId, ImeiChecker, Mode, SessionStore};
use tracing::{error, info, warn};

use crate::format::{TELEGRAM_MAX_MESSAGE_LEN, render_response};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Plain,
    Html,
}

/// One selectable button. `data` is what comes back on the callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChoice {
    pub label: String,
    pub data: String,
}

impl From<Mode> for ModeChoice {
    fn from(mode: Mode) -> Self {
        Self {
            label: format!("Mode {mode}"),
            data: mode.as_str().to_string(),
        }
    }
}

/// A message the channel should deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub format: ReplyFormat,
    /// One button per row when present.
    pub choices: Vec<ModeChoice>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: ReplyFormat::Plain,
            choices: Vec::new(),
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            format: ReplyFormat::Html,
            ..Self::plain(text)
        }
    }

    fn with_mode_choices(mut self) -> Self {
        self.choices = Mode::ALL.into_iter().map(ModeChoice::from).collect();
        self
    }
}

pub const CHOOSE_MODE: &str = "Choose a mode:";
pub const MODE_FIRST: &str = "Choose a mode first.";

pub struct ImeiConversation {
    sessions: Arc<dyn SessionStore>,
    checker: Arc<dyn ImeiChecker>,
    max_message_len: usize,
}

impl ImeiConversation {
    pub fn new(sessions: Arc<dyn SessionStore>, checker: Arc<dyn ImeiChecker>) -> Self {
        Self {
            sessions,
            checker,
            max_message_len: TELEGRAM_MAX_MESSAGE_LEN,
        }
    }

    pub fn with_max_message_len(mut self, len: usize) -> Self {
        self.max_message_len = len;
        self
    }

    /// The mode keyboard.
    pub fn start(&self) -> Reply {
        Reply::plain(CHOOSE_MODE).with_mode_choices()
    }

    /// Store the mode named by `data`. Unknown data leaves the session untouched
    /// and offers the keyboard again.
    pub async fn select_mode(&self, conversation: ConversationId, data: &str) -> Reply {
        match data.parse::<Mode>() {
            Ok(mode) => {
                self.sessions.set_mode(conversation, mode).await;
                info!(%conversation, %mode, "Mode selected");
                Reply::plain(format!("You chose mode {mode}. Enter an IMEI:"))
            }
            Err(e) => {
                warn!(%conversation, error = %e, "Ignoring unknown mode selection");
                Reply::plain(format!("Unknown mode. {CHOOSE_MODE}")).with_mode_choices()
            }
        }
    }

    /// Relay free text under the conversation's mode.
    ///
    /// Without a mode this only reprompts; nothing is sent to the API. The
    /// text is forwarded untouched, empty or not.
    pub async fn handle_text(
        &self,
        conversation: ConversationId,
        text: &str,
    ) -> Result<Vec<Reply>, BotError> {
        let Some(mode) = self.sessions.get_mode(conversation).await else {
            info!(%conversation, "Text received before a mode was chosen");
            return Ok(vec![Reply::plain(MODE_FIRST)]);
        };

        let outcome = self.checker.check(mode, text).await?;
        if !outcome.is_success() {
            warn!(%conversation, %mode, ?outcome, "IMEI check did not succeed");
        }

        Ok(render_response(&outcome.into_payload(), self.max_message_len)
            .into_iter()
            .map(Reply::html)
            .collect())
    }

    /// Reply for an error that escaped a handler.
    pub fn error_reply(&self, conversation: ConversationId, err: &BotError) -> Reply {
        error!(%conversation, error = %err, "Exception while handling an update");
        Reply::plain(err.user_message())
    }

    /// Await `handler`; if it fails, deliver the apology through `send`.
    ///
    /// Only a failure to send the apology itself is returned.
    pub async fn recover<H, S, SF>(
        &self,
        conversation: ConversationId,
        handler: H,
        send: S,
    ) -> Result<(), BotError>
    where
        H: Future<Output = Result<(), BotError>>,
        S: FnOnce(Reply) -> SF,
        SF: Future<Output = Result<(), BotError>>,
    {
        match handler.await {
            Ok(()) => Ok(()),
            Err(e) => send(self.error_reply(conversation, &e)).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use imeibot_core::{InMemorySessionStore, RelayOutcome};
    use serde_json::{Value, json};
    use std::sync::Mutex;

    /// Records every call and answers with a fixed outcome.
    struct RecordingChecker {
        calls: Mutex<Vec<(Mode, String)>>,
        respond: Box<dyn Fn() -> Result<RelayOutcome, BotError> + Send + Sync>,
    }

    impl RecordingChecker {
        fn answering(outcome: RelayOutcome) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(move || Ok(outcome.clone())),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(|| Err(BotError::MalformedResponse("eof".into()))),
            })
        }

        fn calls(&self) -> Vec<(Mode, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImeiChecker for RecordingChecker {
        async fn check(&self, mode: Mode, imei: &str) -> Result<RelayOutcome, BotError> {
            self.calls.lock().unwrap().push((mode, imei.to_string()));
            (self.respond)()
        }
    }

    fn conversation(checker: Arc<RecordingChecker>) -> ImeiConversation {
        ImeiConversation::new(Arc::new(InMemorySessionStore::new()), checker)
    }

    fn body_of(reply: &Reply) -> Value {
        let inner = reply
            .text
            .trim_start_matches("API response:\n<code>")
            .trim_end_matches("</code>")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");
        serde_json::from_str(&inner).unwrap()
    }

    const CONV: ConversationId = ConversationId(100);

    #[test]
    fn start_offers_both_modes() {
        let flow = conversation(RecordingChecker::answering(RelayOutcome::Ok(json!({}))));
        let reply = flow.start();
        assert_eq!(reply.text, CHOOSE_MODE);
        let data: Vec<_> = reply.choices.iter().map(|c| c.data.as_str()).collect();
        assert_eq!(data, ["live", "sandbox"]);
        assert_eq!(reply.choices[1].label, "Mode sandbox");
    }

    #[tokio::test]
    async fn text_before_mode_reprompts_without_request() {
        let checker = RecordingChecker::answering(RelayOutcome::Ok(json!({})));
        let flow = conversation(checker.clone());

        let replies = flow.handle_text(CONV, "490154203237518").await.unwrap();
        assert_eq!(replies, vec![Reply::plain(MODE_FIRST)]);
        assert!(checker.calls().is_empty());
    }

    #[tokio::test]
    async fn sandbox_selection_routes_one_check() {
        let checker = RecordingChecker::answering(RelayOutcome::Ok(json!({"status": "clean"})));
        let flow = conversation(checker.clone());

        let ack = flow.select_mode(CONV, "sandbox").await;
        assert_eq!(ack.text, "You chose mode sandbox. Enter an IMEI:");
        assert!(ack.choices.is_empty());

        let replies = flow.handle_text(CONV, "490154203237518").await.unwrap();
        assert_eq!(checker.calls(), vec![(Mode::Sandbox, "490154203237518".to_string())]);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].format, ReplyFormat::Html);
        assert_eq!(body_of(&replies[0]), json!({"status": "clean"}));
    }

    #[tokio::test]
    async fn empty_text_is_still_relayed() {
        let checker = RecordingChecker::answering(RelayOutcome::HttpError(422));
        let flow = conversation(checker.clone());
        flow.select_mode(CONV, "live").await;

        let replies = flow.handle_text(CONV, "").await.unwrap();
        assert_eq!(checker.calls(), vec![(Mode::Live, String::new())]);
        assert_eq!(
            body_of(&replies[0]),
            json!({"error": "Request failed with status 422"})
        );
    }

    #[tokio::test]
    async fn transport_failure_is_shown_as_payload() {
        let checker = RecordingChecker::answering(RelayOutcome::TransportError("refused".into()));
        let flow = conversation(checker);
        flow.select_mode(CONV, "live").await;

        let replies = flow.handle_text(CONV, "1").await.unwrap();
        assert_eq!(body_of(&replies[0]), json!({"error": "Failed to connect to API"}));
    }

    #[tokio::test]
    async fn unknown_selection_keeps_previous_mode() {
        let checker = RecordingChecker::answering(RelayOutcome::Ok(json!({})));
        let flow = conversation(checker.clone());
        flow.select_mode(CONV, "live").await;

        let reply = flow.select_mode(CONV, "production").await;
        assert_eq!(reply.choices.len(), 2);

        flow.handle_text(CONV, "1").await.unwrap();
        assert_eq!(checker.calls()[0].0, Mode::Live);
    }

    #[tokio::test]
    async fn modes_are_per_conversation() {
        let checker = RecordingChecker::answering(RelayOutcome::Ok(json!({})));
        let flow = conversation(checker.clone());
        flow.select_mode(ConversationId(1), "sandbox").await;

        let replies = flow.handle_text(ConversationId(2), "1").await.unwrap();
        assert_eq!(replies[0].text, MODE_FIRST);
        assert!(checker.calls().is_empty());
    }

    #[tokio::test]
    async fn unexpected_errors_escape_to_caller() {
        let flow = conversation(RecordingChecker::failing());
        flow.select_mode(CONV, "live").await;

        let err = flow.handle_text(CONV, "1").await.unwrap_err();
        let reply = flow.error_reply(CONV, &err);
        assert_eq!(reply.text, "Something went wrong. Please try again.");
    }

    #[tokio::test]
    async fn failed_handler_gets_apology() {
        let flow = conversation(RecordingChecker::answering(RelayOutcome::Ok(json!({}))));
        let sent = Mutex::new(Vec::new());
        let log = &sent;

        let result = flow
            .recover(
                CONV,
                async { Err::<(), _>(BotError::channel("message to edit not found")) },
                move |reply| async move {
                    log.lock().unwrap().push(reply);
                    Ok::<(), BotError>(())
                },
            )
            .await;

        assert!(result.is_ok());
        let sent = sent.into_inner().unwrap();
        assert_eq!(sent, vec![Reply::plain("Something went wrong. Please try again.")]);
    }

    #[tokio::test]
    async fn successful_handler_sends_nothing_extra() {
        let flow = conversation(RecordingChecker::answering(RelayOutcome::Ok(json!({}))));
        let mut sent = 0;

        flow.recover(CONV, async { Ok::<(), BotError>(()) }, |_| {
            sent += 1;
            async { Ok::<(), BotError>(()) }
        })
        .await
        .unwrap();

        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn failed_apology_is_returned() {
        let flow = conversation(RecordingChecker::answering(RelayOutcome::Ok(json!({}))));

        let err = flow
            .recover(
                CONV,
                async { Err::<(), _>(BotError::Connect("refused".into())) },
                |_| async { Err::<(), _>(BotError::channel("bot was blocked by the user")) },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BotError::Channel(_)));
    }

    #[tokio::test]
    async fn long_payload_is_split() {
        let items: Vec<_> = (0..50).map(|i| json!({"id": i})).collect();
        let checker = RecordingChecker::answering(RelayOutcome::Ok(json!({ "items": items })));
        let flow = conversation(checker).with_max_message_len(200);
        flow.select_mode(CONV, "live").await;

        let replies = flow.handle_text(CONV, "1").await.unwrap();
        assert!(replies.len() > 1);
        assert!(replies.iter().all(|r| r.text.chars().count() <= 200));
    }
}
