//! Property-based tests for the send protocol
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::transition::reply_content;
use super::*;
use crate::model::{Author, Conversation, ConversationId};
use crate::session::Session;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

const IDS: [&str; 3] = ["a", "b", "c"];

fn loaded_state() -> SyncState {
    let mut state = SyncState::new(Session::new());
    let conversations = IDS
        .iter()
        .map(|id| Conversation::new(ConversationId::new(*id), format!("Conversation {id}")))
        .collect();
    transition(&mut state, Event::ConversationsLoaded { conversations }).unwrap();
    state
}

fn total_messages(state: &SyncState) -> usize {
    state.session.store().conversations().map(Conversation::len).sum()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z]{1,12}( [a-z]{1,8})?",
        1 => "[ \t\n]{0,4}",
        1 => " [a-z]{1,6} ",
    ]
}

fn arb_reply() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => "[a-z ]{1,20}".prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_conversation_id() -> impl Strategy<Value = ConversationId> {
    proptest::sample::select(IDS.to_vec()).prop_map(ConversationId::new)
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::InputChanged { text }),
        Just(Event::SendRequested),
        Just(Event::SendRequested),
        arb_conversation_id().prop_map(|conversation_id| Event::ConversationSelected { conversation_id }),
        proptest::option::of("[A-Za-z ]{1,10}")
            .prop_map(|display_name| Event::CreateConversation { display_name }),
        (arb_conversation_id(), arb_reply())
            .prop_map(|(conversation_id, reply)| Event::ReplyReceived { conversation_id, reply }),
        proptest::collection::vec("[d-f]", 0..3).prop_map(|ids| Event::ConversationsLoaded {
            conversations: ids
                .into_iter()
                .map(|id| Conversation::new(ConversationId::new(id), "Reloaded"))
                .collect(),
        }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Sends with their replies produce (user, system) pairs in send order
    #[test]
    fn prop_send_sequence_is_pairwise_ordered(
        exchanges in proptest::collection::vec(("[a-z]{1,10}", arb_reply()), 1..15)
    ) {
        let mut state = loaded_state();
        let id = ConversationId::new("a");

        for (text, reply) in &exchanges {
            transition(&mut state, Event::InputChanged { text: text.clone() }).unwrap();
            let effects = transition(&mut state, Event::SendRequested).unwrap();
            let expected_request = Effect::RequestReply {
                conversation_id: id.clone(),
                text: text.clone(),
            };
            prop_assert!(effects.contains(&expected_request));
            prop_assert!(state.is_pending());

            transition(&mut state, Event::ReplyReceived {
                conversation_id: id.clone(),
                reply: reply.clone(),
            }).unwrap();
            prop_assert!(!state.is_pending());
        }

        let expected: Vec<(Author, String)> = exchanges
            .iter()
            .flat_map(|(text, reply)| {
                [(Author::User, text.clone()), (Author::System, reply_content(reply.clone()))]
            })
            .collect();
        let actual: Vec<(Author, String)> = state
            .session
            .store()
            .get(&id)
            .unwrap()
            .messages()
            .iter()
            .map(|m| (m.author, m.content.clone()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    // Whitespace-only input never mutates the store or starts a request
    #[test]
    fn prop_blank_input_is_a_no_op(blank in "[ \t\n\r]{0,10}") {
        let mut state = loaded_state();
        transition(&mut state, Event::InputChanged { text: blank }).unwrap();

        let result = transition(&mut state, Event::SendRequested);
        prop_assert_eq!(result, Err(TransitionError::EmptyInput));
        prop_assert_eq!(total_messages(&state), 0);
        prop_assert!(!state.is_pending());
    }

    // The pending flag is set exactly by an accepted send and cleared exactly
    // by the matching reply; every accepted event publishes a snapshot
    #[test]
    fn prop_pending_flag_brackets_requests(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = loaded_state();
        let mut outstanding: Option<ConversationId> = None;
        let mut users = 0usize;
        let mut systems = 0usize;

        for event in events {
            let is_reply = matches!(event, Event::ReplyReceived { .. });
            let is_reload = matches!(event, Event::ConversationsLoaded { .. });
            let before = total_messages(&state);
            let conversations_before = state.session.store().len();

            match transition(&mut state, event) {
                Ok(effects) => {
                    prop_assert!(effects.contains(&Effect::PublishSnapshot));
                    if let Some(Effect::RequestReply { conversation_id, .. }) = effects
                        .iter()
                        .find(|e| matches!(e, Effect::RequestReply { .. }))
                    {
                        prop_assert!(outstanding.is_none(), "second request while one is pending");
                        outstanding = Some(conversation_id.clone());
                        users += 1;
                    }
                    if is_reply {
                        prop_assert!(outstanding.take().is_some());
                        systems += 1;
                    }
                }
                Err(_) => prop_assert_eq!(total_messages(&state), before),
            }
            if is_reload {
                prop_assert_eq!(state.session.store().len(), conversations_before);
            }

            prop_assert_eq!(state.is_pending(), outstanding.is_some());
            prop_assert_eq!(
                state.pending().map(|p| &p.conversation_id),
                outstanding.as_ref()
            );
            prop_assert_eq!(total_messages(&state), users + systems);
        }
    }
}
