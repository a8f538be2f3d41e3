//! Local identifier generation

use crate::model::ConversationId;
use rand::distributions::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 6;
const TOKEN_LEN: usize = 4;

/// Generates conversation ids for locally created conversations.
///
/// Ids combine a per-session counter with a random suffix, so two ids from
/// the same generator never collide and ids from different sessions are
/// unlikely to.
#[derive(Debug, Default)]
pub(crate) struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    pub(crate) fn next_conversation_id(&mut self) -> ConversationId {
        self.counter += 1;
        ConversationId::new(format!("local-{}-{}", self.counter, random_token(SUFFIX_LEN)))
    }
}

/// Short lowercase alphanumeric token, used in default display names
pub(crate) fn short_token() -> String {
    random_token(TOKEN_LEN)
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
