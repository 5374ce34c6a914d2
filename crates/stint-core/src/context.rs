//! The shared context passed explicitly through the dispatch path.

use std::sync::Arc;

use crate::config::StintConfig;
use crate::note::NoteRepository;
use crate::portal::TimePortal;
use crate::session::Session;
use crate::summarize::Summarizer;
use crate::ticket::TicketTracker;
use crate::time_entry::TimeEntryRepository;

/// Everything a command handler may touch: the session plus the
/// collaborators and stores behind their traits.
///
/// Handlers receive `&mut AppContext` rather than reaching for ambient
/// state, so each can be exercised in isolation with a constructed context.
pub struct AppContext {
    pub session: Session,
    pub config: StintConfig,
    pub tickets: Arc<dyn TicketTracker>,
    pub portal: Arc<dyn TimePortal>,
    pub summarizer: Arc<dyn Summarizer>,
    pub notes: Arc<dyn NoteRepository>,
    pub time_entries: Arc<dyn TimeEntryRepository>,
}

impl AppContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: Session,
        config: StintConfig,
        tickets: Arc<dyn TicketTracker>,
        portal: Arc<dyn TimePortal>,
        summarizer: Arc<dyn Summarizer>,
        notes: Arc<dyn NoteRepository>,
        time_entries: Arc<dyn TimeEntryRepository>,
    ) -> Self {
        Self {
            session,
            config,
            tickets,
            portal,
            summarizer,
            notes,
            time_entries,
        }
    }
}
