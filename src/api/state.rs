use std::sync::Arc;

use crate::director::TournamentDirector;

#[derive(Clone)]
pub struct AppState {
    pub director: Arc<TournamentDirector>,
}

impl AppState {
    pub fn new(director: TournamentDirector) -> Self {
        Self {
            director: Arc::new(director),
        }
    }
}
