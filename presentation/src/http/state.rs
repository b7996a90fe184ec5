use testhub_application::{ExecutionParams, RunChatUseCase};

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub chat: RunChatUseCase,
    pub execution: ExecutionParams,
}

impl AppState {
    pub fn new(chat: RunChatUseCase, execution: ExecutionParams) -> Self {
        Self { chat, execution }
    }
}
