use std::time::{Duration, Instant};

use tokio::task::JoinHandle;

use crate::client::ChatClient;
use crate::config::Config;

/// Fixed user-facing reply for any failed exchange. Raw error details go to
/// the log, never to the conversation.
pub const ERROR_REPLY: &str = "Sorry, I ran into an error. Could you rephrase your question?";

/// How long the "copied" acknowledgment stays on a bubble.
pub const COPIED_FLASH: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,

    // Input field
    pub input: String,
    pub input_cursor: usize, // char index, converted to bytes at the edit point

    // Conversation (append-only; emptied only by a successful clear)
    pub messages: Vec<ChatMessage>,
    pub selected_msg: Option<usize>,

    // In-flight exchange. At most one chat request exists at a time; the
    // placeholder renders iff `loading` is set.
    pub loading: bool,
    chat_task: Option<JoinHandle<anyhow::Result<String>>>,
    clear_task: Option<JoinHandle<anyhow::Result<()>>>,

    // Chat viewport (inner size, updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    // Animation and transient feedback
    pub animation_frame: u8, // 0-2 for the ellipsis animation
    pub copied_at: Option<(usize, Instant)>,

    // Transport
    pub client: ChatClient,
    pub server_url: String,
    send_delay: Duration,
}

impl App {
    pub fn new(config: Config) -> Self {
        let server_url = config.effective_server_url();
        let client = ChatClient::new(&server_url);

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,

            input: String::new(),
            input_cursor: 0,

            messages: Vec::new(),
            selected_msg: None,

            loading: false,
            chat_task: None,
            clear_task: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            animation_frame: 0,
            copied_at: None,

            client,
            server_url,
            send_delay: config.effective_send_delay(),
        }
    }

    /// Submit the current input field as a user message.
    ///
    /// Whitespace-only input is silently ignored. While an exchange is
    /// pending the submission is ignored too, and the typed text stays in
    /// the field.
    pub fn submit_message(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self.chat_task.is_some() {
            return;
        }

        self.input.clear();
        self.input_cursor = 0;

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: text.clone(),
        });
        self.loading = true;
        self.animation_frame = 0;
        self.scroll_to_bottom();

        let client = self.client.clone();
        let delay = self.send_delay;
        self.chat_task = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            client.send_message(&text).await
        }));
    }

    /// Ask the server to reset the conversation. The visible history is only
    /// emptied once the server confirms.
    pub fn request_clear(&mut self) {
        if self.clear_task.is_some() {
            return;
        }

        let client = self.client.clone();
        self.clear_task = Some(tokio::spawn(async move { client.clear_history().await }));
    }

    /// Fold finished network tasks back into the session. Called between
    /// events on the UI thread, so no handler observes a half-applied update.
    pub async fn poll_transport(&mut self) {
        if let Some(task) = self.chat_task.take_if(|task| task.is_finished()) {
            // The placeholder comes down before anything else so it cannot
            // be orphaned, whichever way the exchange ended.
            self.loading = false;

            let content = match task.await {
                Ok(Ok(content)) => content,
                Ok(Err(err)) => {
                    log::warn!("chat request failed: {err:#}");
                    ERROR_REPLY.to_string()
                }
                Err(err) => {
                    log::warn!("chat task aborted: {err}");
                    ERROR_REPLY.to_string()
                }
            };

            self.messages.push(ChatMessage {
                role: ChatRole::Assistant,
                content,
            });
            self.scroll_to_bottom();
        }

        if let Some(task) = self.clear_task.take_if(|task| task.is_finished()) {
            match task.await {
                Ok(Ok(())) => {
                    self.messages.clear();
                    self.selected_msg = None;
                    self.copied_at = None;
                    self.chat_scroll = 0;
                }
                Ok(Err(err)) => log::warn!("failed to clear history: {err:#}"),
                Err(err) => log::warn!("clear task aborted: {err}"),
            }
        }
    }

    /// Tick animation frame and expire the copied acknowledgment.
    pub fn tick_animation(&mut self) {
        if self.loading {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if let Some((_, at)) = self.copied_at {
            if at.elapsed() >= COPIED_FLASH {
                self.copied_at = None;
            }
        }
    }

    // Message selection (for the copy action)
    pub fn select_next_message(&mut self) {
        let len = self.messages.len();
        if len > 0 {
            let i = self.selected_msg.map(|i| (i + 1).min(len - 1)).unwrap_or(0);
            self.selected_msg = Some(i);
        }
    }

    pub fn select_prev_message(&mut self) {
        if let Some(i) = self.selected_msg {
            self.selected_msg = Some(i.saturating_sub(1));
        } else if !self.messages.is_empty() {
            self.selected_msg = Some(self.messages.len() - 1);
        }
    }

    pub fn selected_message(&self) -> Option<&ChatMessage> {
        self.selected_msg.and_then(|i| self.messages.get(i))
    }

    // Viewport scrolling
    pub fn scroll_down(&mut self) {
        let visible = self.chat_height.max(1);
        if self.chat_scroll < self.total_chat_lines().saturating_sub(visible) {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.chat_height / 2;
        let max_scroll = self.total_chat_lines().saturating_sub(self.chat_height.max(1));
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.chat_height / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    /// Scroll so the newest bubble (or the loading placeholder) is visible.
    /// Runs after every append.
    pub fn scroll_to_bottom(&mut self) {
        let total = self.total_chat_lines();
        let visible = if self.chat_height > 0 { self.chat_height } else { 20 };

        if total > visible {
            self.chat_scroll = total.saturating_sub(visible);
        }
    }

    // Wrapped line count of the conversation, mirroring how the renderer
    // lays bubbles out (label line, wrapped content, blank separator).
    fn total_chat_lines(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;

        for msg in &self.messages {
            total += 1; // label line
            for line in msg.content.lines() {
                // Character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total += 1;
                } else {
                    total += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total += 1; // blank line after the bubble
        }

        if self.loading {
            total += 2; // label + "Thinking..." line
        }

        total
    }
}

#[cfg(test)]
impl App {
    fn has_pending(&self) -> bool {
        self.chat_task.is_some() || self.clear_task.is_some()
    }
}
